#[modkit_derive::model(api = "rdk:component:sensor", model = "acme:thermo")]
pub struct Thermo;

fn main() {}
