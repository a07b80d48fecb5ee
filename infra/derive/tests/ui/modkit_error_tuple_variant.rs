use modkit_derive::modkit_error;

#[modkit_error]
pub enum DemoError {
    Io(std::io::Error),
}

fn main() {}
