/// Namespace of the built-in APIs understood by the host.
pub const RDK: &str = "rdk";

/// Resource type for hardware-facing resources.
pub const COMPONENT: &str = "component";
/// Resource type for software-only resources.
pub const SERVICE: &str = "service";

pub const SENSOR: &str = "sensor";
pub const MOVEMENT_SENSOR: &str = "movement_sensor";
pub const POWER_SENSOR: &str = "power_sensor";
pub const GENERIC: &str = "generic";

/// Separator between the parts of an API or model triplet.
pub const TRIPLET_SEPARATOR: char = ':';
/// Separator between an API and the instance name in a resource name.
pub const NAME_SEPARATOR: char = '/';
