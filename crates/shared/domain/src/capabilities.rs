use crate::constants::{MOVEMENT_SENSOR, POWER_SENSOR, SENSOR};
use crate::names::Api;
use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// The fixed set of lifecycle calls a resource may answer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Capabilities: u32 {
        const RECONFIGURE = 1 << 0;
        const READINGS = 1 << 1;
        const DO_COMMAND = 1 << 2;
        const CLOSE = 1 << 3;

        const ALL = Self::RECONFIGURE.bits()
            | Self::READINGS.bits()
            | Self::DO_COMMAND.bits()
            | Self::CLOSE.bits();
    }
}

impl Capabilities {
    /// Capabilities implied by an API. Only sensor-like APIs produce readings.
    #[must_use]
    pub fn of(api: &Api) -> Self {
        match api.subtype() {
            SENSOR | MOVEMENT_SENSOR | POWER_SENSOR => Self::ALL,
            _ => Self::ALL.difference(Self::READINGS),
        }
    }
}

impl Serialize for Capabilities {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for Capabilities {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}
