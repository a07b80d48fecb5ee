use modkit_kernel::prelude::*;
use serde::{Deserialize, Serialize};

/// Native settings of [`MySensor`](crate::MySensor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Must be strictly positive.
    #[serde(deserialize_with = "integer")]
    pub setting: i64,
}

impl Validate for Config {
    fn validate(&self, path: &str) -> Result<Vec<String>, ResourceError> {
        if self.setting <= 0 {
            return Err(ResourceError::invalid(
                "setting",
                path,
                format!("must be greater than zero, got {}", self.setting),
            ));
        }
        Ok(Vec::new())
    }
}
