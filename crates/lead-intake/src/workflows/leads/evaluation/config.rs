use serde::{Deserialize, Serialize};

/// Geographic gates switched on per deployment; an absent switch means off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default)]
    pub require_california: Option<bool>,
    #[serde(default)]
    pub require_kern_county: Option<bool>,
}

impl GateConfig {
    pub fn state_gate(&self) -> bool {
        self.require_california.unwrap_or(false)
    }

    pub fn county_gate(&self) -> bool {
        self.require_kern_county.unwrap_or(false)
    }
}
