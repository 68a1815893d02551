#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Knowledge base settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KbConfig {
    /// Upper bound on the derivations one assertion may install.
    /// `None` trusts the rule set to reach a fixed point.
    pub max_derivations: Option<usize>,
}

impl KbConfig {
    /// Sets the derivation budget
    #[must_use]
    pub fn with_max_derivations(mut self, limit: usize) -> Self {
        self.max_derivations = Some(limit);
        self
    }
}
