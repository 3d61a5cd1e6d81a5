//! Orchestration policy: caps, thresholds and role overrides.

use roundtable_domain::{CostCaps, RoleOverrides, Thresholds};
use serde::{Deserialize, Serialize};

/// Default minimum confidence for answering instead of asking back
pub const DEFAULT_ASK_USER_THRESHOLD: f64 = 0.7;

/// Read-only policy for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub caps: CostCaps,
    pub thresholds: Thresholds,
    /// Confidence below this returns a clarification question
    pub ask_user_threshold: f64,
    pub overrides: RoleOverrides,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            caps: CostCaps::default(),
            thresholds: Thresholds::default(),
            ask_user_threshold: DEFAULT_ASK_USER_THRESHOLD,
            overrides: RoleOverrides::default(),
        }
    }
}

impl PolicyConfig {
    pub fn with_caps(mut self, caps: CostCaps) -> Self {
        self.caps = caps;
        self
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_ask_user_threshold(mut self, threshold: f64) -> Self {
        self.ask_user_threshold = threshold;
        self
    }

    pub fn with_overrides(mut self, overrides: RoleOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}
