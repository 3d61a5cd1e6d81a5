//! Policy configuration from TOML (`[policy]` section)

use roundtable_application::PolicyConfig;
use roundtable_application::config::policy::DEFAULT_ASK_USER_THRESHOLD;
use roundtable_domain::{ConfigIssue, ConfigIssueCode, CostCaps, Thresholds};
use serde::{Deserialize, Serialize};

/// Cost caps and score thresholds.
///
/// # Example
///
/// ```toml
/// [policy]
/// normal_max_usd = 0.05
/// deep_max_usd = 0.25
/// ask_user_threshold = 0.7
/// tau_hard = 0.45
/// tau_soft = 0.6
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePolicyConfig {
    /// Cost cap for ask and audit modes
    pub normal_max_usd: f64,
    /// Cost cap for deep mode
    pub deep_max_usd: f64,
    pub ask_user_threshold: f64,
    /// Below this credibility an output is discarded
    pub tau_hard: f64,
    /// Below this credibility an output is quarantined
    pub tau_soft: f64,
}

impl Default for FilePolicyConfig {
    fn default() -> Self {
        let caps = CostCaps::default();
        let thresholds = Thresholds::default();
        Self {
            normal_max_usd: caps.normal_max_usd,
            deep_max_usd: caps.deep_max_usd,
            ask_user_threshold: DEFAULT_ASK_USER_THRESHOLD,
            tau_hard: thresholds.hard,
            tau_soft: thresholds.soft,
        }
    }
}

fn out_of_range(field: &str, value: f64, expected: &str) -> ConfigIssue {
    ConfigIssue::error(
        ConfigIssueCode::OutOfRange {
            field: format!("policy.{field}"),
            value,
        },
        format!("policy.{field}: {value} is out of range, expected {expected}"),
    )
}

impl FilePolicyConfig {
    /// Convert to the application policy (without role overrides), returning
    /// validation issues.
    pub fn to_policy(&self) -> (PolicyConfig, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        for (field, value) in [
            ("normal_max_usd", self.normal_max_usd),
            ("deep_max_usd", self.deep_max_usd),
        ] {
            if !(value.is_finite() && value > 0.0) {
                issues.push(out_of_range(field, value, "> 0"));
            }
        }

        for (field, value) in [
            ("ask_user_threshold", self.ask_user_threshold),
            ("tau_hard", self.tau_hard),
            ("tau_soft", self.tau_soft),
        ] {
            if !(0.0..=1.0).contains(&value) {
                issues.push(out_of_range(field, value, "[0, 1]"));
            }
        }

        if self.tau_hard >= self.tau_soft {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ThresholdOrder {
                    hard: self.tau_hard,
                    soft: self.tau_soft,
                },
                format!(
                    "policy: tau_hard ({}) must be below tau_soft ({})",
                    self.tau_hard, self.tau_soft
                ),
            ));
        }

        let policy = PolicyConfig::default()
            .with_caps(CostCaps {
                normal_max_usd: self.normal_max_usd,
                deep_max_usd: self.deep_max_usd,
            })
            .with_thresholds(Thresholds {
                hard: self.tau_hard,
                soft: self.tau_soft,
            })
            .with_ask_user_threshold(self.ask_user_threshold);

        (policy, issues)
    }
}
