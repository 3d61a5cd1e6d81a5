//! Budget-constrained role scheduling.
//!
//! Cost is a flat per-token price times each role's token estimate. When the
//! candidate set is over the mode's cap, roles are dropped from the end of
//! the priority order until the set fits or one role remains. A partial
//! answer beats a refusal, so the set is never emptied.

use crate::orchestration::mode::Mode;
use crate::orchestration::role::Role;
use crate::orchestration::role_table::RoleTable;
use serde::{Deserialize, Serialize};

/// Flat price applied to every estimated token
pub const COST_PER_TOKEN_USD: f64 = 0.000002;

pub fn estimate_cost_usd(tokens: u32) -> f64 {
    tokens as f64 * COST_PER_TOKEN_USD
}

/// Per-mode cost caps in USD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostCaps {
    pub normal_max_usd: f64,
    pub deep_max_usd: f64,
}

impl CostCaps {
    pub fn for_mode(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Deep => self.deep_max_usd,
            Mode::Ask | Mode::Audit => self.normal_max_usd,
        }
    }
}

impl Default for CostCaps {
    fn default() -> Self {
        Self {
            normal_max_usd: 0.05,
            deep_max_usd: 0.25,
        }
    }
}

/// Result of fitting a role set to a cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetDecision {
    pub selected_roles: Vec<Role>,
    pub estimated_cost_usd: f64,
    pub cap_usd: f64,
    /// Number of candidates before trimming
    pub candidate_count: usize,
}

impl BudgetDecision {
    /// True when the cap forced roles to be dropped
    pub fn mode_cap_exceeded(&self) -> bool {
        self.selected_roles.len() < self.candidate_count
    }
}

fn total_cost(roles: &[Role], token_estimates: &RoleTable<u32>) -> f64 {
    roles
        .iter()
        .map(|role| estimate_cost_usd(token_estimates[*role]))
        .sum()
}

/// Trim `candidates` to fit the cap for `mode`.
///
/// Roles without an estimate should carry 0 in `token_estimates`.
pub fn apply_budget(
    candidates: &[Role],
    token_estimates: &RoleTable<u32>,
    mode: Mode,
    caps: CostCaps,
) -> BudgetDecision {
    let cap = caps.for_mode(mode);
    let mut selected = candidates.to_vec();
    let mut estimated = total_cost(&selected, token_estimates);

    if estimated > cap {
        selected.sort_by_key(|role| role.priority());
        while selected.len() > 1 && estimated > cap {
            selected.pop();
            estimated = total_cost(&selected, token_estimates);
        }
    }

    BudgetDecision {
        selected_roles: selected,
        estimated_cost_usd: estimated,
        cap_usd: cap,
        candidate_count: candidates.len(),
    }
}
