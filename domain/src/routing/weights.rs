//! Per-category role contribution weights.

use crate::orchestration::category::{Classification, MixedShares, TaskCategory};
use crate::orchestration::role::Role;
use crate::orchestration::role_table::RoleTable;

/// Static weight of `role` for a base category.
///
/// `Mixed` has no table of its own and returns 0 for every role; use
/// [`weights_for`] to get the blended vector.
pub fn base_weight(category: TaskCategory, role: Role) -> f64 {
    use Role::*;
    match category {
        TaskCategory::PromptEngineering => match role {
            Promptsmith => 0.52,
            Solver => 0.2,
            Critic => 0.15,
            Verifier => 0.1,
            Grok => 0.03,
            Impl | Visual => 0.0,
        },
        TaskCategory::VerbalReasoning => match role {
            Solver => 0.33,
            Promptsmith => 0.24,
            Critic => 0.2,
            Impl => 0.1,
            Verifier => 0.08,
            Grok => 0.05,
            Visual => 0.0,
        },
        TaskCategory::TechnicalExecution => match role {
            Impl => 0.38,
            Solver => 0.23,
            Critic => 0.2,
            Verifier => 0.11,
            Promptsmith => 0.03,
            Grok => 0.05,
            Visual => 0.0,
        },
        TaskCategory::VisualAnalysis => match role {
            Visual => 0.42,
            Solver => 0.2,
            Critic => 0.15,
            Verifier => 0.18,
            Promptsmith => 0.05,
            Grok | Impl => 0.0,
        },
        TaskCategory::Mixed => 0.0,
    }
}

/// Weight vector for a classification.
///
/// Single categories use their static table as-is. Mixed classifications
/// take the share-weighted sum of the base tables, normalized to sum to 1.
pub fn weights_for(classification: &Classification) -> RoleTable<f64> {
    match classification {
        Classification::Single { category } => {
            RoleTable::from_fn(|role| base_weight(*category, role))
        }
        Classification::Mixed { shares } => blend(shares),
    }
}

fn blend(shares: &MixedShares) -> RoleTable<f64> {
    let mut blended = RoleTable::filled(0.0);
    for (category, share) in shares.iter() {
        for role in Role::ALL {
            blended[role] += base_weight(category, role) * share;
        }
    }

    let total: f64 = blended.iter().map(|(_, w)| *w).sum();
    let total = if total > 0.0 { total } else { 1.0 };
    blended.map(|_, w| w / total)
}

/// Normalize weights over the given roles so they sum to 1.
///
/// Returns all zeros when the total weight of those roles is zero.
pub fn normalize_over(weights: &RoleTable<f64>, roles: &[Role]) -> Vec<(Role, f64)> {
    let total: f64 = roles.iter().map(|r| weights[*r]).sum();
    roles
        .iter()
        .map(|r| {
            let w = if total > 0.0 { weights[*r] / total } else { 0.0 };
            (*r, w)
        })
        .collect()
}
