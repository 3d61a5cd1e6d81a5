//! Final confidence computation.

use crate::core::string::{clamp01, round_to};
use crate::orchestration::role_table::RoleTable;
use crate::scoring::scorer::{ScoredOutput, Status};

const CONFLICT_PENALTY: f64 = 0.05;
const MAX_CONFLICT_PENALTY: f64 = 0.2;
const COVERAGE_BONUS: f64 = 0.1;
const MAX_COVERAGE_BONUS: f64 = 0.1;

/// Ask mode: sum of weighted scores, rounded to 3 decimals.
pub fn ask_confidence(scored: &[ScoredOutput]) -> f64 {
    round_to(scored.iter().map(|s| s.weighted_score).sum(), 3)
}

/// Credibility-weighted mean over VALID outputs.
///
/// Zero when nothing is VALID or the VALID roles carry no weight.
pub fn base_score(scored: &[ScoredOutput], weights: &RoleTable<f64>) -> f64 {
    let (weighted, total) = scored
        .iter()
        .filter(|s| s.status == Status::Valid)
        .fold((0.0, 0.0), |(acc, total), s| {
            let w = weights[s.role];
            (acc + s.credibility * w, total + w)
        });
    if total > 0.0 { weighted / total } else { 0.0 }
}

/// Audit/deep mode: base score adjusted by the synthesis conflict and
/// coverage counts, rounded to 3 decimals.
pub fn audit_confidence(base: f64, conflicts: u32, coverage: u32) -> f64 {
    let penalty = (conflicts as f64 * CONFLICT_PENALTY).min(MAX_CONFLICT_PENALTY);
    let bonus = (coverage as f64 * COVERAGE_BONUS).min(MAX_COVERAGE_BONUS);
    round_to(clamp01(base - penalty + bonus), 3)
}
