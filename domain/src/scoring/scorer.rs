//! Output scoring and invalidation.
//!
//! [`score_outputs`] is a pure function: the same outputs, weights and
//! thresholds always give the same statuses and weighted scores.

use super::axes::{AxisScores, compute_axis_scores, credibility_from_axes, credibility_from_markers};
use crate::agent::output::{AgentOutput, ResponderOutput};
use crate::orchestration::role::Role;
use crate::orchestration::role_table::RoleTable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Credibility cut-offs. `hard < soft`, both in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub hard: f64,
    pub soft: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            hard: 0.45,
            soft: 0.6,
        }
    }
}

impl Thresholds {
    pub fn status_for(&self, credibility: f64) -> Status {
        if credibility < self.hard {
            Status::Discard
        } else if credibility < self.soft {
            Status::Quarantine
        } else {
            Status::Valid
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Discard,
    Quarantine,
    Valid,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Discard => "DISCARD",
            Status::Quarantine => "QUARANTINE",
            Status::Valid => "VALID",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An output with its scores attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredOutput {
    pub role: Role,
    pub output: ResponderOutput,
    pub duration_ms: u64,
    pub axes: AxisScores,
    pub credibility: f64,
    pub status: Status,
    pub weighted_score: f64,
}

/// Axis scores and credibility for one output.
///
/// Parsed reports are scored from their structure. Degraded outputs have no
/// structure worth scoring, so their credibility comes from the confidence
/// and risk markers alone.
pub fn assess(output: &ResponderOutput) -> (AxisScores, f64) {
    match output {
        ResponderOutput::Parsed { report, .. } => {
            let axes = compute_axis_scores(report);
            let credibility = credibility_from_axes(&axes, report.self_confidence);
            (axes, credibility)
        }
        ResponderOutput::Degraded(degraded) => {
            let axes = compute_axis_scores(&degraded.report);
            (axes, credibility_from_markers(degraded.confidence, degraded.risk))
        }
    }
}

/// Score, classify and weight a batch of outputs.
///
/// Weights are renormalized over the non-discarded outputs; discarded
/// outputs (and everything, when the remaining weight is zero) get a
/// weighted score of 0.
pub fn score_outputs(
    outputs: &[AgentOutput],
    weights: &RoleTable<f64>,
    thresholds: Thresholds,
) -> Vec<ScoredOutput> {
    let mut scored: Vec<ScoredOutput> = outputs
        .iter()
        .map(|item| {
            let (axes, credibility) = assess(&item.output);
            ScoredOutput {
                role: item.role,
                output: item.output.clone(),
                duration_ms: item.duration_ms,
                axes,
                credibility,
                status: thresholds.status_for(credibility),
                weighted_score: 0.0,
            }
        })
        .collect();

    let total_weight: f64 = scored
        .iter()
        .filter(|s| s.status != Status::Discard)
        .map(|s| weights[s.role])
        .sum();

    if total_weight > 0.0 {
        for item in scored.iter_mut().filter(|s| s.status != Status::Discard) {
            item.weighted_score = item.credibility * (weights[item.role] / total_weight);
        }
    }
    scored
}

/// Normalized weights over non-discarded roles, for the audit trace.
pub fn reallocated_weights(scored: &[ScoredOutput], weights: &RoleTable<f64>) -> Vec<(Role, f64)> {
    let kept: Vec<Role> = scored
        .iter()
        .filter(|s| s.status != Status::Discard)
        .map(|s| s.role)
        .collect();
    crate::routing::weights::normalize_over(weights, &kept)
}

/// Roles grouped by status, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invalidation {
    pub discarded: Vec<Role>,
    pub quarantined: Vec<Role>,
    pub valid: Vec<Role>,
}

impl Invalidation {
    pub fn from_scored(scored: &[ScoredOutput]) -> Self {
        let mut invalidation = Self::default();
        for item in scored {
            match item.status {
                Status::Discard => invalidation.discarded.push(item.role),
                Status::Quarantine => invalidation.quarantined.push(item.role),
                Status::Valid => invalidation.valid.push(item.role),
            }
        }
        invalidation
    }

    /// Any role that did not make it through as VALID
    pub fn has_invalid(&self) -> bool {
        !self.discarded.is_empty() || !self.quarantined.is_empty()
    }
}
