//! Axis scores and credibility.
//!
//! Each of the five axes lies in `[0, 25]`. They reward structural
//! completeness (list lengths against small targets) and lightweight text
//! quality (length and lexical uniqueness).

use crate::agent::report::AgentReport;
use crate::core::string::clamp01;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const AXIS_MAX: f64 = 25.0;
pub const AXES_TOTAL: f64 = 125.0;

const SUMMARY_TARGET: f64 = 3.0;
const ASSUMPTIONS_TARGET: f64 = 2.0;
const STEPS_TARGET: f64 = 3.0;
const FAILURE_MODES_TARGET: f64 = 2.0;
const UNITS_TARGET: f64 = 3.0;

/// Word count at which text length stops adding to quality
const QUALITY_WORDS: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisScores {
    pub coherence: f64,
    pub alignment: f64,
    pub verifiability: f64,
    pub signal_density: f64,
    pub compliance: f64,
}

impl AxisScores {
    pub fn total(&self) -> f64 {
        self.coherence + self.alignment + self.verifiability + self.signal_density + self.compliance
    }

    /// `(name, value)` pairs in display order
    pub fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("coherence", self.coherence),
            ("alignment", self.alignment),
            ("verifiability", self.verifiability),
            ("signalDensity", self.signal_density),
            ("compliance", self.compliance),
        ]
    }
}

fn ratio(count: usize, target: f64) -> f64 {
    (count as f64 / target).min(1.0)
}

/// Heuristic quality of a text block in `[0, 1]`.
///
/// Raw JSON or code fences are penalized by half.
pub fn text_quality(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let words: Vec<&str> = trimmed.split_whitespace().collect();
    let unique: HashSet<String> = words.iter().map(|w| w.to_lowercase()).collect();
    let uniqueness = unique.len() as f64 / words.len() as f64;

    let length_score = clamp01(words.len() as f64 / QUALITY_WORDS);
    let uniqueness_score = clamp01((uniqueness - 0.3) / 0.5);
    let penalty = if looks_like_raw_json(trimmed) { 0.5 } else { 1.0 };
    clamp01((0.6 * length_score + 0.4 * uniqueness_score) * penalty)
}

fn looks_like_raw_json(text: &str) -> bool {
    if text.contains("```") {
        return true;
    }
    // `{` followed by optional whitespace and `"agent"`
    text.match_indices('{').any(|(idx, _)| {
        text[idx + 1..]
            .trim_start()
            .get(..7)
            .is_some_and(|head| head.eq_ignore_ascii_case("\"agent\""))
    })
}

pub fn compute_axis_scores(report: &AgentReport) -> AxisScores {
    let summary = ratio(report.answer_summary.len(), SUMMARY_TARGET);
    let assumptions = ratio(report.assumptions.len(), ASSUMPTIONS_TARGET);
    let steps = ratio(report.steps_or_deliverables.len(), STEPS_TARGET);
    let failure = ratio(report.failure_modes.len(), FAILURE_MODES_TARGET);
    let units = ratio(report.units.len(), UNITS_TARGET);

    let reasoning_quality = text_quality(&report.reasoning);
    let summary_quality = text_quality(&report.answer_summary.join(" "));

    AxisScores {
        coherence: AXIS_MAX * clamp01(0.6 * summary + 0.4 * summary_quality),
        alignment: AXIS_MAX * clamp01(0.6 * units + 0.4 * reasoning_quality),
        verifiability: AXIS_MAX * clamp01(0.6 * assumptions + 0.4 * failure),
        signal_density: AXIS_MAX * clamp01(0.5 * steps + 0.5 * summary),
        compliance: AXIS_MAX * clamp01(0.6 * failure + 0.4 * clamp01(report.self_confidence)),
    }
}

/// `0.8 * axis ratio + 0.2 * self-confidence`, clamped to `[0, 1]`.
pub fn credibility_from_axes(axes: &AxisScores, self_confidence: f64) -> f64 {
    clamp01(0.8 * (axes.total() / AXES_TOTAL) + 0.2 * clamp01(self_confidence))
}

/// Credibility of an output known only by its markers.
pub fn credibility_from_markers(confidence: f64, risk: f64) -> f64 {
    clamp01(confidence - 0.75 * risk)
}
