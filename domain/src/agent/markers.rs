//! Free-text marker extraction.
//!
//! Responders that ignore the JSON contract usually still print
//! `Confidence score: 0.8` and `Risk score: 0.1` lines. These are the only
//! signals available for a degraded output.

use regex::Regex;
use std::sync::OnceLock;

pub const DEFAULT_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_RISK: f64 = 0.3;

fn confidence_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)Confidence\s*score:\s*([0-1](?:\.\d+)?)").ok())
        .as_ref()
}

fn risk_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)Risk\s*score:\s*([0-1](?:\.\d+)?)").ok())
        .as_ref()
}

fn capture_score(pattern: Option<&Regex>, text: &str) -> Option<f64> {
    pattern?
        .captures(text)?
        .get(1)?
        .as_str()
        .parse::<f64>()
        .ok()
}

/// Confidence and risk read from marker lines, with defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Markers {
    pub confidence: f64,
    pub risk: f64,
}

impl Markers {
    pub fn extract(text: &str) -> Self {
        Self {
            confidence: capture_score(confidence_pattern(), text).unwrap_or(DEFAULT_CONFIDENCE),
            risk: capture_score(risk_pattern(), text).unwrap_or(DEFAULT_RISK),
        }
    }
}

/// Lines under an `Assumptions` heading, up to the next blank line or heading.
///
/// Bullet prefixes are stripped.
pub fn extract_assumptions(text: &str) -> Vec<String> {
    let mut lines = text.lines().map(str::trim);
    let found = lines.by_ref().any(|line| {
        let heading = line.trim_start_matches('#').trim().trim_end_matches(':');
        heading.eq_ignore_ascii_case("assumptions")
            || heading.eq_ignore_ascii_case("assumptions ledger")
    });
    if !found {
        return Vec::new();
    }
    lines
        .take_while(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| crate::merge::unit::strip_bullet(line).to_string())
        .filter(|line| !line.is_empty())
        .collect()
}
