//! Unit-level merge with deduplication, disagreement and quarantine.
//!
//! The top VALID output (by weighted score) seeds the merge. Every other
//! VALID output then contributes units in score order:
//!
//! 1. a unit matching a risk pattern goes to `quarantined`
//! 2. a unit with a new key is appended to `merged`
//! 3. a unit whose key exists with different text goes to `disagreements`
//!
//! First-seen wins; merged units are never rewritten.

use super::unit::{MergeUnit, extract_units};
use crate::scoring::scorer::{ScoredOutput, Status};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Decides whether a unit's text is too risky to merge.
pub trait RiskScreen: Send + Sync {
    /// A human-readable reason when the text must be quarantined
    fn screen(&self, text: &str) -> Option<String>;
}

struct CompiledPattern {
    source: &'static str,
    regex: Regex,
}

const DEFAULT_RISK_PATTERNS: &[&str] = &[
    r"(?i)\bexploit\b",
    r"(?i)\bbypass\b",
    r"(?i)\bmalware\b",
    r"(?i)\bphishing\b",
    r"(?i)\bcredential theft\b",
];

fn default_patterns() -> &'static Vec<CompiledPattern> {
    static PATTERNS: OnceLock<Vec<CompiledPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        DEFAULT_RISK_PATTERNS
            .iter()
            .filter_map(|source| {
                Regex::new(source)
                    .ok()
                    .map(|regex| CompiledPattern { source, regex })
            })
            .collect()
    })
}

/// Lexicon screen for exploit, bypass, malware, phishing and credential theft.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternRiskScreen;

impl RiskScreen for PatternRiskScreen {
    fn screen(&self, text: &str) -> Option<String> {
        default_patterns()
            .iter()
            .find(|p| p.regex.is_match(text))
            .map(|p| format!("Matched pattern /{}/", p.source.trim_start_matches("(?i)")))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeResult {
    pub merged: Vec<MergeUnit>,
    pub disagreements: Vec<MergeUnit>,
    pub quarantined: Vec<MergeUnit>,
}

impl MergeResult {
    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }

    /// Ids of merged units, in order
    pub fn unit_ids(&self) -> Vec<String> {
        self.merged.iter().map(|u| u.id.clone()).collect()
    }
}

/// VALID outputs sorted by weighted score, highest first. Ties keep input order.
pub fn ranked_valid(scored: &[ScoredOutput]) -> Vec<&ScoredOutput> {
    let mut valid: Vec<&ScoredOutput> = scored.iter().filter(|s| s.status == Status::Valid).collect();
    valid.sort_by(|a, b| b.weighted_score.total_cmp(&a.weighted_score));
    valid
}

/// Merge VALID outputs into one deduplicated unit list.
pub fn assemble(scored: &[ScoredOutput], screen: &dyn RiskScreen) -> MergeResult {
    let valid = ranked_valid(scored);
    let Some((base, rest)) = valid.split_first() else {
        return MergeResult::default();
    };

    let mut result = MergeResult::default();
    let mut seen: HashMap<String, usize> = HashMap::new();

    let mut add = |unit: MergeUnit, result: &mut MergeResult| match seen.get(unit.key()) {
        None => {
            seen.insert(unit.key().to_string(), result.merged.len());
            result.merged.push(unit);
        }
        Some(&idx) => {
            if result.merged[idx].text != unit.text {
                result.disagreements.push(unit);
            }
        }
    };

    for unit in extract_units(&base.output.merge_content(), base.role) {
        add(unit, &mut result);
    }

    for item in rest {
        for unit in extract_units(&item.output.merge_content(), item.role) {
            if let Some(reason) = screen.screen(&unit.text) {
                result.quarantined.push(unit.with_reason(reason));
                continue;
            }
            add(unit, &mut result);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::output::ResponderOutput;
    use crate::orchestration::role::Role;
    use crate::scoring::axes::AxisScores;
    use std::collections::HashSet;

    fn scored(role: Role, content: &str, status: Status, weighted: f64) -> ScoredOutput {
        ScoredOutput {
            role,
            output: ResponderOutput::from_text(role, content),
            duration_ms: 0,
            axes: AxisScores::default(),
            credibility: 0.9,
            status,
            weighted_score: weighted,
        }
    }

    #[test]
    fn test_no_valid_outputs() {
        let input = vec![scored(Role::Solver, "- a", Status::Quarantine, 0.5)];
        assert_eq!(assemble(&input, &PatternRiskScreen), MergeResult::default());
    }

    #[test]
    fn test_base_is_highest_weighted() {
        let input = vec![
            scored(Role::Critic, "- from critic", Status::Valid, 0.2),
            scored(Role::Solver, "- from solver", Status::Valid, 0.6),
        ];
        let result = assemble(&input, &PatternRiskScreen);
        assert_eq!(result.merged[0].text, "from solver [SOLVER]");
        assert_eq!(result.merged[1].text, "from critic [CRITIC]");
    }

    #[test]
    fn test_long_shared_claim_is_disagreement() {
        let claim = "- Put a bounded queue in front of the write path today";
        let input = vec![
            scored(Role::Solver, claim, Status::Valid, 0.6),
            scored(Role::Critic, claim, Status::Valid, 0.3),
        ];
        let result = assemble(&input, &PatternRiskScreen);
        // the role tag falls past the eighth key word
        assert_eq!(result.merged.len(), 1);
        assert_eq!(
            result.merged[0].text,
            "Put a bounded queue in front of the write path today [SOLVER]"
        );
        assert_eq!(result.disagreements.len(), 1);
        assert_eq!(result.disagreements[0].source_role, Role::Critic);
    }

    #[test]
    fn test_short_shared_claim_kept_per_role() {
        let input = vec![
            scored(Role::Solver, "- Add retries", Status::Valid, 0.6),
            scored(Role::Critic, "- Add retries", Status::Valid, 0.3),
        ];
        let result = assemble(&input, &PatternRiskScreen);
        assert_eq!(result.merged.len(), 2);
        assert_eq!(result.merged[1].text, "Add retries [CRITIC]");
        assert!(result.disagreements.is_empty());
    }

    #[test]
    fn test_exact_duplicate_dropped() {
        let input = vec![
            scored(Role::Solver, "- Add retries\n- Use a queue", Status::Valid, 0.6),
            scored(Role::Critic, "- Use a queue\n- use a QUEUE!", Status::Valid, 0.3),
        ];
        let result = assemble(&input, &PatternRiskScreen);
        let texts: Vec<&str> = result.merged.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Add retries [SOLVER]", "Use a queue [SOLVER]", "Use a queue [CRITIC]"]
        );
        // same key as the critic's first unit, different text
        assert_eq!(result.disagreements.len(), 1);
        assert_eq!(result.disagreements[0].text, "use a QUEUE! [CRITIC]");
    }

    #[test]
    fn test_risky_units_are_quarantined() {
        let input = vec![
            scored(Role::Solver, "- Patch the server", Status::Valid, 0.6),
            scored(
                Role::Grok,
                "- Try a phishing test\n- Rotate keys",
                Status::Valid,
                0.2,
            ),
        ];
        let result = assemble(&input, &PatternRiskScreen);
        assert_eq!(result.quarantined.len(), 1);
        assert_eq!(
            result.quarantined[0].reason.as_deref(),
            Some(r"Matched pattern /\bphishing\b/")
        );
        assert_eq!(result.merged.len(), 2);
    }

    #[test]
    fn test_merge_invariants_hold() {
        let contents = [
            "- Alpha beta\n- exploit the parser\n- gamma",
            "- alpha BETA!\n- Gamma\n- bypass auth\n- delta",
            "No bullets at all, just a paragraph about delta",
            "- delta\n- malware scan\n- alpha beta",
        ];
        let roles = [Role::Solver, Role::Critic, Role::Verifier, Role::Impl];
        let input: Vec<ScoredOutput> = contents
            .iter()
            .zip(roles)
            .enumerate()
            .map(|(i, (c, r))| scored(r, c, Status::Valid, 1.0 - i as f64 * 0.1))
            .collect();

        let result = assemble(&input, &PatternRiskScreen);

        let keys: Vec<&str> = result.merged.iter().map(|u| u.key()).collect();
        let unique: HashSet<&str> = keys.iter().copied().collect();
        assert_eq!(keys.len(), unique.len());

        assert_eq!(result.quarantined.len(), 2);
        for q in &result.quarantined {
            assert!(!result.merged.iter().any(|m| m.id == q.id));
        }
        for d in &result.disagreements {
            let existing = result.merged.iter().find(|m| m.key() == d.key()).unwrap();
            assert_ne!(existing.text, d.text);
        }
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let input = vec![
            scored(Role::Solver, "- one\n- two", Status::Valid, 0.5),
            scored(Role::Critic, "- Two\n- three", Status::Valid, 0.5),
        ];
        assert_eq!(
            assemble(&input, &PatternRiskScreen),
            assemble(&input, &PatternRiskScreen)
        );
    }
}
