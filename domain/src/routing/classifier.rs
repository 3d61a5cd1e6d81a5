//! Task classification.
//!
//! Classification is deliberately heuristic. [`TaskClassifier`] is the seam
//! for swapping in something smarter; [`KeywordClassifier`] is the default
//! lexicon matcher.
//!
//! Rule order (first match wins):
//!
//! | Rule | Result |
//! |------|--------|
//! | any image attachment | `VISUAL_ANALYSIS` |
//! | prompt lexicon AND technical lexicon | `MIXED` (0.5 / 0.5) |
//! | prompt lexicon | `PROMPT_ENGINEERING` |
//! | technical lexicon | `TECHNICAL_EXECUTION` |
//! | otherwise | `VERBAL_REASONING` |

use crate::core::request::Attachment;
use crate::orchestration::category::{Classification, MixedShares, TaskCategory};

/// Substrings (matched against the lowercased message) that mark prompt work
const PROMPT_LEXICON: &[&str] = &["prompt", "system prompt", "rubric", "template"];

const TECHNICAL_LEXICON: &[&str] = &[
    "code",
    "api",
    "bug",
    "error",
    "stack trace",
    "docker",
    "deploy",
    "typescript",
    "node",
    "fastify",
];

fn mentions_any(text: &str, lexicon: &[&str]) -> bool {
    lexicon.iter().any(|term| text.contains(term))
}

/// Maps a message and its attachments to a category. Must be total.
pub trait TaskClassifier: Send + Sync {
    fn classify(&self, message: &str, attachments: &[Attachment]) -> Classification;
}

/// Lexicon-based classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl TaskClassifier for KeywordClassifier {
    fn classify(&self, message: &str, attachments: &[Attachment]) -> Classification {
        classify_task(message, attachments)
    }
}

/// Classify with the default lexicons.
pub fn classify_task(message: &str, attachments: &[Attachment]) -> Classification {
    if attachments.iter().any(Attachment::is_image) {
        return Classification::single(TaskCategory::VisualAnalysis);
    }

    let text = message.to_lowercase();
    let is_prompt = mentions_any(&text, PROMPT_LEXICON);
    let is_technical = mentions_any(&text, TECHNICAL_LEXICON);

    match (is_prompt, is_technical) {
        (true, true) => Classification::Mixed {
            shares: MixedShares::prompt_and_technical(),
        },
        (true, false) => Classification::single(TaskCategory::PromptEngineering),
        (false, true) => Classification::single(TaskCategory::TechnicalExecution),
        (false, false) => Classification::single(TaskCategory::VerbalReasoning),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(message: &str) -> TaskCategory {
        classify_task(message, &[]).category()
    }

    #[test]
    fn test_image_attachment_wins_over_text() {
        let attachments = vec![Attachment::new("shot.png", "image/png")];
        let result = classify_task("fix this prompt and the api bug", &attachments);
        assert_eq!(result.category(), TaskCategory::VisualAnalysis);
    }

    #[test]
    fn test_bare_image_type() {
        let attachments = vec![Attachment::new("shot", "image")];
        assert_eq!(
            classify_task("hello", &attachments).category(),
            TaskCategory::VisualAnalysis
        );
    }

    #[test]
    fn test_non_image_attachment_is_ignored() {
        let attachments = vec![Attachment::new("notes.pdf", "application/pdf")];
        assert_eq!(
            classify_task("summarize these notes", &attachments).category(),
            TaskCategory::VerbalReasoning
        );
    }

    #[test]
    fn test_mixed_has_equal_shares() {
        let result = classify_task("Write a system prompt for our API triage bot", &[]);
        let Classification::Mixed { shares } = result else {
            panic!("expected MIXED, got {result:?}");
        };
        assert_eq!(shares.share(TaskCategory::PromptEngineering), 0.5);
        assert_eq!(shares.share(TaskCategory::TechnicalExecution), 0.5);
        assert_eq!(shares.share(TaskCategory::VerbalReasoning), 0.0);
        assert_eq!(shares.share(TaskCategory::VisualAnalysis), 0.0);
    }

    #[test]
    fn test_single_lexicons() {
        assert_eq!(category("Draft a grading RUBRIC"), TaskCategory::PromptEngineering);
        assert_eq!(category("docker deploy keeps failing"), TaskCategory::TechnicalExecution);
        assert_eq!(category("Should I take the job offer?"), TaskCategory::VerbalReasoning);
    }

    #[test]
    fn test_classifier_trait_delegates() {
        let classifier = KeywordClassifier;
        assert_eq!(
            classifier.classify("stack trace attached", &[]).category(),
            TaskCategory::TechnicalExecution
        );
    }
}
