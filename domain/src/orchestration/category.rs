//! Task categories produced by the classifier.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The classified nature of a request, which drives role weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskCategory {
    PromptEngineering,
    VerbalReasoning,
    TechnicalExecution,
    VisualAnalysis,
    Mixed,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 5] = [
        TaskCategory::PromptEngineering,
        TaskCategory::VerbalReasoning,
        TaskCategory::TechnicalExecution,
        TaskCategory::VisualAnalysis,
        TaskCategory::Mixed,
    ];

    /// Categories with their own weight table; `Mixed` blends these.
    pub const BASE: [TaskCategory; 4] = [
        TaskCategory::PromptEngineering,
        TaskCategory::VerbalReasoning,
        TaskCategory::TechnicalExecution,
        TaskCategory::VisualAnalysis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::PromptEngineering => "PROMPT_ENGINEERING",
            TaskCategory::VerbalReasoning => "VERBAL_REASONING",
            TaskCategory::TechnicalExecution => "TECHNICAL_EXECUTION",
            TaskCategory::VisualAnalysis => "VISUAL_ANALYSIS",
            TaskCategory::Mixed => "MIXED",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        TaskCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownCategory(s.to_string()))
    }
}

/// Share of each base category inside a `MIXED` classification.
///
/// Shares are non-negative and sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixedShares {
    shares: Vec<(TaskCategory, f64)>,
}

impl MixedShares {
    /// Build normalized shares. `Mixed` entries and non-positive shares are
    /// ignored; `None` if nothing usable remains.
    pub fn new(shares: impl IntoIterator<Item = (TaskCategory, f64)>) -> Option<Self> {
        let kept: Vec<(TaskCategory, f64)> = shares
            .into_iter()
            .filter(|(c, s)| *c != TaskCategory::Mixed && s.is_finite() && *s > 0.0)
            .collect();
        let total: f64 = kept.iter().map(|(_, s)| s).sum();
        if total <= 0.0 {
            return None;
        }
        Some(Self {
            shares: kept.into_iter().map(|(c, s)| (c, s / total)).collect(),
        })
    }

    /// Equal split between prompt engineering and technical execution
    pub fn prompt_and_technical() -> Self {
        Self {
            shares: vec![
                (TaskCategory::PromptEngineering, 0.5),
                (TaskCategory::TechnicalExecution, 0.5),
            ],
        }
    }

    pub fn share(&self, category: TaskCategory) -> f64 {
        self.shares
            .iter()
            .filter(|(c, _)| *c == category)
            .map(|(_, s)| s)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaskCategory, f64)> + '_ {
        self.shares.iter().copied()
    }
}

/// Classifier output: a single category, or a blend for mixed requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Classification {
    Single { category: TaskCategory },
    Mixed { shares: MixedShares },
}

impl Classification {
    pub fn single(category: TaskCategory) -> Self {
        if category == TaskCategory::Mixed {
            return Classification::Mixed {
                shares: MixedShares::prompt_and_technical(),
            };
        }
        Classification::Single { category }
    }

    pub fn category(&self) -> TaskCategory {
        match self {
            Classification::Single { category } => *category,
            Classification::Mixed { .. } => TaskCategory::Mixed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!(
            "technical_execution".parse::<TaskCategory>().unwrap(),
            TaskCategory::TechnicalExecution
        );
        assert_eq!(
            "visual analysis".parse::<TaskCategory>().unwrap(),
            TaskCategory::VisualAnalysis
        );
        assert!("POETRY".parse::<TaskCategory>().is_err());
    }

    #[test]
    fn test_category_serde_uses_screaming_case() {
        let json = serde_json::to_string(&TaskCategory::PromptEngineering).unwrap();
        assert_eq!(json, "\"PROMPT_ENGINEERING\"");
    }

    #[test]
    fn test_mixed_shares_normalize() {
        let shares = MixedShares::new([
            (TaskCategory::VerbalReasoning, 1.0),
            (TaskCategory::VisualAnalysis, 3.0),
            (TaskCategory::Mixed, 5.0),
        ])
        .unwrap();
        assert!((shares.share(TaskCategory::VisualAnalysis) - 0.75).abs() < 1e-12);
        assert_eq!(shares.share(TaskCategory::Mixed), 0.0);
        assert!(MixedShares::new([(TaskCategory::VerbalReasoning, 0.0)]).is_none());
    }

    #[test]
    fn test_mixed_classification_category() {
        let mixed = Classification::Mixed {
            shares: MixedShares::prompt_and_technical(),
        };
        assert_eq!(mixed.category(), TaskCategory::Mixed);
        assert_eq!(
            Classification::single(TaskCategory::VisualAnalysis).category(),
            TaskCategory::VisualAnalysis
        );
    }
}
