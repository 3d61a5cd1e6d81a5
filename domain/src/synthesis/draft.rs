//! Synthesis drafts from the master model, with repair and fallback.

use crate::core::string::json_object_span;
use crate::merge::assembler::MergeResult;
use crate::orchestration::category::TaskCategory;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisMeta {
    pub task_type: TaskCategory,
    pub conflicts: u32,
    pub coverage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisAudit {
    pub plan: String,
    pub decisions: Vec<Decision>,
    pub disagreements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub using_quarantined: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units_used: Option<Vec<String>>,
}

/// One attempt's answer draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Synthesis {
    pub reply_markdown: String,
    pub meta: SynthesisMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit: Option<SynthesisAudit>,
}

impl Synthesis {
    /// Parse synthesizer text, filling missing metadata from `category`.
    ///
    /// Returns `None` when there is no JSON object or no reply text; the
    /// caller then falls back to [`Synthesis::fallback`].
    pub fn from_synthesizer_text(text: &str, category: TaskCategory) -> Option<Self> {
        let value: Value = serde_json::from_str(json_object_span(text)?).ok()?;
        Self::repair(&value, category)
    }

    pub fn repair(value: &Value, category: TaskCategory) -> Option<Self> {
        let reply_markdown = value
            .get("replyMarkdown")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())?
            .to_string();

        let meta = value.get("meta");
        let count = |key: &str| {
            meta.and_then(|m| m.get(key))
                .and_then(Value::as_f64)
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v.round() as u32)
                .unwrap_or(0)
        };
        let task_type = meta
            .and_then(|m| m.get("taskType"))
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or(category);

        let audit = value
            .get("audit")
            .and_then(|a| serde_json::from_value::<SynthesisAudit>(a.clone()).ok());

        Some(Self {
            reply_markdown,
            meta: SynthesisMeta {
                task_type,
                conflicts: count("conflicts"),
                coverage: count("coverage"),
            },
            audit,
        })
    }

    /// Deterministic synthesis built from the merge alone.
    pub fn fallback(merge: &MergeResult, category: TaskCategory) -> Self {
        let reply_markdown = if merge.merged.is_empty() {
            "No responder produced usable content for this request.".to_string()
        } else {
            merge
                .merged
                .iter()
                .map(|unit| format!("- {}", unit.text))
                .collect::<Vec<_>>()
                .join("\n")
        };
        Self {
            reply_markdown,
            meta: SynthesisMeta {
                task_type: category,
                conflicts: merge.disagreements.len() as u32,
                coverage: merge.merged.len() as u32,
            },
            audit: None,
        }
    }
}
