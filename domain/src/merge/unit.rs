//! Merge units and their identity keys.

use crate::orchestration::role::Role;
use serde::{Deserialize, Serialize};

/// Words kept in a normalized key
const KEY_WORDS: usize = 8;

/// An atomic piece of answer content eligible for merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeUnit {
    /// `ROLE-n`, 1-based per source output
    pub id: String,
    pub source_role: Role,
    /// Unit text with the ` [ROLE]` source tag appended
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Identity key of the tagged text
    #[serde(skip)]
    pub(crate) key: String,
}

impl MergeUnit {
    pub fn new(source_role: Role, index: usize, body: impl Into<String>) -> Self {
        let text = format!("{} [{}]", body.into(), source_role.tag());
        Self {
            id: format!("{}-{}", source_role.tag(), index),
            source_role,
            key: normalize_key(&text),
            text,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// `- `, `* ` or `1. ` style prefix, if present
fn bullet_prefix_len(line: &str) -> Option<usize> {
    let marker_len = if line.starts_with('-') || line.starts_with('*') {
        1
    } else {
        let digits = line.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || line.as_bytes().get(digits) != Some(&b'.') {
            return None;
        }
        digits + 1
    };
    let rest = &line[marker_len..];
    let spaces = rest.len() - rest.trim_start().len();
    (spaces > 0).then_some(marker_len + spaces)
}

pub fn is_bullet(line: &str) -> bool {
    bullet_prefix_len(line).is_some()
}

/// Strip a leading bullet marker and the whitespace after it.
pub fn strip_bullet(line: &str) -> &str {
    match bullet_prefix_len(line) {
        Some(len) => &line[len..],
        None => line,
    }
}

/// Lowercase, keep `[a-z0-9]` and whitespace, first eight words.
pub fn normalize_key(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    cleaned
        .split_whitespace()
        .take(KEY_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split content into units.
///
/// Bullet lines win when any exist; otherwise the whole trimmed content is
/// a single unit. Empty units are dropped.
pub fn extract_units(content: &str, role: Role) -> Vec<MergeUnit> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let bullets: Vec<&str> = lines.iter().copied().filter(|line| is_bullet(line)).collect();

    let bodies: Vec<&str> = if bullets.is_empty() {
        vec![content.trim()]
    } else {
        bullets.into_iter().map(strip_bullet).collect()
    };

    bodies
        .into_iter()
        .enumerate()
        .filter(|(_, body)| !body.is_empty())
        .map(|(i, body)| MergeUnit::new(role, i + 1, body))
        .collect()
}
