//! Canonical shape for list-valued fields (`technologies`, `skills`).
//!
//! # Responsibility
//! - Accept either a sequence or a delimited string at the data-layer
//!   boundary.
//! - Produce the one canonical representation used everywhere else.
//!
//! # Invariants
//! - Output items are trimmed and non-empty.
//! - Input order is preserved; duplicates are kept.
//! - Normalizing an already canonical list returns it unchanged.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

static LIST_DELIMITER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,\n]").expect("valid list delimiter regex"));

/// List field as it may arrive from callers or the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListInput {
    /// Already a sequence; items may still need trimming.
    Items(Vec<String>),
    /// Comma or newline delimited text, e.g. `"React, Node.js"`.
    Delimited(String),
}

impl Default for ListInput {
    fn default() -> Self {
        Self::Items(Vec::new())
    }
}

impl ListInput {
    /// Converts into the canonical ordered sequence.
    pub fn into_canonical(self) -> Vec<String> {
        match self {
            Self::Items(items) => normalize_list(items),
            Self::Delimited(text) => split_delimited(&text),
        }
    }
}

impl From<Vec<String>> for ListInput {
    fn from(value: Vec<String>) -> Self {
        Self::Items(value)
    }
}

impl From<Vec<&str>> for ListInput {
    fn from(value: Vec<&str>) -> Self {
        Self::Items(value.into_iter().map(str::to_string).collect())
    }
}

impl From<&str> for ListInput {
    fn from(value: &str) -> Self {
        Self::Delimited(value.to_string())
    }
}

impl From<String> for ListInput {
    fn from(value: String) -> Self {
        Self::Delimited(value)
    }
}

/// Trims every item and drops blanks, preserving order.
pub fn normalize_list<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Splits delimited text into a canonical list.
pub fn split_delimited(text: &str) -> Vec<String> {
    normalize_list(LIST_DELIMITER_RE.split(text))
}

/// Serde adapter: accepts a sequence, a delimited string, or `null`.
pub(crate) fn deserialize_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<ListInput>::deserialize(deserializer)?;
    Ok(raw.map(ListInput::into_canonical).unwrap_or_default())
}
