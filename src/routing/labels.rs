//! Runner label normalization.
//!
//! Labels are case-insensitive tokens. Everything that enters the routing
//! engine goes through [`normalize`], which lowercases and deduplicates. The
//! result is a `BTreeSet`, so iterating it yields the canonical key order.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A runner label in canonical (lowercase) form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Label(String);

impl Label {
    /// Create a label, lowercasing the raw token.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Label {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for Label {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.0
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A duplicate-free, sorted set of canonical labels.
pub type LabelSet = BTreeSet<Label>;

/// Lowercase every label and collapse duplicates.
pub fn normalize<I>(labels: I) -> LabelSet
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    labels.into_iter().map(Label::new).collect()
}

/// Render a label set as `{a, b, c}` for log lines and error messages.
pub fn format_labels(labels: &LabelSet) -> String {
    let joined = labels
        .iter()
        .map(Label::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{}}}", joined)
}
