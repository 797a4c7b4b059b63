use std::collections::BTreeMap;

use itertools::Itertools;

/// Client-fixable input errors, collected per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: Default::default(),
        }
    }

    /// An error about a single offending field.
    pub fn field(field: impl Into<String>, issue: impl Into<String>) -> Self {
        let field = field.into();
        let issue = issue.into();
        let message = format!("{field} {issue}");
        Self::new(message).with(field, issue)
    }

    pub fn with(mut self, field: impl Into<String>, issue: impl Into<String>) -> Self {
        self.add(field, issue);
        self
    }

    pub fn add(&mut self, field: impl Into<String>, issue: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(issue.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Issues keyed by the offending field.
    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Splits a free-text query into distinct, lower-case terms.
pub fn split_text_terms(text: Option<&str>) -> Vec<String> {
    text.unwrap_or_default()
        .split_whitespace()
        .map(str::to_lowercase)
        .unique()
        .collect()
}

/// Normalizes repeated and/or comma separated codes.
pub fn split_codes<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.as_ref().split(','))
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToOwned::to_owned)
        .unique()
        .collect()
}

/// Removes duplicates while preserving the original order.
pub fn dedup_ids<S: AsRef<str>>(ids: &[S]) -> Vec<String> {
    ids.iter()
        .map(|id| id.as_ref().trim())
        .filter(|id| !id.is_empty())
        .map(ToOwned::to_owned)
        .unique()
        .collect()
}

pub fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
