//! Semi-structured documents as delivered by the upstream feed
//!
//! Upstream schemas vary, so a document is an opaque map from field name to
//! JSON value. Only two fields have well-known meaning: the primary id field
//! and its fallback, both configured through [`IndexOptions`].

use crate::search::config::IndexOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single document: field name to dynamic value, order irrelevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(pub serde_json::Map<String, Value>);

impl Document {
    pub fn new(fields: serde_json::Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Get a raw field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Resolve the stable identifier: primary id field, else the fallback
    /// key. Documents resolving to neither are dropped during indexing.
    pub fn resolve_id(&self, options: &IndexOptions) -> Option<String> {
        self.get(&options.id_field)
            .or_else(|| self.get(&options.fallback_id_field))
            .map(value_to_id)
    }

    /// Concatenation of all string-valued fields, used both for indexing
    /// and for the substring fallback scan. Field order is irrelevant for
    /// token extraction; joining with a space keeps tokens from merging.
    pub fn text_content(&self) -> String {
        let parts: Vec<&str> = self
            .0
            .values()
            .filter_map(|v| v.as_str())
            .collect();
        parts.join(" ")
    }

    /// Exact equality of the trimmed identifier query against the primary
    /// id or the alternate identifying field. Never matches via tokens.
    pub fn matches_identifier(&self, query: &str, options: &IndexOptions) -> bool {
        let matches_field = |field: &str| {
            self.get(field)
                .map(|v| value_to_id(v) == query)
                .unwrap_or(false)
        };
        matches_field(&options.id_field) || matches_field(&options.alt_match_field)
    }
}

/// Identifiers may arrive as strings or numbers; either way they are keyed
/// as strings.
fn value_to_id(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
