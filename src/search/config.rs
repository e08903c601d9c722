//! Index configuration

use serde::{Deserialize, Serialize};

/// Options controlling how documents are identified during indexing and
/// exact-match lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexOptions {
    /// Primary identifier field
    #[serde(default = "default_id_field")]
    pub id_field: String,

    /// Fallback identifier field, tried when the primary field is absent
    #[serde(default = "default_fallback_id_field")]
    pub fallback_id_field: String,

    /// Alternate field consulted by identifier-shaped queries
    #[serde(default = "default_alt_match_field")]
    pub alt_match_field: String,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            id_field: default_id_field(),
            fallback_id_field: default_fallback_id_field(),
            alt_match_field: default_alt_match_field(),
        }
    }
}

fn default_id_field() -> String {
    "id".to_string()
}

fn default_fallback_id_field() -> String {
    "_id".to_string()
}

fn default_alt_match_field() -> String {
    "user_id".to_string()
}
