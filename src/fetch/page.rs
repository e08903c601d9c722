//! Page payload normalization
//!
//! The upstream endpoint has no fixed contract: depending on version it
//! returns a bare array, an `items` envelope, one of several container
//! keys, or an id-to-document map. Everything is normalized to a flat item
//! list plus the optional reported total before the paging loop sees it.

use crate::fetch::error::{FetchError, FetchResult};
use crate::search::Document;
use serde_json::Value;

/// Container keys probed, in order, when the payload is an object without
/// an `items` array.
const CONTAINER_KEYS: [&str; 3] = ["messages", "data", "results"];

/// One normalized page of upstream results.
#[derive(Debug, Default)]
pub struct Page {
    pub items: Vec<Document>,
    pub total: Option<usize>,

    /// Raw entry count before non-object entries are dropped. Paging
    /// arithmetic (empty page, short page, reported total) uses this, so a
    /// full page with stray scalars still counts as full.
    pub fetched: usize,
}

/// Normalize a raw JSON payload into a [`Page`].
///
/// Accepted shapes:
/// - a bare array of documents
/// - `{"items": [...], "total": n?}`
/// - `{"messages"|"data"|"results": [...], "total": n?}`
/// - an object whose every value is itself a document (id-to-document
///   map), flattened to its values
///
/// Any other shape is a fatal parse error for the whole fetch call.
pub fn normalize_page(payload: Value) -> FetchResult<Page> {
    match payload {
        Value::Array(items) => Ok(Page {
            fetched: items.len(),
            items: collect_documents(items),
            total: None,
        }),
        Value::Object(map) => {
            if let Some(Value::Array(items)) = map.get("items") {
                return Ok(Page {
                    fetched: items.len(),
                    items: collect_documents(items.clone()),
                    total: read_total(map.get("total")),
                });
            }

            for key in CONTAINER_KEYS {
                if let Some(Value::Array(items)) = map.get(key) {
                    return Ok(Page {
                        fetched: items.len(),
                        items: collect_documents(items.clone()),
                        total: read_total(map.get("total")),
                    });
                }
            }

            // An object with only document values is an id-to-document map.
            // An empty object normalizes to an empty page.
            if map.values().all(Value::is_object) {
                let fetched = map.len();
                let items = map
                    .into_iter()
                    .filter_map(|(_, v)| match v {
                        Value::Object(fields) => Some(Document::new(fields)),
                        _ => None,
                    })
                    .collect();
                return Ok(Page {
                    items,
                    total: None,
                    fetched,
                });
            }

            Err(FetchError::Shape(
                "object payload has no recognized container key".to_string(),
            ))
        }
        other => Err(FetchError::Shape(format!(
            "expected array or object, got {}",
            type_name(&other)
        ))),
    }
}

/// Keep object items only; anything else in the array is dropped.
fn collect_documents(items: Vec<Value>) -> Vec<Document> {
    items
        .into_iter()
        .filter_map(|v| match v {
            Value::Object(fields) => Some(Document::new(fields)),
            _ => None,
        })
        .collect()
}

fn read_total(value: Option<&Value>) -> Option<usize> {
    value.and_then(Value::as_u64).map(|n| n as usize)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
