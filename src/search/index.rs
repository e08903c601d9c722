//! Inverted index construction and the published snapshot

use crate::search::config::IndexOptions;
use crate::search::document::Document;
use crate::search::query::tokenize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// The atomically-published pair of document store and inverted index.
///
/// Both halves are built together from the same document sequence and
/// replaced together; a reader never observes a store whose ids are absent
/// from the index or vice versa. The store is ordered by id so empty-query
/// pagination is deterministic.
#[derive(Debug, Default)]
pub struct Snapshot {
    store: BTreeMap<String, Document>,
    index: HashMap<String, HashSet<String>>,
}

impl Snapshot {
    /// An empty snapshot, published before the first successful load.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a brand-new store and index from a document sequence.
    ///
    /// Documents that resolve to no identifier are skipped silently. Each
    /// document contributes its id once per distinct token, no matter how
    /// often the token repeats in the text.
    pub fn build(documents: Vec<Document>, options: &IndexOptions) -> Self {
        let mut store = BTreeMap::new();
        let mut index: HashMap<String, HashSet<String>> = HashMap::new();

        for document in documents {
            let Some(doc_id) = document.resolve_id(options) else {
                continue;
            };

            let tokens: HashSet<String> =
                tokenize(&document.text_content()).into_iter().collect();
            for token in tokens {
                index.entry(token).or_default().insert(doc_id.clone());
            }

            store.insert(doc_id, document);
        }

        Self { store, index }
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Posting set for a token, if any document contains it.
    pub fn postings(&self, token: &str) -> Option<&HashSet<String>> {
        self.index.get(token)
    }

    pub fn document(&self, id: &str) -> Option<&Document> {
        self.store.get(id)
    }

    /// Documents in store order (ascending by id).
    pub fn documents(&self) -> impl Iterator<Item = (&String, &Document)> {
        self.store.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn docs(values: Vec<serde_json::Value>) -> Vec<Document> {
        values
            .into_iter()
            .map(|v| match v {
                serde_json::Value::Object(map) => Document(map),
                _ => panic!("test document must be an object"),
            })
            .collect()
    }

    #[test]
    fn test_build_skips_documents_without_id() {
        let snapshot = Snapshot::build(
            docs(vec![
                json!({"id": "1", "text": "alpha"}),
                json!({"text": "no identifier here"}),
                json!({"_id": "2", "text": "beta"}),
            ]),
            &IndexOptions::default(),
        );

        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.document("1").is_some());
        assert!(snapshot.document("2").is_some());
    }

    #[test]
    fn test_repeated_tokens_indexed_once() {
        let snapshot = Snapshot::build(
            docs(vec![json!({"id": "1", "text": "echo echo echo"})]),
            &IndexOptions::default(),
        );

        let postings = snapshot.postings("echo").unwrap();
        assert_eq!(postings.len(), 1);
        assert!(postings.contains("1"));
    }

    #[test]
    fn test_tokens_cover_all_string_fields() {
        let snapshot = Snapshot::build(
            docs(vec![json!({
                "id": "1",
                "name": "Alice",
                "message": "hello there",
                "count": 5
            })]),
            &IndexOptions::default(),
        );

        assert!(snapshot.postings("alice").is_some());
        assert!(snapshot.postings("hello").is_some());
        assert!(snapshot.postings("there").is_some());
        assert!(snapshot.postings("5").is_none());
    }

    #[test]
    fn test_store_iteration_is_ordered() {
        let snapshot = Snapshot::build(
            docs(vec![
                json!({"id": "c", "text": "x"}),
                json!({"id": "a", "text": "y"}),
                json!({"id": "b", "text": "z"}),
            ]),
            &IndexOptions::default(),
        );

        let ids: Vec<&String> = snapshot.documents().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
