//! Query engine over the latest published snapshot

use crate::search::config::IndexOptions;
use crate::search::document::Document;
use crate::search::index::Snapshot;
use crate::search::query::{is_identifier_query, tokenize};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// One page of ranked results plus the match count before slicing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    pub total: usize,
    pub documents: Vec<Document>,
}

/// In-memory search engine.
///
/// Holds the current [`Snapshot`] behind a reference swap: [`rebuild`]
/// constructs a complete replacement and publishes it in one short write
/// section, while searches clone the `Arc` and read without blocking on a
/// rebuild in progress.
///
/// [`rebuild`]: SearchEngine::rebuild
pub struct SearchEngine {
    snapshot: RwLock<Arc<Snapshot>>,
    options: IndexOptions,
}

impl SearchEngine {
    pub fn new(options: IndexOptions) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(Snapshot::empty())),
            options,
        }
    }

    /// Replace the published snapshot with one built from `documents`.
    /// Returns the number of documents indexed.
    pub fn rebuild(&self, documents: Vec<Document>) -> usize {
        let next = Arc::new(Snapshot::build(documents, &self.options));
        let indexed = next.len();
        *self.snapshot.write() = next;
        info!(indexed, "search index rebuilt");
        indexed
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.read().clone()
    }

    /// Number of documents in the current snapshot.
    pub fn document_count(&self) -> usize {
        self.snapshot().len()
    }

    /// Execute a search. `page` and `page_size` are 1-based and must be
    /// validated at the boundary; the engine itself only slices.
    pub fn search(&self, query: &str, page: usize, page_size: usize) -> SearchResults {
        let snapshot = self.snapshot();

        if is_identifier_query(query) {
            return self.search_identifier(&snapshot, query.trim(), page, page_size);
        }

        if query.is_empty() {
            let total = snapshot.len();
            let documents = snapshot
                .documents()
                .map(|(_, doc)| doc)
                .skip(offset(page, page_size))
                .take(page_size)
                .cloned()
                .collect();
            return SearchResults { total, documents };
        }

        let query_tokens = tokenize(query);
        if query_tokens.is_empty() {
            return SearchResults {
                total: 0,
                documents: Vec::new(),
            };
        }

        // Union of per-token posting sets: partial overlap still qualifies.
        let mut candidates: Vec<String> = {
            let mut union = std::collections::HashSet::new();
            for token in &query_tokens {
                if let Some(ids) = snapshot.postings(token) {
                    union.extend(ids.iter().cloned());
                }
            }
            union.into_iter().collect()
        };

        if candidates.is_empty() {
            candidates = substring_scan(&snapshot, query);
        }

        let mut scored: Vec<(usize, String)> = candidates
            .into_iter()
            .map(|id| (score(&snapshot, &query_tokens, &id), id))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        let total = scored.len();
        let documents = scored
            .into_iter()
            .skip(offset(page, page_size))
            .take(page_size)
            .filter_map(|(_, id)| snapshot.document(&id).cloned())
            .collect();

        SearchResults { total, documents }
    }

    /// Exact-match path for identifier-shaped queries: equality against the
    /// primary id or the alternate identifying field, tokenization bypassed.
    fn search_identifier(
        &self,
        snapshot: &Snapshot,
        query: &str,
        page: usize,
        page_size: usize,
    ) -> SearchResults {
        let matches: Vec<&Document> = snapshot
            .documents()
            .filter(|(_, doc)| doc.matches_identifier(query, &self.options))
            .map(|(_, doc)| doc)
            .collect();

        let total = matches.len();
        let documents = matches
            .into_iter()
            .skip(offset(page, page_size))
            .take(page_size)
            .cloned()
            .collect();

        SearchResults { total, documents }
    }
}

fn offset(page: usize, page_size: usize) -> usize {
    page.saturating_sub(1).saturating_mul(page_size)
}

/// Count of query tokens present in the candidate's indexed token set.
fn score(snapshot: &Snapshot, query_tokens: &[String], doc_id: &str) -> usize {
    query_tokens
        .iter()
        .filter(|token| {
            snapshot
                .postings(token)
                .map(|ids| ids.contains(doc_id))
                .unwrap_or(false)
        })
        .count()
}

/// Fallback when no token matched: literal containment of the lowercased
/// query in each document's lowercased string content.
fn substring_scan(snapshot: &Snapshot, query: &str) -> Vec<String> {
    let needle = query.to_lowercase();
    snapshot
        .documents()
        .filter(|(_, doc)| doc.text_content().to_lowercase().contains(&needle))
        .map(|(id, _)| id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine_with(values: Vec<serde_json::Value>) -> SearchEngine {
        let documents = values
            .into_iter()
            .map(|v| match v {
                serde_json::Value::Object(map) => Document(map),
                _ => panic!("test document must be an object"),
            })
            .collect();
        let engine = SearchEngine::new(IndexOptions::default());
        engine.rebuild(documents);
        engine
    }

    fn result_ids(results: &SearchResults) -> Vec<String> {
        results
            .documents
            .iter()
            .map(|d| d.get("id").unwrap().as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_hello_world_ranking() {
        let engine = engine_with(vec![
            json!({"id": "1", "text": "Hello world"}),
            json!({"id": "2", "text": "Goodbye world"}),
            json!({"id": "3", "text": "Hello there"}),
        ]);

        let results = engine.search("hello", 1, 10);
        assert_eq!(results.total, 2);
        let ids = result_ids(&results);
        assert!(ids.contains(&"1".to_string()));
        assert!(ids.contains(&"3".to_string()));
        assert!(!ids.contains(&"2".to_string()));
    }

    #[test]
    fn test_union_ranks_full_match_above_partial() {
        let engine = engine_with(vec![
            json!({"id": "1", "text": "Hello world"}),
            json!({"id": "2", "text": "Goodbye world"}),
            json!({"id": "3", "text": "Hello there"}),
        ]);

        // "hello world" matches all three via token union; doc 1 carries
        // both tokens and must rank first.
        let results = engine.search("hello world", 1, 10);
        assert_eq!(results.total, 3);
        assert_eq!(result_ids(&results)[0], "1");
    }

    #[test]
    fn test_tie_broken_by_id_ascending() {
        let engine = engine_with(vec![
            json!({"id": "b", "text": "same words here"}),
            json!({"id": "a", "text": "same words here"}),
        ]);

        let results = engine.search("same words", 1, 10);
        assert_eq!(result_ids(&results), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let engine = engine_with(vec![
            json!({"id": "1", "text": "alpha"}),
            json!({"id": "2", "text": "beta"}),
            json!({"id": "3", "text": "gamma"}),
        ]);

        let results = engine.search("", 1, 2);
        assert_eq!(results.total, 3);
        assert_eq!(results.documents.len(), 2);
    }

    #[test]
    fn test_punctuation_only_query_matches_nothing() {
        let engine = engine_with(vec![json!({"id": "1", "text": "alpha"})]);
        let results = engine.search("!!!", 1, 10);
        assert_eq!(results.total, 0);
        assert!(results.documents.is_empty());
    }

    #[test]
    fn test_substring_fallback() {
        let engine = engine_with(vec![
            json!({"id": "1", "text": "the needle-haystack case"}),
            json!({"id": "2", "text": "nothing relevant"}),
        ]);

        // Tokens "dle" and "hay" exist in no document, so the union is
        // empty and the literal substring scan must find doc 1.
        let results = engine.search("dle-hay", 1, 10);
        assert_eq!(results.total, 1);
        assert_eq!(result_ids(&results), vec!["1"]);
    }

    #[test]
    fn test_identifier_query_is_exact_only() {
        let id = "123e4567-e89b-12d3-a456-426614174000";
        let engine = engine_with(vec![
            json!({"id": id, "text": "owner record"}),
            // Same identifier appearing as body text must not match.
            json!({"id": "2", "text": format!("mentions {id} in passing")}),
            json!({"id": "3", "user_id": id, "text": "same user"}),
        ]);

        let results = engine.search(id, 1, 10);
        assert_eq!(results.total, 2);
        let ids = result_ids(&results);
        assert!(ids.contains(&id.to_string()));
        assert!(ids.contains(&"3".to_string()));
    }

    #[test]
    fn test_score_monotonicity() {
        let engine = engine_with(vec![
            json!({"id": "full", "text": "red green blue"}),
            json!({"id": "partial", "text": "red only"}),
        ]);

        let snapshot = engine.snapshot();
        let tokens = tokenize("red green blue");
        assert!(score(&snapshot, &tokens, "full") >= score(&snapshot, &tokens, "partial"));
        assert_eq!(score(&snapshot, &tokens, "full"), 3);
        assert_eq!(score(&snapshot, &tokens, "partial"), 1);
    }

    #[test]
    fn test_pagination_completeness() {
        let values: Vec<serde_json::Value> = (0..23)
            .map(|i| json!({"id": format!("{i:03}"), "text": "common term"}))
            .collect();
        let engine = engine_with(values);

        let full = engine.search("common", 1, 100);
        assert_eq!(full.total, 23);
        let expected = result_ids(&full);

        let mut collected = Vec::new();
        let page_size = 5;
        for page in 1.. {
            let results = engine.search("common", page, page_size);
            assert_eq!(results.total, 23);
            if results.documents.is_empty() {
                break;
            }
            collected.extend(result_ids(&results));
        }
        assert_eq!(collected, expected);
    }

    #[test]
    fn test_rebuild_replaces_snapshot() {
        let engine = engine_with(vec![json!({"id": "1", "text": "old"})]);
        assert_eq!(engine.search("old", 1, 10).total, 1);

        engine.rebuild(vec![Document(
            json!({"id": "2", "text": "new"}).as_object().unwrap().clone(),
        )]);

        assert_eq!(engine.search("old", 1, 10).total, 0);
        assert_eq!(engine.search("new", 1, 10).total, 1);
        assert_eq!(engine.document_count(), 1);
    }

    #[test]
    fn test_reader_keeps_old_snapshot_across_rebuild() {
        let engine = engine_with(vec![json!({"id": "1", "text": "stable"})]);
        let held = engine.snapshot();

        engine.rebuild(Vec::new());

        assert_eq!(held.len(), 1);
        assert_eq!(engine.document_count(), 0);
    }
}
