//! In-memory checkpoint store keyed by conversation identifier.
//!
//! [`MemorySaver`] holds the most recent [`AnalysisState`] snapshot per
//! conversation id for the lifetime of the process. It is ephemeral by
//! design: no eviction, no size bound, nothing survives a restart. Clones
//! share the same underlying map, so a workflow and its host can both hold
//! a handle.

use crate::state::AnalysisState;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe, process-local checkpoint store.
///
/// Concurrent runs with different conversation ids never interfere; two
/// runs racing on the same id resolve last-writer-wins, which is acceptable
/// because concurrent use of one conversation id is not a supported access
/// pattern.
#[derive(Debug, Clone, Default)]
pub struct MemorySaver {
    inner: Arc<RwLock<HashMap<String, AnalysisState>>>,
}

impl MemorySaver {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the latest snapshot for a conversation id.
    pub fn get(&self, thread_id: &str) -> Option<AnalysisState> {
        let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
        map.get(thread_id).cloned()
    }

    /// Store (or overwrite) the snapshot for a conversation id.
    pub fn put(&self, thread_id: &str, state: AnalysisState) {
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        map.insert(thread_id.to_string(), state);
    }

    /// Whether a snapshot exists for the given id.
    pub fn contains(&self, thread_id: &str) -> bool {
        let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
        map.contains_key(thread_id)
    }

    /// Number of distinct conversation ids currently stored.
    pub fn len(&self) -> usize {
        let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
        map.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all snapshots. Intended for test isolation.
    pub fn clear(&self) {
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        map.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Sentiment, StateUpdate};

    #[test]
    fn test_put_get_roundtrip() {
        let saver = MemorySaver::new();
        assert!(saver.get("c1").is_none());

        saver.put("c1", AnalysisState::new("hello"));
        let state = saver.get("c1").expect("snapshot stored");
        assert_eq!(state.input_text, "hello");
        assert_eq!(saver.len(), 1);
    }

    #[test]
    fn test_ids_are_independent() {
        let saver = MemorySaver::new();
        saver.put("c1", AnalysisState::new("first"));
        saver.put("c2", AnalysisState::new("second"));

        assert_eq!(saver.get("c1").unwrap().input_text, "first");
        assert_eq!(saver.get("c2").unwrap().input_text, "second");
        assert_eq!(saver.len(), 2);
    }

    #[test]
    fn test_overwrite_same_id() {
        let saver = MemorySaver::new();
        saver.put("c1", AnalysisState::new("old"));
        saver.put("c1", AnalysisState::new("new"));
        assert_eq!(saver.get("c1").unwrap().input_text, "new");
        assert_eq!(saver.len(), 1);
    }

    #[test]
    fn test_clones_share_storage() {
        let saver = MemorySaver::new();
        let handle = saver.clone();
        saver.put("c1", AnalysisState::new("shared"));
        assert!(handle.contains("c1"));
    }

    #[test]
    fn test_concurrent_writers_no_corruption() {
        let saver = MemorySaver::new();
        let mut handles = Vec::new();
        for i in 0..8u32 {
            let saver = saver.clone();
            handles.push(std::thread::spawn(move || {
                let id = format!("c{}", i % 4);
                let mut state = AnalysisState::new(format!("text {}", i));
                state.merge(StateUpdate::word_count(i)).unwrap();
                state
                    .merge(StateUpdate::analysis("s", Sentiment::Neutral))
                    .unwrap();
                saver.put(&id, state);
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        // Four distinct ids, each with a complete, well-formed snapshot.
        assert_eq!(saver.len(), 4);
        for i in 0..4 {
            let state = saver.get(&format!("c{}", i)).unwrap();
            assert!(state.word_count.is_some());
            assert!(state.summary.is_some());
        }
    }
}
