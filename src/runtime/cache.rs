//! Module cache registry
//!
//! Keyed by artifact path. An execution invalidates only its own
//! artifact's entry before loading; successful loads are recorded and
//! never evicted afterward.

use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// In-memory registry of completed module loads
#[derive(Debug, Default)]
pub struct ModuleCache {
    entries: HashMap<PathBuf, Value>,
}

impl ModuleCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the entry for an artifact path, returning whether one existed
    pub fn invalidate(&mut self, artifact: &Path) -> bool {
        self.entries.remove(artifact).is_some()
    }

    /// Record the export value of a completed load
    pub fn record(&mut self, artifact: PathBuf, value: Value) {
        self.entries.insert(artifact, value);
    }

    /// Get the recorded value for an artifact path
    pub fn get(&self, artifact: &Path) -> Option<&Value> {
        self.entries.get(artifact)
    }

    /// Check whether an entry exists for an artifact path
    pub fn contains(&self, artifact: &Path) -> bool {
        self.entries.contains_key(artifact)
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_and_get() {
        let mut cache = ModuleCache::new();
        let artifact = PathBuf::from("/proj/cfg.ts.compiled.mjs");

        assert!(cache.get(&artifact).is_none());
        cache.record(artifact.clone(), json!({"plugins": ["A"]}));

        assert!(cache.contains(&artifact));
        assert_eq!(cache.get(&artifact), Some(&json!({"plugins": ["A"]})));
    }

    #[test]
    fn test_invalidate_removes_only_own_entry() {
        let mut cache = ModuleCache::new();
        let first = PathBuf::from("/proj/a.ts.compiled.mjs");
        let second = PathBuf::from("/proj/b.ts.compiled.cjs");
        cache.record(first.clone(), json!(1));
        cache.record(second.clone(), json!(2));

        assert!(cache.invalidate(&first));

        assert!(!cache.contains(&first));
        assert!(cache.contains(&second));
    }

    #[test]
    fn test_invalidate_missing_entry() {
        let mut cache = ModuleCache::new();

        assert!(!cache.invalidate(Path::new("/proj/none.compiled.mjs")));
    }

    #[test]
    fn test_record_overwrites() {
        let mut cache = ModuleCache::new();
        let artifact = PathBuf::from("/proj/cfg.ts.compiled.mjs");
        cache.record(artifact.clone(), json!(1));
        cache.record(artifact.clone(), json!(2));

        assert_eq!(cache.get(&artifact), Some(&json!(2)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_entries_accumulate() {
        let mut cache = ModuleCache::new();
        assert!(cache.is_empty());

        cache.record(PathBuf::from("/a.compiled.mjs"), json!(1));
        cache.record(PathBuf::from("/b.compiled.mjs"), json!(2));

        assert_eq!(cache.len(), 2);
    }
}
