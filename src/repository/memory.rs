use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::repository::FilterStore;
use crate::repository::errors::RepositoryResult;

/// In-process [`FilterStore`] that also counts mutating calls.
#[derive(Debug, Default)]
pub struct MemoryFilterStore {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryFilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::default();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.into(), value.into());
        }
        store
    }

    /// Number of `set` and `remove` calls received so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl FilterStore for MemoryFilterStore {
    fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        Ok(self.entries.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> RepositoryResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> RepositoryResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entries.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = MemoryFilterStore::new();
        assert_eq!(store.get("filterParam").unwrap(), None);

        store.set("filterParam", "{}").unwrap();
        assert_eq!(store.get("filterParam").unwrap().as_deref(), Some("{}"));

        store.remove("filterParam").unwrap();
        assert_eq!(store.get("filterParam").unwrap(), None);
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn with_entry_does_not_count_as_write() {
        let store = MemoryFilterStore::with_entry("k", "v");
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.write_count(), 0);
    }
}
