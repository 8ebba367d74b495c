use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::Cache;

/// Process-local cache shared by every request handler.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<String>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Vec<String>>> {
        // Every critical section is a single map operation, so a poisoned
        // map is still consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<Vec<String>> {
        self.entries().get(key).cloned()
    }

    fn put_if_absent(&self, key: &str, value: Vec<String>) -> bool {
        match self.entries().entry(key.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    fn invalidate(&self, key: &str) {
        self.entries().remove(key);
    }
}
