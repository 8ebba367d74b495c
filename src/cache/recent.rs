use std::sync::Arc;

use tracing::debug;

use super::{Cache, MESSAGE_CACHE_KEY};
use crate::persistence::{MessageStore, StoreResult};

/// Read-through view of the newest messages.
///
/// A miss loads the newest `max_items` texts from the store and offers them
/// to the cache with add-if-absent semantics. When a concurrent reader got
/// there first, its value is returned instead, so every reader after the
/// race sees the same entry.
///
/// Population is not atomic with respect to `invalidate`: a reader that
/// queried the store just before a new arrival may re-populate the entry with
/// a list that misses it. That window is accepted.
#[derive(Clone)]
pub struct RecentMessages {
    cache: Arc<dyn Cache>,
    store: Arc<dyn MessageStore>,
    max_items: usize,
}

impl RecentMessages {
    pub fn new(cache: Arc<dyn Cache>, store: Arc<dyn MessageStore>, max_items: usize) -> Self {
        Self {
            cache,
            store,
            max_items,
        }
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Newest message texts, most recent first, at most `max_items` long.
    pub fn fetch_recent(&self) -> StoreResult<Vec<String>> {
        if let Some(cached) = self.cache.get(MESSAGE_CACHE_KEY) {
            debug!(count = cached.len(), "recent messages served from cache");
            return Ok(cached);
        }

        let texts: Vec<String> = self
            .store
            .recent(self.max_items)?
            .into_iter()
            .map(|msg| msg.text)
            .collect();

        if self.cache.put_if_absent(MESSAGE_CACHE_KEY, texts.clone()) {
            debug!(count = texts.len(), "recent messages cache populated");
            return Ok(texts);
        }

        Ok(self.cache.get(MESSAGE_CACHE_KEY).unwrap_or(texts))
    }

    /// Drop the cached entry; the next read goes to the store.
    pub fn invalidate(&self) {
        self.cache.invalidate(MESSAGE_CACHE_KEY);
    }
}
