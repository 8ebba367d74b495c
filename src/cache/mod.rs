//! The `cache` module holds the recent-messages read-through cache.
//!
//! `Cache` is the key-value seam (get, add-if-absent, delete). `RecentMessages`
//! is the only writer of the message entry: it populates the entry on a miss
//! and removes it when a new message is stored.

pub mod memory;
pub mod recent;

#[cfg(test)]
mod tests;

pub use memory::MemoryCache;
pub use recent::RecentMessages;

/// Key of the single cache entry holding the recent message texts.
pub const MESSAGE_CACHE_KEY: &str = "messages_key";

/// Default number of messages served by `/fetch_messages`.
pub const MAX_ITEM: usize = 20;

pub trait Cache: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<String>>;

    /// Store `value` only if `key` is vacant. Returns `true` when this call
    /// wrote the entry.
    fn put_if_absent(&self, key: &str, value: Vec<String>) -> bool;

    fn invalidate(&self, key: &str);
}
