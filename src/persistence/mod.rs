//! The `persistence` module provides durable storage for relayed messages
//! and for the user directory.
//!
//! Both live in one `sled` database: messages in an append-only tree keyed by
//! arrival order, users in a tree keyed by their id. The store traits here are
//! the seams the rest of the crate depends on, so handlers and tests never
//! touch `sled` directly.

pub mod sled_store;
pub mod user_store;


use thiserror::Error;

pub use sled_store::{Persistence, StoredMessage};
pub use user_store::{User, UserStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage failure: {0}")]
    Sled(#[from] sled::Error),
    #[error("corrupt record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Append-only message log.
///
/// Implementations assign the arrival time at `append` and must return
/// `recent` results in descending arrival order.
pub trait MessageStore: Send + Sync {
    /// Persist `text`, stamping it with its arrival time.
    fn append(&self, text: &str) -> StoreResult<StoredMessage>;

    /// The `limit` most recently arrived messages, newest first.
    fn recent(&self, limit: usize) -> StoreResult<Vec<StoredMessage>>;
}
