//! Persistence layer backed by `sled`.
//!
//! Message keys are `{arrival_millis:020}_{sequence:020}`, so a forward scan
//! yields messages in arrival order and a reverse scan yields the newest
//! first. The sequence comes from sled's monotonic id generator and breaks
//! ties between messages stamped within the same millisecond.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sled::{Db, Tree};
use tracing::debug;

use super::{MessageStore, StoreResult};

const MESSAGES_TREE: &str = "messages";
pub(crate) const USERS_TREE: &str = "users";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoredMessage {
    pub text: String,
    /// Milliseconds since the Unix epoch, assigned when the message was stored.
    pub arrival_time: i64,
}

#[derive(Clone)]
pub struct Persistence {
    db: Db,
    messages: Tree,
    pub(crate) users: Tree,
    last_arrival: Arc<AtomicI64>,
}

impl Persistence {
    /// Open or create a sled database at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> StoreResult<Self> {
        let messages = db.open_tree(MESSAGES_TREE)?;
        let users = db.open_tree(USERS_TREE)?;

        // Resume the arrival clock from the newest stored key so a clock that
        // moved backwards across a restart cannot reorder the log.
        let last_arrival = match messages.last()? {
            Some((key, _)) => arrival_from_key(&key).unwrap_or_default(),
            None => 0,
        };

        Ok(Self {
            db,
            messages,
            users,
            last_arrival: Arc::new(AtomicI64::new(last_arrival)),
        })
    }

    /// Next arrival stamp; never earlier than any stamp handed out before.
    fn next_arrival(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self.last_arrival.fetch_max(now, Ordering::SeqCst);
        previous.max(now)
    }

    pub(crate) fn generate_id(&self) -> StoreResult<u64> {
        Ok(self.db.generate_id()?)
    }

    /// Block until every pending write is on disk.
    pub fn flush(&self) -> StoreResult<()> {
        self.db.flush()?;
        Ok(())
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

impl MessageStore for Persistence {
    fn append(&self, text: &str) -> StoreResult<StoredMessage> {
        let msg = StoredMessage {
            text: text.to_string(),
            arrival_time: self.next_arrival(),
        };

        let serialized = serde_json::to_vec(&msg)?;
        let key = format!("{:020}_{:020}", msg.arrival_time, self.generate_id()?);
        self.messages.insert(key.as_bytes(), serialized)?;

        debug!(key = %key, bytes = msg.text.len(), "stored message");
        Ok(msg)
    }

    fn recent(&self, limit: usize) -> StoreResult<Vec<StoredMessage>> {
        self.messages
            .iter()
            .rev()
            .take(limit)
            .map(|entry| {
                let (_, value) = entry?;
                Ok(serde_json::from_slice(&value)?)
            })
            .collect()
    }
}

fn arrival_from_key(key: &[u8]) -> Option<i64> {
    let key = std::str::from_utf8(key).ok()?;
    let (arrival, _) = key.split_once('_')?;
    arrival.parse().ok()
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("db", &"sled::Db")
            .field("messages", &self.messages.len())
            .field("users", &self.users.len())
            .finish()
    }
}
