use std::sync::Arc;

use tracing::{debug, info};

use crate::broker::message::PushEnvelope;
use crate::cache::RecentMessages;
use crate::persistence::MessageStore;
use crate::utils::error::RelayError;

/// Outcome of a push callback that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Stored and the recent-messages cache invalidated.
    Delivered,
    /// Wrong or missing token. Nothing was read or stored.
    Rejected,
}

/// Handles the broker's push callbacks.
///
/// The shared token in the callback URL is the only authentication. Order of
/// work is fixed: check the token, decode the whole envelope, append to the
/// store, then invalidate the cache. A decode failure therefore never leaves
/// a partial record behind.
pub struct PushReceiver {
    store: Arc<dyn MessageStore>,
    recent: RecentMessages,
    token: String,
}

impl PushReceiver {
    pub fn new(store: Arc<dyn MessageStore>, recent: RecentMessages, token: impl Into<String>) -> Self {
        Self {
            store,
            recent,
            token: token.into(),
        }
    }

    pub fn receive(&self, body: &[u8], token: Option<&str>) -> Result<Delivery, RelayError> {
        if token != Some(self.token.as_str()) {
            debug!("push callback with bad token rejected");
            return Ok(Delivery::Rejected);
        }

        let envelope = PushEnvelope::parse(body)?;
        let text = envelope.payload()?;

        let stored = self.store.append(&text)?;
        self.recent.invalidate();

        info!(
            message_id = envelope.message.message_id.as_deref().unwrap_or("-"),
            arrival_time = stored.arrival_time,
            "push delivery stored"
        );
        Ok(Delivery::Delivered)
    }
}
