use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::broker::Broker;
use crate::broker::message::{PublishEnvelope, PublisherInfo};
use crate::persistence::UserStore;
use crate::utils::error::RelayError;

/// Forwards client messages to the relay topic.
#[derive(Clone)]
pub struct Publisher {
    broker: Arc<dyn Broker>,
    users: Arc<dyn UserStore>,
    topic: String,
}

impl Publisher {
    pub fn new(broker: Arc<dyn Broker>, users: Arc<dyn UserStore>, topic: impl Into<String>) -> Self {
        Self {
            broker,
            users,
            topic: topic.into(),
        }
    }

    /// Publish `text` as exactly one broker message.
    ///
    /// A `user_id` that resolves to a known user attaches that user's
    /// profile; unknown ids and lookup failures publish anonymously. Broker
    /// failures are returned without retrying.
    pub async fn publish(&self, text: &str, user_id: Option<&str>) -> Result<(), RelayError> {
        let user = user_id
            .filter(|id| !id.is_empty())
            .and_then(|id| self.lookup_publisher(id));

        let envelope = PublishEnvelope::new(text, Utc::now().timestamp(), user);
        let data = envelope.encode()?;

        self.broker
            .publish(&self.topic, &data)
            .await
            .map_err(RelayError::Publish)?;

        info!(
            topic = %self.topic,
            attributed = envelope.user.is_some(),
            "published message"
        );
        Ok(())
    }

    fn lookup_publisher(&self, user_id: &str) -> Option<PublisherInfo> {
        match self.users.get_user(user_id) {
            Ok(user) => user.map(PublisherInfo::from),
            Err(e) => {
                warn!(user_id, error = %e, "user lookup failed, publishing anonymously");
                None
            }
        }
    }
}
