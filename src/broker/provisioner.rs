use std::sync::Arc;

use super::{Broker, BrokerResult};

/// Makes sure the relay's topic and push subscription exist.
///
/// Safe to run on every start and on every status page view: existing
/// resources are left untouched.
#[derive(Clone)]
pub struct Provisioner {
    broker: Arc<dyn Broker>,
    topic: String,
    subscription: String,
    push_endpoint: String,
}

impl Provisioner {
    pub fn new(
        broker: Arc<dyn Broker>,
        topic: impl Into<String>,
        subscription: impl Into<String>,
        push_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            broker,
            topic: topic.into(),
            subscription: subscription.into(),
            push_endpoint: push_endpoint.into(),
        }
    }

    pub async fn provision(&self) -> BrokerResult<()> {
        self.broker.ensure_topic(&self.topic).await?;
        self.broker
            .ensure_subscription(&self.subscription, &self.topic, &self.push_endpoint)
            .await
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn subscription(&self) -> &str {
        &self.subscription
    }

    /// Full push endpoint URL, token included.
    pub fn push_endpoint(&self) -> &str {
        &self.push_endpoint
    }
}
