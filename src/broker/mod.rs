//! The `broker` module talks to the message broker that fans published
//! messages out to the push subscription.
//!
//! - `Broker`: capability trait with the get/create/publish primitives and the
//!   idempotent `ensure_*` operations built on them.
//! - `pubsub_api`: Google Cloud Pub/Sub REST implementation.
//! - `message`: publish envelope and push-delivery wrapper formats.
//! - `provisioner`: startup wiring that makes sure the topic and push
//!   subscription exist.

pub mod message;
pub mod provisioner;
pub mod pubsub_api;


use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};

pub use provisioner::Provisioner;
pub use pubsub_api::PubSubClient;

#[derive(Debug, Error)]
pub enum BrokerError {
    /// The named resource does not exist. The only recoverable failure.
    #[error("{0} not found")]
    NotFound(String),
    #[error("broker answered {status} for {resource}: {body}")]
    Status {
        resource: String,
        status: u16,
        body: String,
    },
    #[error("broker request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type BrokerResult<T> = Result<T, BrokerError>;

#[async_trait]
pub trait Broker: Send + Sync {
    async fn get_topic(&self, topic: &str) -> BrokerResult<()>;
    async fn create_topic(&self, topic: &str) -> BrokerResult<()>;
    async fn get_subscription(&self, subscription: &str) -> BrokerResult<()>;
    async fn create_subscription(
        &self,
        subscription: &str,
        topic: &str,
        push_endpoint: &str,
    ) -> BrokerResult<()>;

    /// Publish one message whose payload is already base64 encoded.
    async fn publish(&self, topic: &str, data: &str) -> BrokerResult<()>;

    /// Create `topic` unless it already exists.
    ///
    /// Only a not-found answer leads to creation; any other lookup failure is
    /// logged and returned as is.
    async fn ensure_topic(&self, topic: &str) -> BrokerResult<()> {
        match self.get_topic(topic).await {
            Ok(()) => Ok(()),
            Err(BrokerError::NotFound(_)) => {
                self.create_topic(topic).await?;
                info!(topic, "created topic");
                Ok(())
            }
            Err(e) => {
                error!(topic, error = %e, "topic lookup failed");
                Err(e)
            }
        }
    }

    /// Create the push `subscription` on `topic` unless it already exists.
    async fn ensure_subscription(
        &self,
        subscription: &str,
        topic: &str,
        push_endpoint: &str,
    ) -> BrokerResult<()> {
        match self.get_subscription(subscription).await {
            Ok(()) => Ok(()),
            Err(BrokerError::NotFound(_)) => {
                self.create_subscription(subscription, topic, push_endpoint)
                    .await?;
                info!(subscription, topic, "created push subscription");
                Ok(())
            }
            Err(e) => {
                error!(subscription, error = %e, "subscription lookup failed");
                Err(e)
            }
        }
    }
}
