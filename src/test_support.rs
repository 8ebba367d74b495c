//! Shared helpers for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::{TempDir, tempdir};

use crate::broker::{Broker, BrokerError, BrokerResult};
use crate::persistence::Persistence;

pub(crate) const TOKEN: &str = "s3cret";

#[derive(Debug, Default)]
pub(crate) struct FakeState {
    pub topics: HashSet<String>,
    /// subscription -> (topic, push endpoint)
    pub subscriptions: HashMap<String, (String, String)>,
    pub topic_creates: usize,
    pub subscription_creates: usize,
    /// (topic, base64 payload)
    pub published: Vec<(String, String)>,
    /// Status returned by every lookup instead of the normal answer.
    pub lookup_failure: Option<u16>,
    pub reject_publish: bool,
}

/// In-memory broker that records every call.
#[derive(Debug, Default)]
pub(crate) struct FakeBroker {
    pub state: Mutex<FakeState>,
}

impl FakeBroker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_lookups(status: u16) -> Arc<Self> {
        let broker = Self::default();
        broker.state.lock().unwrap().lookup_failure = Some(status);
        Arc::new(broker)
    }

    pub fn rejecting_publish() -> Arc<Self> {
        let broker = Self::default();
        broker.state.lock().unwrap().reject_publish = true;
        Arc::new(broker)
    }

    pub fn published(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().published.clone()
    }

    fn failure(resource: &str, status: u16) -> BrokerError {
        BrokerError::Status {
            resource: resource.to_string(),
            status,
            body: String::new(),
        }
    }
}

#[async_trait]
impl Broker for FakeBroker {
    async fn get_topic(&self, topic: &str) -> BrokerResult<()> {
        let state = self.state.lock().unwrap();
        if let Some(status) = state.lookup_failure {
            return Err(Self::failure(topic, status));
        }
        if state.topics.contains(topic) {
            Ok(())
        } else {
            Err(BrokerError::NotFound(topic.to_string()))
        }
    }

    async fn create_topic(&self, topic: &str) -> BrokerResult<()> {
        let mut state = self.state.lock().unwrap();
        if !state.topics.insert(topic.to_string()) {
            return Err(Self::failure(topic, 409));
        }
        state.topic_creates += 1;
        Ok(())
    }

    async fn get_subscription(&self, subscription: &str) -> BrokerResult<()> {
        let state = self.state.lock().unwrap();
        if let Some(status) = state.lookup_failure {
            return Err(Self::failure(subscription, status));
        }
        if state.subscriptions.contains_key(subscription) {
            Ok(())
        } else {
            Err(BrokerError::NotFound(subscription.to_string()))
        }
    }

    async fn create_subscription(
        &self,
        subscription: &str,
        topic: &str,
        push_endpoint: &str,
    ) -> BrokerResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.subscriptions.contains_key(subscription) {
            return Err(Self::failure(subscription, 409));
        }
        state.subscriptions.insert(
            subscription.to_string(),
            (topic.to_string(), push_endpoint.to_string()),
        );
        state.subscription_creates += 1;
        Ok(())
    }

    async fn publish(&self, topic: &str, data: &str) -> BrokerResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.reject_publish {
            return Err(Self::failure(topic, 403));
        }
        state.published.push((topic.to_string(), data.to_string()));
        Ok(())
    }
}

pub(crate) fn temp_persistence() -> (Arc<Persistence>, TempDir) {
    let dir = tempdir().unwrap();
    let persistence = Persistence::open(dir.path()).unwrap();
    (Arc::new(persistence), dir)
}

/// Wrap an encoded payload the way the broker does on push delivery.
pub(crate) fn push_body(data: &str) -> Vec<u8> {
    serde_json::json!({
        "message": { "data": data, "messageId": "1", "attributes": {} },
        "subscription": "projects/demo/subscriptions/relay-push",
    })
    .to_string()
    .into_bytes()
}

pub(crate) fn test_settings() -> crate::config::Settings {
    let toml = r#"
        [pubsub]
        project_id = "demo"
        topic = "relay"
        subscription = "relay-push"

        [relay]
        push_endpoint = "https://relay.test"
        token = "s3cret"
    "#;
    let config = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()
        .unwrap();
    crate::config::settings_from(config).unwrap()
}
