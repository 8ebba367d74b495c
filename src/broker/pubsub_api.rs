//! Google Cloud Pub/Sub REST client (API v1).
//!
//! Resource paths are `projects/{project}/topics/{topic}` and
//! `projects/{project}/subscriptions/{subscription}`. Creation is a `PUT` on
//! the resource path, lookup a `GET`, publication a `POST` to
//! `{topic}:publish`. Pointing `base_url` at the Pub/Sub emulator works the
//! same way; the access token is then left unset.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use tracing::debug;

use super::{Broker, BrokerError, BrokerResult};

pub const DEFAULT_API_BASE_URL: &str = "https://pubsub.googleapis.com";

#[derive(Debug, Clone)]
pub struct PubSubClient {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    access_token: Option<String>,
}

#[derive(Serialize)]
struct PublishRequest<'a> {
    messages: [OutgoingMessage<'a>; 1],
}

#[derive(Serialize)]
struct OutgoingMessage<'a> {
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionRequest<'a> {
    topic: &'a str,
    push_config: PushConfig<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PushConfig<'a> {
    push_endpoint: &'a str,
}

impl PubSubClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        access_token: Option<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            project_id: project_id.into(),
            access_token,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn topic_path(&self, topic: &str) -> String {
        format!("projects/{}/topics/{}", self.project_id, topic)
    }

    pub fn subscription_path(&self, subscription: &str) -> String {
        format!("projects/{}/subscriptions/{}", self.project_id, subscription)
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/v1/{}", self.base_url.trim_end_matches('/'), resource)
    }

    /// Send `request`, mapping 404 to `NotFound` and other non-2xx answers
    /// to `Status`.
    async fn execute(&self, request: RequestBuilder, resource: &str) -> BrokerResult<Response> {
        let request = match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        debug!(resource, status = status.as_u16(), "pubsub api call");

        if status == StatusCode::NOT_FOUND {
            return Err(BrokerError::NotFound(resource.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BrokerError::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl Broker for PubSubClient {
    async fn get_topic(&self, topic: &str) -> BrokerResult<()> {
        let resource = self.topic_path(topic);
        self.execute(self.http.get(self.url(&resource)), &resource)
            .await?;
        Ok(())
    }

    async fn create_topic(&self, topic: &str) -> BrokerResult<()> {
        let resource = self.topic_path(topic);
        let request = self
            .http
            .put(self.url(&resource))
            .json(&serde_json::json!({}));
        self.execute(request, &resource).await?;
        Ok(())
    }

    async fn get_subscription(&self, subscription: &str) -> BrokerResult<()> {
        let resource = self.subscription_path(subscription);
        self.execute(self.http.get(self.url(&resource)), &resource)
            .await?;
        Ok(())
    }

    async fn create_subscription(
        &self,
        subscription: &str,
        topic: &str,
        push_endpoint: &str,
    ) -> BrokerResult<()> {
        let resource = self.subscription_path(subscription);
        let topic = self.topic_path(topic);
        let body = SubscriptionRequest {
            topic: &topic,
            push_config: PushConfig { push_endpoint },
        };
        let request = self.http.put(self.url(&resource)).json(&body);
        self.execute(request, &resource).await?;
        Ok(())
    }

    async fn publish(&self, topic: &str, data: &str) -> BrokerResult<()> {
        let resource = self.topic_path(topic);
        let body = PublishRequest {
            messages: [OutgoingMessage { data }],
        };
        let request = self
            .http
            .post(self.url(&format!("{resource}:publish")))
            .json(&body);
        self.execute(request, &resource).await?;
        Ok(())
    }
}
