use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::User;

/// Message published to the topic.
///
/// Serialized as UTF-8 JSON (field order as declared, `user` omitted when
/// absent) and then base64 encoded, which is the payload format the broker
/// requires.
///
/// ```json
/// {"message_data": "hello", "created": 1725000000, "user": {"user_id": "…", "name": "ada"}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishEnvelope {
    pub message_data: String,
    /// Seconds since the Unix epoch, assigned by the publishing server.
    pub created: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<PublisherInfo>,
}

/// Profile of a known user attached to a published message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublisherInfo {
    #[serde(rename = "user_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl From<User> for PublisherInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.user_id,
            name: user.name,
            avatar: user.avatar,
        }
    }
}

impl PublishEnvelope {
    pub fn new(message_data: impl Into<String>, created: i64, user: Option<PublisherInfo>) -> Self {
        Self {
            message_data: message_data.into(),
            created,
            user,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Base64 of the JSON encoding, ready for the broker's `data` field.
    pub fn encode(&self) -> serde_json::Result<String> {
        Ok(STANDARD.encode(self.to_json()?))
    }
}

/// Wrapper the broker POSTs to the push endpoint.
///
/// ```json
/// {"message": {"data": "eyJtZXNzYWdl…", "messageId": "1", "attributes": {}},
///  "subscription": "projects/p/subscriptions/s"}
/// ```
#[derive(Debug, Deserialize)]
pub struct PushEnvelope {
    pub message: PushMessage,
    #[serde(default)]
    pub subscription: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    pub data: String,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub publish_time: Option<String>,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed push envelope: {0}")]
    Envelope(#[from] serde_json::Error),
    #[error("message data is not base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("message data is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl PushEnvelope {
    pub fn parse(body: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// The publisher's payload, unwrapped from the push wrapper.
    pub fn payload(&self) -> Result<String, DecodeError> {
        let bytes = STANDARD.decode(self.message.data.as_bytes())?;
        Ok(String::from_utf8(bytes)?)
    }
}

