use serde::Deserialize;
use url::Url;

/// Top-level configuration settings for the relay.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub pubsub: PubSubSettings,
    pub relay: RelaySettings,
    pub storage: StorageSettings,
    pub log: LogSettings,
}

/// Address the HTTP server binds to.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Broker project and resource names.
#[derive(Debug, Deserialize, Clone)]
pub struct PubSubSettings {
    pub project_id: String,
    pub topic: String,
    pub subscription: String,
    pub api_base_url: String,
    pub access_token: Option<String>,
}

/// Push endpoint and delivery settings.
#[derive(Debug, Deserialize, Clone)]
pub struct RelaySettings {
    /// Public base URL of this service, as reachable by the broker.
    pub push_endpoint: String,
    /// Shared secret the broker must present on every push callback.
    pub token: String,
    pub max_items: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

impl RelaySettings {
    /// `{push_endpoint}/receive_message?token={token}`
    pub fn push_endpoint_url(&self) -> Result<Url, url::ParseError> {
        let base = Url::parse(&format!("{}/", self.push_endpoint.trim_end_matches('/')))?;
        let mut url = base.join("receive_message")?;
        url.query_pairs_mut().append_pair("token", &self.token);
        Ok(url)
    }
}

/// Partial configuration settings loaded from files or environment.
///
/// Everything is optional here; `load_config` fills gaps from the defaults
/// below and reports required settings that are still missing.
#[derive(Debug, Default, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub pubsub: Option<PartialPubSubSettings>,
    pub relay: Option<PartialRelaySettings>,
    pub storage: Option<PartialStorageSettings>,
    pub log: Option<PartialLogSettings>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialPubSubSettings {
    pub project_id: Option<String>,
    pub topic: Option<String>,
    pub subscription: Option<String>,
    pub api_base_url: Option<String>,
    pub access_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialRelaySettings {
    pub push_endpoint: Option<String>,
    pub token: Option<String>,
    pub max_items: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialStorageSettings {
    pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: "relay_db".to_string(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

