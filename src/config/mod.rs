mod settings;

use config::{Config, ConfigError, Environment, File};

use crate::broker::pubsub_api::DEFAULT_API_BASE_URL;
use crate::cache::MAX_ITEM;
use settings::PartialSettings;

pub use settings::{
    LogSettings, PubSubSettings, RelaySettings, ServerSettings, Settings, StorageSettings,
};


/// Loads the configuration from `config/default.*` (optional) and `RELAY_`
/// environment variables, using `__` between nested keys:
///
/// ```text
/// RELAY_PUBSUB__PROJECT_ID=my-project
/// RELAY_RELAY__TOKEN=s3cret
/// ```
///
/// Missing optional values fall back to defaults; missing required values
/// fail with `ConfigError::NotFound`.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix("RELAY")
                .prefix_separator("_")
                .separator("__"),
        );

    settings_from(builder.build()?)
}

/// Merge a built `Config` with defaults.
pub fn settings_from(config: Config) -> Result<Settings, ConfigError> {
    let partial: PartialSettings = config.try_deserialize()?;

    let server = partial.server.unwrap_or_default();
    let pubsub = partial.pubsub.unwrap_or_default();
    let relay = partial.relay.unwrap_or_default();
    let default_server = ServerSettings::default();

    Ok(Settings {
        server: ServerSettings {
            host: server.host.unwrap_or(default_server.host),
            port: server.port.unwrap_or(default_server.port),
        },
        pubsub: PubSubSettings {
            project_id: required(pubsub.project_id, "pubsub.project_id")?,
            topic: required(pubsub.topic, "pubsub.topic")?,
            subscription: required(pubsub.subscription, "pubsub.subscription")?,
            api_base_url: pubsub
                .api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            access_token: pubsub.access_token.filter(|t| !t.is_empty()),
        },
        relay: RelaySettings {
            push_endpoint: required(relay.push_endpoint, "relay.push_endpoint")?,
            token: required(relay.token, "relay.token")?,
            max_items: relay.max_items.unwrap_or(MAX_ITEM),
        },
        storage: StorageSettings {
            path: partial
                .storage
                .and_then(|s| s.path)
                .unwrap_or_else(|| StorageSettings::default().path),
        },
        log: LogSettings {
            level: partial
                .log
                .and_then(|l| l.level)
                .unwrap_or_else(|| LogSettings::default().level),
        },
    })
}

fn required(value: Option<String>, key: &str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::NotFound(key.to_string()))
}
