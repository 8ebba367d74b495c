//! CLI for pushrelay
//!
//! Subcommands:
//! - `serve` (default): provision the broker and run the HTTP relay
//! - `provision`: create the topic and push subscription, then exit

use std::sync::Arc;

use clap::{Parser, Subcommand};
use pushrelay::app::AppState;
use pushrelay::broker::{Broker, PubSubClient, Provisioner};
use pushrelay::cache::MemoryCache;
use pushrelay::config::{Settings, load_config};
use pushrelay::persistence::Persistence;
use pushrelay::transport::build_router;
use pushrelay::utils::error::RelayError;
use pushrelay::utils::logging;
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "pushrelay", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Provision the broker, then serve HTTP until interrupted
    Serve,
    /// Make sure the topic and push subscription exist, then exit
    Provision,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            logging::init("info");
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    logging::init(&settings.log.level);

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(settings).await,
        Command::Provision => run_provision(settings).await,
    };

    if let Err(e) = result {
        error!("pushrelay failed: {}", e);
        std::process::exit(1);
    }
}

fn broker_from(settings: &Settings) -> Arc<dyn Broker> {
    let pubsub = &settings.pubsub;
    Arc::new(PubSubClient::new(
        reqwest::Client::new(),
        &pubsub.api_base_url,
        &pubsub.project_id,
        pubsub.access_token.clone(),
    ))
}

async fn run_server(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let broker = broker_from(&settings);
    let persistence = Arc::new(Persistence::open(&settings.storage.path)?);
    let state = AppState::new(
        &settings,
        broker,
        persistence.clone(),
        Arc::new(MemoryCache::new()),
    )?;

    state
        .provisioner
        .provision()
        .await
        .map_err(RelayError::Provisioning)?;

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Relay listening on {}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received. Exiting gracefully.");
        })
        .await?;

    persistence.flush()?;
    Ok(())
}

async fn run_provision(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let endpoint = settings.relay.push_endpoint_url()?;
    let provisioner = Provisioner::new(
        broker_from(&settings),
        &settings.pubsub.topic,
        &settings.pubsub.subscription,
        endpoint.as_str(),
    );

    provisioner
        .provision()
        .await
        .map_err(RelayError::Provisioning)?;
    info!(
        topic = %settings.pubsub.topic,
        subscription = %settings.pubsub.subscription,
        "broker provisioned"
    );
    Ok(())
}
