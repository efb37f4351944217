use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_inventory::{InMemoryGateway, MongoGateway};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::{Config, StoreKind};
use state::{AppState, Store};

async fn open_store(config: &Config) -> eyre::Result<Store> {
    let mongo_config = match (config.store, &config.mongodb) {
        (StoreKind::MongoDb, Some(mongo_config)) => mongo_config,
        (StoreKind::MongoDb, None) => eyre::bail!("MongoDB store selected without MongoDB config"),
        (StoreKind::Memory, _) => {
            warn!("Using the in-memory store; records are lost on restart");
            return Ok(Store::Memory(Arc::new(InMemoryGateway::new())));
        }
    };

    info!("Connecting to MongoDB at {}", mongo_config.redacted_url());

    // Connect to MongoDB with retry
    let client = database::mongodb::connect_from_config_with_retry(mongo_config, None).await?;
    let gateway = MongoGateway::new(client.database(mongo_config.database()));

    info!(
        "Successfully connected to MongoDB database: {}",
        mongo_config.database()
    );

    gateway
        .init_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create inventory indexes: {}", e))?;

    Ok(Store::MongoDb {
        client,
        gateway: Arc::new(gateway),
    })
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let store = open_store(&config).await?;
    let state = AppState { config, store };

    let api_routes = api::routes(&state)?;

    // Create a router with OpenAPI docs
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes, &state.config.server)?;

    // Merge health endpoints
    let app = router.merge(health_router(state.config.app));

    info!("Starting Inventory API with production-ready shutdown (30s timeout)");

    let server_config = state.config.server.clone();
    create_production_app(app, &server_config, Duration::from_secs(30), async move {
        if let Store::MongoDb { client, .. } = state.store {
            info!("Shutting down: closing MongoDB connections");
            client.shutdown().await;
            info!("MongoDB connection closed successfully");
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Inventory API shutdown complete");
    Ok(())
}
