//! Application state management.
//!
//! The state holds the configuration and the store every product service
//! is built on. Both services share one gateway, so they share the
//! `productId` counter.

use domain_inventory::{InMemoryGateway, MongoGateway};
use mongodb::Client;
use std::sync::Arc;

/// Backing store selected by `INVENTORY_STORE`
#[derive(Clone)]
pub enum Store {
    MongoDb {
        /// Kept for readiness pings; shares the gateway's connection pool
        client: Client,
        gateway: Arc<MongoGateway>,
    },
    Memory(Arc<InMemoryGateway>),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    pub store: Store,
}
