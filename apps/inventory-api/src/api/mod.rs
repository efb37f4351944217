//! API routes module
//!
//! Feeds and vaccines share one store, so they share the product id counter.

pub mod feeds;
pub mod health;
pub mod vaccines;

use axum::{Router, middleware};
use axum_helpers::{SessionConfig, session_middleware};

use crate::state::{AppState, Store};

/// Create all API routes
/// Note: These are nested under /api by axum_helpers::create_router
pub fn routes(state: &AppState) -> eyre::Result<Router> {
    let products = match &state.store {
        Store::MongoDb { gateway, .. } => Router::new()
            .nest("/feeds", feeds::router(gateway.clone()))
            .nest("/vaccines", vaccines::router(gateway.clone())),
        Store::Memory(gateway) => Router::new()
            .nest("/feeds", feeds::router(gateway.clone()))
            .nest("/vaccines", vaccines::router(gateway.clone())),
    };

    let session = SessionConfig::new(&state.config.server.session_header)?;

    Ok(products
        .layer(middleware::from_fn_with_state(session, session_middleware))
        .merge(health::router(state.clone())))
}
