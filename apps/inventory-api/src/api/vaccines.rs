//! Vaccine API routes

use axum::Router;
use domain_inventory::{DocumentGateway, ProductService, handlers};
use std::sync::Arc;

pub fn router<G: DocumentGateway + 'static>(gateway: Arc<G>) -> Router {
    handlers::router(ProductService::vaccine(gateway))
}
