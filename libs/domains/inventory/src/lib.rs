//! Inventory Domain
//!
//! Owner-scoped feed and vaccine records stored in MongoDB, with product
//! ids drawn from a shared atomic counter.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, one router per product type
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, owner scoping, result envelope
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Gateway   │  ← Document store seam (MongoDB or in-memory)
//! └─────────────┘
//! ```
//!
//! Every service operation returns an [`Envelope`] instead of failing.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_inventory::{MongoGateway, ProductService, handlers};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = mongodb::Client::with_uri_str("mongodb://localhost:27017").await?;
//! let gateway = Arc::new(MongoGateway::new(client.database("inventory")));
//!
//! let feeds = handlers::router(ProductService::feed(Arc::clone(&gateway)));
//! let vaccines = handlers::router(ProductService::vaccine(gateway));
//! # Ok(())
//! # }
//! ```

pub mod counter;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod schema;
pub mod service;
pub mod validation;

pub use self::mongodb::MongoGateway;
pub use counter::{COUNTER_COLLECTION, PRODUCT_ID_COUNTER, SequenceCounter};
pub use envelope::{Envelope, Status};
pub use error::{InventoryError, InventoryResult};
pub use gateway::{DocumentGateway, FindAndModify};
pub use handlers::ApiDoc;
pub use memory::InMemoryGateway;
pub use models::{FieldBag, NewProduct, ProductPatch, ProductStatus, ProductView, Quantity, Session};
pub use schema::{FEED, Operation, ProductSchema, VACCINE};
pub use service::ProductService;
