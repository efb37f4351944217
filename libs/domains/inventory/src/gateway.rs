//! Document store seam
//!
//! Filters, projections and update documents use MongoDB syntax. The
//! service only emits equality filters, inclusion projections and the
//! `$set` / `$inc` operators, which is all an implementation has to honour.

use async_trait::async_trait;
use mongodb::bson::Document;

use crate::error::InventoryResult;

/// Options for [`DocumentGateway::find_one_and_update`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindAndModify {
    /// Return the document as it is after the update instead of before
    pub return_new: bool,
    /// Insert a document built from the filter when nothing matches
    pub upsert: bool,
}

impl FindAndModify {
    /// `{new: true, upsert: true}`
    pub const fn upsert_returning_new() -> Self {
        Self {
            return_new: true,
            upsert: true,
        }
    }

    /// `{new: true}`
    pub const fn returning_new() -> Self {
        Self {
            return_new: true,
            upsert: false,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentGateway: Send + Sync {
    /// First document matching `filter`, optionally reduced to `projection`
    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
        projection: Option<Document>,
    ) -> InventoryResult<Option<Document>>;

    /// Every document matching `filter`, in storage order
    async fn find(&self, collection: &str, filter: Document) -> InventoryResult<Vec<Document>>;

    /// Atomically applies `update` to the first match
    ///
    /// `None` when nothing matched and `upsert` is off, or when the
    /// pre-update document was requested for an upserted insert.
    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
        options: FindAndModify,
    ) -> InventoryResult<Option<Document>>;

    /// Inserts `fields` and returns the stored document including its `_id`
    async fn create(&self, collection: &str, fields: Document) -> InventoryResult<Document>;

    /// Removes the first match and returns how many documents were deleted
    async fn delete_one(&self, collection: &str, filter: Document) -> InventoryResult<u64>;
}
