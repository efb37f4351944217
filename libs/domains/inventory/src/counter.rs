//! Named sequence counters used to mint product ids

use mongodb::bson::{Bson, doc};
use std::sync::Arc;
use tracing::instrument;

use crate::error::{InventoryError, InventoryResult};
use crate::gateway::{DocumentGateway, FindAndModify};

/// Collection holding one `{_id: name, sequence_value}` document per counter
pub const COUNTER_COLLECTION: &str = "counter";

/// Counter shared by every product type
pub const PRODUCT_ID_COUNTER: &str = "productId";

const SEQUENCE_FIELD: &str = "sequence_value";

/// Allocates strictly increasing integers per counter name
///
/// Each allocation is a single upserting find-and-modify, so concurrent
/// callers never observe the same value and the first allocation for a new
/// name returns 1. Values are never handed back: a caller that fails after
/// allocating leaves a gap.
pub struct SequenceCounter<G> {
    gateway: Arc<G>,
}

impl<G> Clone for SequenceCounter<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<G: DocumentGateway> SequenceCounter<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    #[instrument(skip(self))]
    pub async fn next_value(&self, name: &str) -> InventoryResult<i64> {
        let counter = self
            .gateway
            .find_one_and_update(
                COUNTER_COLLECTION,
                doc! { "_id": name },
                doc! { "$inc": { "sequence_value": 1 } },
                FindAndModify::upsert_returning_new(),
            )
            .await?
            .ok_or_else(|| {
                InventoryError::Internal(format!("counter '{name}' missing after upsert"))
            })?;

        let value = match counter.get(SEQUENCE_FIELD) {
            Some(Bson::Int32(v)) => i64::from(*v),
            Some(Bson::Int64(v)) => *v,
            Some(Bson::Double(v)) if v.fract() == 0.0 => *v as i64,
            other => {
                return Err(InventoryError::Internal(format!(
                    "counter '{name}' holds a non-integer value: {other:?}"
                )));
            }
        };

        tracing::debug!(counter = name, value, "Sequence value allocated");
        Ok(value)
    }
}
