//! Product service: owner-scoped CRUD over one product type

use mongodb::bson::{Document, doc, oid::ObjectId};
use std::sync::Arc;
use tracing::instrument;

use crate::counter::{PRODUCT_ID_COUNTER, SequenceCounter};
use crate::envelope::Envelope;
use crate::error::{InventoryError, InventoryResult};
use crate::gateway::{DocumentGateway, FindAndModify};
use crate::models::{
    FieldBag, NewProduct, ProductPatch, ProductView, Session, parse_record_id, record_id,
    timestamp_now,
};
use crate::schema::{FEED, Operation, ProductSchema, VACCINE};

/// CRUD for the product type described by `schema`
///
/// Every public operation returns an [`Envelope`] and never fails
/// otherwise. The `try_*` helpers hold the actual logic and use `?`;
/// the wrappers fold their result with the operation's fallback message.
pub struct ProductService<G: DocumentGateway> {
    gateway: Arc<G>,
    counter: SequenceCounter<G>,
    schema: &'static ProductSchema,
}

impl<G: DocumentGateway> Clone for ProductService<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            counter: self.counter.clone(),
            schema: self.schema,
        }
    }
}

impl<G: DocumentGateway> ProductService<G> {
    pub fn new(gateway: Arc<G>, schema: &'static ProductSchema) -> Self {
        Self {
            counter: SequenceCounter::new(Arc::clone(&gateway)),
            gateway,
            schema,
        }
    }

    pub fn feed(gateway: Arc<G>) -> Self {
        Self::new(gateway, &FEED)
    }

    pub fn vaccine(gateway: Arc<G>) -> Self {
        Self::new(gateway, &VACCINE)
    }

    pub fn schema(&self) -> &'static ProductSchema {
        self.schema
    }

    fn fallback(&self, operation: Operation) -> String {
        self.schema.fallback_error(operation)
    }

    fn require_id(&self, id: &str) -> InventoryResult<()> {
        if id.trim().is_empty() {
            return Err(InventoryError::Validation(self.schema.id_required()));
        }
        Ok(())
    }

    fn not_found(&self) -> InventoryError {
        InventoryError::NotFound(self.schema.not_found())
    }

    /// An id that can't be an ObjectId names no record
    fn record_id(&self, id: &str) -> InventoryResult<ObjectId> {
        parse_record_id(id).ok_or_else(|| self.not_found())
    }

    fn owned_filter(&self, id: ObjectId, owner: &str) -> Document {
        doc! { "_id": id, "userId": owner }
    }

    /// Validates the fields, allocates a `productId` and stores the record
    ///
    /// `data` is the new record's id. Nothing is allocated or stored when
    /// validation or authorization fails.
    #[instrument(skip(self, session, fields), fields(product = self.schema.label))]
    pub async fn create(&self, session: &Session, fields: &FieldBag) -> Envelope<String> {
        Envelope::from_result(
            self.try_create(session, fields).await,
            &self.fallback(Operation::Create),
        )
    }

    async fn try_create(&self, session: &Session, fields: &FieldBag) -> InventoryResult<String> {
        let product = NewProduct::from_fields(self.schema, fields)?;
        let owner = session.require_owner()?;

        let product_id = self.counter.next_value(PRODUCT_ID_COUNTER).await?;
        let document = product.into_document(self.schema, owner, product_id, &timestamp_now());
        let created = self
            .gateway
            .create(self.schema.collection, document)
            .await?;

        let id = record_id(&created)?;
        tracing::info!(record_id = %id, product_id, "Product created");
        Ok(id)
    }

    /// Reads one record by id without checking who owns it
    ///
    /// Kept for callers that already authorised the id; HTTP routes use
    /// [`Self::get_owned`].
    #[instrument(skip(self), fields(product = self.schema.label))]
    pub async fn get(&self, id: &str) -> Envelope<ProductView> {
        Envelope::from_result(self.try_get(id, None).await, &self.fallback(Operation::Get))
    }

    /// Reads one record by id if it belongs to the session's user
    #[instrument(skip(self, session), fields(product = self.schema.label))]
    pub async fn get_owned(&self, session: &Session, id: &str) -> Envelope<ProductView> {
        let result = match session.require_owner() {
            Ok(owner) => self.try_get(id, Some(owner)).await,
            Err(err) => Err(err),
        };
        Envelope::from_result(result, &self.fallback(Operation::Get))
    }

    async fn try_get(&self, id: &str, owner: Option<&str>) -> InventoryResult<ProductView> {
        self.require_id(id)?;
        let id = self.record_id(id)?;

        let filter = match owner {
            Some(owner) => self.owned_filter(id, owner),
            None => doc! { "_id": id },
        };

        let document = self
            .gateway
            .find_one(self.schema.collection, filter, Some(self.schema.projection()))
            .await?
            .ok_or_else(|| self.not_found())?;

        ProductView::from_document(self.schema, &document)
    }

    /// Every record owned by the session's user, in storage order
    #[instrument(skip(self, session), fields(product = self.schema.label))]
    pub async fn list(&self, session: &Session) -> Envelope<Vec<ProductView>> {
        Envelope::from_result(self.try_list(session).await, &self.fallback(Operation::List))
    }

    async fn try_list(&self, session: &Session) -> InventoryResult<Vec<ProductView>> {
        let owner = session.require_owner()?;

        let documents = self
            .gateway
            .find(self.schema.collection, doc! { "userId": owner })
            .await?;

        documents
            .iter()
            .map(|document| ProductView::from_document(self.schema, document))
            .collect()
    }

    /// Applies the provided fields to a record the session's user owns
    ///
    /// Provided fields are validated like on create and `updatedAt` is
    /// refreshed. A record owned by someone else is reported as not found.
    #[instrument(skip(self, session, fields), fields(product = self.schema.label))]
    pub async fn update(&self, session: &Session, id: &str, fields: &FieldBag) -> Envelope<()> {
        Envelope::from_unit(
            self.try_update(session, id, fields).await,
            &self.fallback(Operation::Update),
        )
    }

    async fn try_update(&self, session: &Session, id: &str, fields: &FieldBag) -> InventoryResult<()> {
        self.require_id(id)?;
        let owner = session.require_owner()?;
        let patch = ProductPatch::from_fields(self.schema, fields)?;
        let id = self.record_id(id)?;

        self.gateway
            .find_one_and_update(
                self.schema.collection,
                self.owned_filter(id, owner),
                doc! { "$set": patch.to_set_document(self.schema, &timestamp_now()) },
                FindAndModify::returning_new(),
            )
            .await?
            .ok_or_else(|| self.not_found())?;

        tracing::info!(record_id = %id, "Product updated");
        Ok(())
    }

    /// Removes a record the session's user owns
    #[instrument(skip(self, session), fields(product = self.schema.label))]
    pub async fn delete(&self, session: &Session, id: &str) -> Envelope<()> {
        Envelope::from_unit(
            self.try_delete(session, id).await,
            &self.fallback(Operation::Delete),
        )
    }

    async fn try_delete(&self, session: &Session, id: &str) -> InventoryResult<()> {
        self.require_id(id)?;
        let owner = session.require_owner()?;
        let id = self.record_id(id)?;
        let filter = self.owned_filter(id, owner);

        self.gateway
            .find_one(self.schema.collection, filter.clone(), None)
            .await?
            .ok_or_else(|| self.not_found())?;

        // A concurrent delete between the check and here leaves nothing to remove.
        let deleted = self
            .gateway
            .delete_one(self.schema.collection, filter)
            .await?;

        tracing::info!(record_id = %id, deleted, "Product deleted");
        Ok(())
    }
}
