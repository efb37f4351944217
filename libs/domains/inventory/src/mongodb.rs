//! MongoDB implementation of DocumentGateway

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::ReturnDocument,
};
use tracing::instrument;

use crate::error::InventoryResult;
use crate::gateway::{DocumentGateway, FindAndModify};
use crate::schema::{FEED, VACCINE};

#[derive(Clone)]
pub struct MongoGateway {
    db: Database,
}

impl MongoGateway {
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let gateway = MongoGateway::new(client.database("inventory"));
    /// ```
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }

    /// Creates the `userId` index every owner-scoped query relies on
    ///
    /// Index creation is idempotent, so this runs on every startup.
    #[instrument(skip(self))]
    pub async fn init_indexes(&self) -> InventoryResult<()> {
        for schema in [&FEED, &VACCINE] {
            let index = IndexModel::builder().keys(doc! { "userId": 1 }).build();
            self.collection(schema.collection).create_index(index).await?;
            tracing::info!(collection = schema.collection, "userId index ensured");
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentGateway for MongoGateway {
    #[instrument(skip(self, filter, projection))]
    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
        projection: Option<Document>,
    ) -> InventoryResult<Option<Document>> {
        let coll = self.collection(collection);
        let mut query = coll.find_one(filter);
        if let Some(projection) = projection {
            query = query.projection(projection);
        }
        Ok(query.await?)
    }

    #[instrument(skip(self, filter))]
    async fn find(&self, collection: &str, filter: Document) -> InventoryResult<Vec<Document>> {
        let cursor = self.collection(collection).find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, filter, update))]
    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
        options: FindAndModify,
    ) -> InventoryResult<Option<Document>> {
        let return_document = if options.return_new {
            ReturnDocument::After
        } else {
            ReturnDocument::Before
        };

        let document = self
            .collection(collection)
            .find_one_and_update(filter, update)
            .return_document(return_document)
            .upsert(options.upsert)
            .await?;

        Ok(document)
    }

    #[instrument(skip(self, fields))]
    async fn create(&self, collection: &str, mut fields: Document) -> InventoryResult<Document> {
        let result = self.collection(collection).insert_one(&fields).await?;
        fields.insert("_id", result.inserted_id);
        Ok(fields)
    }

    #[instrument(skip(self, filter))]
    async fn delete_one(&self, collection: &str, filter: Document) -> InventoryResult<u64> {
        let result = self.collection(collection).delete_one(filter).await?;
        Ok(result.deleted_count)
    }
}
