//! In-process DocumentGateway for local runs and tests
//!
//! Collections live behind one `RwLock`, so every write, including
//! find-and-modify, is atomic with respect to other callers.

use async_trait::async_trait;
use mongodb::bson::{Bson, Document, oid::ObjectId};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::{InventoryError, InventoryResult};
use crate::gateway::{DocumentGateway, FindAndModify};

#[derive(Default)]
pub struct InMemoryGateway {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently stored in `collection`
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

fn unsupported(what: &str, key: &str) -> InventoryError {
    InventoryError::Internal(format!("in-memory gateway does not support {what} '{key}'"))
}

/// Equality match on every filter key
fn matches(document: &Document, filter: &Document) -> InventoryResult<bool> {
    for (key, expected) in filter {
        if key.starts_with('$') {
            return Err(unsupported("query operator", key));
        }
        if let Bson::Document(inner) = expected {
            if let Some(op) = inner.keys().find(|k| k.starts_with('$')) {
                return Err(unsupported("query operator", op));
            }
        }
        if document.get(key) != Some(expected) {
            return Ok(false);
        }
    }
    Ok(true)
}

fn is_included(flag: &Bson) -> bool {
    match flag {
        Bson::Int32(v) => *v != 0,
        Bson::Int64(v) => *v != 0,
        Bson::Double(v) => *v != 0.0,
        Bson::Boolean(v) => *v,
        _ => false,
    }
}

/// Inclusion projection; `_id` is kept unless excluded explicitly
fn project(document: &Document, projection: &Document) -> Document {
    let keep_id = projection.get("_id").is_none_or(is_included);

    document
        .iter()
        .filter(|(key, _)| {
            if key.as_str() == "_id" {
                keep_id
            } else {
                projection.get(key.as_str()).is_some_and(is_included)
            }
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn increment(current: Option<&Bson>, by: &Bson, key: &str) -> InventoryResult<Bson> {
    let value = match (current, by) {
        (None, by @ (Bson::Int32(_) | Bson::Int64(_))) => by.clone(),
        (Some(Bson::Int32(a)), Bson::Int32(b)) => a
            .checked_add(*b)
            .map(Bson::Int32)
            .unwrap_or(Bson::Int64(i64::from(*a) + i64::from(*b))),
        (Some(Bson::Int32(a)), Bson::Int64(b)) => Bson::Int64(i64::from(*a) + b),
        (Some(Bson::Int64(a)), Bson::Int32(b)) => Bson::Int64(a + i64::from(*b)),
        (Some(Bson::Int64(a)), Bson::Int64(b)) => Bson::Int64(a + b),
        _ => {
            return Err(InventoryError::Internal(format!(
                "cannot $inc non-integer field '{key}'"
            )));
        }
    };
    Ok(value)
}

fn apply_update(document: &mut Document, update: &Document) -> InventoryResult<()> {
    for (op, fields) in update {
        let Bson::Document(fields) = fields else {
            return Err(InventoryError::Internal(format!(
                "operator '{op}' expects a document"
            )));
        };
        match op.as_str() {
            "$set" => {
                for (key, value) in fields {
                    document.insert(key.clone(), value.clone());
                }
            }
            "$inc" => {
                for (key, by) in fields {
                    let next = increment(document.get(key), by, key)?;
                    document.insert(key.clone(), next);
                }
            }
            other => return Err(unsupported("update operator", other)),
        }
    }
    Ok(())
}

fn ensure_id(document: &mut Document) {
    if !document.contains_key("_id") {
        document.insert("_id", ObjectId::new());
    }
}

#[async_trait]
impl DocumentGateway for InMemoryGateway {
    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
        projection: Option<Document>,
    ) -> InventoryResult<Option<Document>> {
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(None);
        };

        for document in documents {
            if matches(document, &filter)? {
                let found = match &projection {
                    Some(projection) => project(document, projection),
                    None => document.clone(),
                };
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    async fn find(&self, collection: &str, filter: Document) -> InventoryResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut found = Vec::new();
        for document in collections.get(collection).into_iter().flatten() {
            if matches(document, &filter)? {
                found.push(document.clone());
            }
        }
        Ok(found)
    }

    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
        options: FindAndModify,
    ) -> InventoryResult<Option<Document>> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        let mut position = None;
        for (index, document) in documents.iter().enumerate() {
            if matches(document, &filter)? {
                position = Some(index);
                break;
            }
        }

        if let Some(index) = position {
            let before = documents[index].clone();
            let mut after = before.clone();
            apply_update(&mut after, &update)?;
            documents[index] = after.clone();
            return Ok(Some(if options.return_new { after } else { before }));
        }

        if !options.upsert {
            return Ok(None);
        }

        let mut inserted = filter;
        apply_update(&mut inserted, &update)?;
        ensure_id(&mut inserted);
        documents.push(inserted.clone());

        Ok(options.return_new.then_some(inserted))
    }

    async fn create(&self, collection: &str, mut fields: Document) -> InventoryResult<Document> {
        ensure_id(&mut fields);
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(fields.clone());
        Ok(fields)
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> InventoryResult<u64> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let mut position = None;
        for (index, document) in documents.iter().enumerate() {
            if matches(document, &filter)? {
                position = Some(index);
                break;
            }
        }

        Ok(match position {
            Some(index) => {
                documents.remove(index);
                1
            }
            None => 0,
        })
    }
}
