use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{document_id, Collection, DocumentStore, Filter};
use crate::codec::Document;
use crate::error::AppError;

/// In-process document store. Each collection is a vector in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: Collection, document: Document) -> Result<(), AppError> {
        let id = document_id(&document)?;
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection).or_default();
        if documents.iter().any(|d| d.get("id") == document.get("id")) {
            return Err(AppError::Conflict(format!(
                "Duplicate id {} in {}",
                id,
                collection.name()
            )));
        }
        documents.push(document);
        Ok(())
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|documents| documents.iter().find(|d| filter.matches(d)))
            .cloned())
    }

    async fn find_many(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|d| filter.matches(d))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update_one(
        &self,
        collection: Collection,
        id: &str,
        fields: Document,
    ) -> Result<bool, AppError> {
        let by_id = Filter::by_id(id);
        let mut collections = self.collections.write().await;
        let Some(document) = collections
            .get_mut(&collection)
            .and_then(|documents| documents.iter_mut().find(|d| by_id.matches(d)))
        else {
            return Ok(false);
        };
        for (name, value) in fields {
            if name != "id" {
                document.insert(name, value);
            }
        }
        Ok(true)
    }

    async fn delete_one(&self, collection: Collection, id: &str) -> Result<bool, AppError> {
        let by_id = Filter::by_id(id);
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(&collection) else {
            return Ok(false);
        };
        match documents.iter().position(|d| by_id.matches(d)) {
            Some(index) => {
                documents.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|documents| documents.iter().filter(|d| filter.matches(d)).count() as u64)
            .unwrap_or(0))
    }
}
