//! In-memory storage implementation

use std::collections::HashMap;
use std::sync::RwLock;

use super::{
    assign_id, Collection, Document, DocumentStore, Filter, StoreResult, Update, UpdateResult,
    ID_FIELD,
};
use crate::error::ServerError;

/// In-memory document store
pub struct InMemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryStore {
    fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn find(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().unwrap();
        Ok(collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default())
    }

    fn insert_one(&self, collection: Collection, mut document: Document) -> StoreResult<String> {
        let id = assign_id(&mut document)?;
        let mut collections = self.collections.write().unwrap();
        let docs = collections.entry(collection).or_default();
        if docs
            .iter()
            .any(|d| d.get(ID_FIELD).and_then(|v| v.as_str()) == Some(id.as_str()))
        {
            return Err(ServerError::Validation(format!("duplicate _id {}", id)));
        }
        docs.push(document);
        Ok(id)
    }

    fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        update: &Update,
    ) -> StoreResult<UpdateResult> {
        let mut collections = self.collections.write().unwrap();
        let target = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| filter.matches(d)));

        Ok(match target {
            Some(document) => UpdateResult::matched(update.apply(document)),
            None => UpdateResult::unmatched(),
        })
    }

    fn delete_one(&self, collection: Collection, filter: &Filter) -> StoreResult<u64> {
        let mut collections = self.collections.write().unwrap();
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(0);
        };
        match docs.iter().position(|d| filter.matches(d)) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
