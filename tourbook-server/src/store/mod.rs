//! Document storage for the server
//!
//! Records live in named collections as JSON objects keyed by `_id`.
//! Backends implement the blocking [`DocumentStore`] verbs; request
//! handlers reach them through [`StoreHandle`], which moves each call onto
//! the blocking pool and bounds it with a timeout.

pub mod memory;
pub mod models;
pub mod query;
pub mod sqlite;

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

pub use memory::InMemoryStore;
pub use models::*;
pub use query::{Filter, Update, UpdateResult};
pub use sqlite::SqliteStore;

use crate::error::ServerError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, ServerError>;

/// A stored JSON object
pub type Document = Map<String, Value>;

/// Field holding a document's identifier
pub const ID_FIELD: &str = "_id";

/// Named groups of documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Packages,
    TourTypes,
    TourGuides,
    Bookings,
    Wishlists,
    Stories,
    RoleRequests,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Packages => "packages",
            Collection::TourTypes => "tourTypes",
            Collection::TourGuides => "tourGuides",
            Collection::Bookings => "bookings",
            Collection::Wishlists => "wishlists",
            Collection::Stories => "stories",
            Collection::RoleRequests => "roleRequests",
        }
    }
}

/// Trait for document storage backends
pub trait DocumentStore: Send + Sync {
    /// Check the backend is reachable
    fn ping(&self) -> StoreResult<()>;

    /// All documents in a collection matching the filter, in insertion order
    fn find(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<Document>>;

    /// First document matching the filter
    fn find_one(&self, collection: Collection, filter: &Filter) -> StoreResult<Option<Document>> {
        Ok(self.find(collection, filter)?.into_iter().next())
    }

    /// Insert a document, assigning an `_id` if it has none. Returns the id.
    fn insert_one(&self, collection: Collection, document: Document) -> StoreResult<String>;

    /// Apply an update to the first document matching the filter
    fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        update: &Update,
    ) -> StoreResult<UpdateResult>;

    /// Delete the first document matching the filter. Returns the number deleted.
    fn delete_one(&self, collection: Collection, filter: &Filter) -> StoreResult<u64>;

    /// Number of documents matching the filter
    fn count(&self, collection: Collection, filter: &Filter) -> StoreResult<u64> {
        Ok(self.find(collection, filter)?.len() as u64)
    }
}

/// Ensure a document has a string `_id`, generating one when absent
pub(crate) fn assign_id(document: &mut Document) -> StoreResult<String> {
    match document.get(ID_FIELD) {
        None | Some(Value::Null) => {
            let id = uuid::Uuid::new_v4().to_string();
            document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            Ok(id)
        }
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        Some(_) => Err(ServerError::Validation("_id must be a non-empty string".to_string())),
    }
}

/// Shared async access to a document store
pub struct StoreHandle<D> {
    store: Arc<D>,
    timeout: Duration,
}

impl<D> Clone for StoreHandle<D> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            timeout: self.timeout,
        }
    }
}

impl<D: DocumentStore + 'static> StoreHandle<D> {
    pub fn new(store: D, timeout: Duration) -> Self {
        Self {
            store: Arc::new(store),
            timeout,
        }
    }

    /// The underlying backend
    pub fn backend(&self) -> &D {
        self.store.as_ref()
    }

    async fn run<T, F>(&self, op: &'static str, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&D) -> StoreResult<T> + Send + 'static,
    {
        let store = self.store.clone();
        let task = tokio::task::spawn_blocking(move || f(store.as_ref()));

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(ServerError::Internal(format!("{} failed: {}", op, join_err))),
            Err(_) => Err(ServerError::StoreTimeout(op)),
        }
    }

    pub async fn ping(&self) -> StoreResult<()> {
        self.run("ping", |store| store.ping()).await
    }

    pub async fn find<T>(&self, collection: Collection, filter: Filter) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let documents = self
            .run("find", move |store| store.find(collection, &filter))
            .await?;
        documents.into_iter().map(decode).collect()
    }

    pub async fn find_one<T>(&self, collection: Collection, filter: Filter) -> StoreResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let document = self
            .run("find_one", move |store| store.find_one(collection, &filter))
            .await?;
        document.map(decode).transpose()
    }

    pub async fn insert_one<T: Serialize>(&self, collection: Collection, record: &T) -> StoreResult<String> {
        let document = encode(record)?;
        self.run("insert_one", move |store| store.insert_one(collection, document))
            .await
    }

    pub async fn update_one(
        &self,
        collection: Collection,
        filter: Filter,
        update: Update,
    ) -> StoreResult<UpdateResult> {
        self.run("update_one", move |store| {
            store.update_one(collection, &filter, &update)
        })
        .await
    }

    pub async fn delete_one(&self, collection: Collection, filter: Filter) -> StoreResult<u64> {
        self.run("delete_one", move |store| store.delete_one(collection, &filter))
            .await
    }

    pub async fn count(&self, collection: Collection, filter: Filter) -> StoreResult<u64> {
        self.run("count", move |store| store.count(collection, &filter))
            .await
    }
}

/// Turn a typed record into a document
pub fn encode<T: Serialize>(record: &T) -> StoreResult<Document> {
    match serde_json::to_value(record)? {
        Value::Object(document) => Ok(document),
        other => Err(ServerError::Internal(format!(
            "record did not serialize to an object: {}",
            other
        ))),
    }
}

/// Turn a stored document into a typed record
pub fn decode<T: DeserializeOwned>(document: Document) -> StoreResult<T> {
    serde_json::from_value(Value::Object(document))
        .map_err(|e| ServerError::Internal(format!("malformed stored document: {}", e)))
}
