/// Recipe store client
///
/// A thin, stateless adapter over a live document collection. Readers
/// subscribe and receive the complete collection on every change; writers
/// create and delete documents and observe the outcome through the feed.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryCollection;
pub use sqlite::SqliteCollection;

use crate::config::{StoreBackend, StoreConfig};
use crate::recipe::{Recipe, RecipeFields};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Collection name used when none is configured
pub const DEFAULT_COLLECTION: &str = "recipes";

/// Recipe store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid collection name: {0:?}")]
    InvalidCollection(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Receiving end of a subscription. Each value is a full snapshot.
pub type SnapshotSink = mpsc::UnboundedSender<Vec<Recipe>>;

/// Live-feed cancellation handle
#[derive(Debug)]
pub struct SubscriptionHandle {
    task: JoinHandle<()>,
}

impl SubscriptionHandle {
    pub(crate) fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    /// Terminate the feed. No snapshots are delivered afterwards.
    pub fn cancel(self) {
        tracing::debug!("Cancelling recipe subscription");
        self.task.abort();
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Operations every recipe collection backend provides
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Name of the underlying collection
    fn collection(&self) -> &str;

    /// Start a live feed: the current snapshot is pushed immediately, then
    /// again after every change to the collection.
    async fn subscribe(&self, sink: SnapshotSink) -> StoreResult<SubscriptionHandle>;

    /// One-shot read of the current snapshot
    async fn fetch_all(&self) -> StoreResult<Vec<Recipe>>;

    /// Add a document; the store assigns and returns its id
    async fn create(&self, fields: RecipeFields) -> StoreResult<String>;

    /// Remove a document. Removing an unknown id succeeds without a change.
    async fn delete(&self, id: &str) -> StoreResult<()>;
}

/// Open the backend selected by configuration
pub async fn open_store(config: &StoreConfig) -> StoreResult<Arc<dyn RecipeStore>> {
    validate_collection(&config.collection)?;

    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory collection '{}'", config.collection);
            Ok(Arc::new(MemoryCollection::new(&config.collection)?))
        }
        StoreBackend::Sqlite => {
            let path = config.resolved_database_path();
            tracing::info!(
                "Using SQLite collection '{}' at {}",
                config.collection,
                path.display()
            );
            let store =
                SqliteCollection::open(&path, &config.collection, config.poll_interval()).await?;
            Ok(Arc::new(store))
        }
    }
}

pub(crate) fn validate_collection(name: &str) -> StoreResult<()> {
    if name.trim().is_empty() || name.contains('/') {
        return Err(StoreError::InvalidCollection(name.to_string()));
    }
    Ok(())
}

pub(crate) fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Map a stored document onto a recipe. Bodies that are not objects, or whose
/// fields have the wrong shape, are skipped.
pub(crate) fn decode_document(id: String, body: Value) -> Option<Recipe> {
    if !body.is_object() {
        tracing::warn!("Skipping document {}: body is not an object", id);
        return None;
    }

    match serde_json::from_value::<RecipeFields>(body) {
        Ok(fields) => Some(Recipe::from_fields(id, fields)),
        Err(e) => {
            tracing::warn!("Skipping document {}: {}", id, e);
            None
        }
    }
}
