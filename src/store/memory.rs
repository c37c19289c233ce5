use crate::recipe::{Recipe, RecipeFields};
use crate::store::{
    decode_document, new_document_id, validate_collection, RecipeStore, SnapshotSink,
    StoreResult, SubscriptionHandle,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

const CHANGE_BUFFER: usize = 64;

/// In-process document collection with live snapshots
pub struct MemoryCollection {
    name: String,
    documents: Arc<Mutex<BTreeMap<String, Value>>>,
    changes: broadcast::Sender<Vec<Recipe>>,
}

impl MemoryCollection {
    pub fn new(name: &str) -> StoreResult<Self> {
        validate_collection(name)?;
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Ok(Self {
            name: name.to_string(),
            documents: Arc::new(Mutex::new(BTreeMap::new())),
            changes,
        })
    }

    /// Write a raw document body under a caller-chosen id, as another client
    /// of the collection might.
    pub async fn put_document(&self, id: &str, body: Value) {
        let mut documents = self.documents.lock().await;
        documents.insert(id.to_string(), body);
        self.publish(&documents);
    }

    fn snapshot(documents: &BTreeMap<String, Value>) -> Vec<Recipe> {
        documents
            .iter()
            .filter_map(|(id, body)| decode_document(id.clone(), body.clone()))
            .collect()
    }

    // Called with the lock held so snapshots go out in mutation order.
    fn publish(&self, documents: &BTreeMap<String, Value>) {
        // No receivers is not an error: nobody is subscribed yet.
        let _ = self.changes.send(Self::snapshot(documents));
    }
}

#[async_trait]
impl RecipeStore for MemoryCollection {
    fn collection(&self) -> &str {
        &self.name
    }

    async fn subscribe(&self, sink: SnapshotSink) -> StoreResult<SubscriptionHandle> {
        let (initial, mut changes) = {
            let documents = self.documents.lock().await;
            (Self::snapshot(&documents), self.changes.subscribe())
        };
        let collection = self.name.clone();

        let task = tokio::spawn(async move {
            if sink.send(initial).is_err() {
                return;
            }
            loop {
                match changes.recv().await {
                    Ok(snapshot) => {
                        if sink.send(snapshot).is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(
                            "Subscriber on '{}' skipped {} stale snapshots",
                            collection,
                            skipped
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            tracing::debug!("Live feed on '{}' ended", collection);
        });

        Ok(SubscriptionHandle::new(task))
    }

    async fn fetch_all(&self) -> StoreResult<Vec<Recipe>> {
        let documents = self.documents.lock().await;
        Ok(Self::snapshot(&documents))
    }

    async fn create(&self, fields: RecipeFields) -> StoreResult<String> {
        let body = serde_json::to_value(&fields)?;
        let id = new_document_id();

        let mut documents = self.documents.lock().await;
        documents.insert(id.clone(), body);
        self.publish(&documents);

        tracing::debug!("Created document {} in '{}'", id, self.name);
        Ok(id)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut documents = self.documents.lock().await;
        if documents.remove(id).is_some() {
            self.publish(&documents);
            tracing::debug!("Deleted document {} from '{}'", id, self.name);
        }
        Ok(())
    }
}
