use crate::recipe::{Recipe, RecipeFields};
use crate::store::{
    decode_document, new_document_id, validate_collection, RecipeStore, SnapshotSink,
    StoreError, StoreResult, SubscriptionHandle,
};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;
use tokio::sync::broadcast;
use tokio::time::{Duration, MissedTickBehavior};

/// Document collection persisted in a SQLite file
///
/// Every write made through this handle pushes a snapshot to subscribers
/// immediately, even when the resulting content is unchanged. Writes made by
/// other processes sharing the file are picked up on the next poll that sees
/// a difference.
pub struct SqliteCollection {
    pool: Pool<Sqlite>,
    name: String,
    poll_interval: Duration,
    changes: broadcast::Sender<()>,
}

impl SqliteCollection {
    /// Open (creating if needed) the database file at `path`
    pub async fn open(path: &Path, name: &str, poll_interval: Duration) -> StoreResult<Self> {
        validate_collection(name)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::DatabaseError(format!(
                        "Failed to create {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        let (changes, _) = broadcast::channel(16);
        let collection = Self {
            pool,
            name: name.to_string(),
            poll_interval,
            changes,
        };
        collection.init_tables().await?;
        Ok(collection)
    }

    async fn init_tables(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn load_snapshot(pool: &Pool<Sqlite>, collection: &str) -> StoreResult<Vec<Recipe>> {
        let rows = sqlx::query("SELECT id, body FROM documents WHERE collection = ? ORDER BY id")
            .bind(collection)
            .fetch_all(pool)
            .await
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        let mut recipes = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.get("id");
            let body: String = row.get("body");
            match serde_json::from_str(&body) {
                Ok(value) => recipes.extend(decode_document(id, value)),
                Err(e) => tracing::warn!("Skipping document {}: invalid JSON: {}", id, e),
            }
        }
        Ok(recipes)
    }

    fn notify(&self) {
        let _ = self.changes.send(());
    }
}

#[async_trait]
impl RecipeStore for SqliteCollection {
    fn collection(&self) -> &str {
        &self.name
    }

    async fn subscribe(&self, sink: SnapshotSink) -> StoreResult<SubscriptionHandle> {
        let pool = self.pool.clone();
        let collection = self.name.clone();
        let mut changes = self.changes.subscribe();
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // Read once up front so a broken database fails the subscribe call.
        let initial = Self::load_snapshot(&pool, &collection).await?;

        let task = tokio::spawn(async move {
            if sink.send(initial.clone()).is_err() {
                return;
            }
            let mut last = initial;

            loop {
                // Local writes always publish. Polls only publish what differs.
                let notified = tokio::select! {
                    result = changes.recv() => match result {
                        Err(broadcast::error::RecvError::Closed) => break,
                        Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => true,
                    },
                    _ = ticker.tick() => false,
                };

                match Self::load_snapshot(&pool, &collection).await {
                    Ok(snapshot) if notified || snapshot != last => {
                        if sink.send(snapshot.clone()).is_err() {
                            break;
                        }
                        last = snapshot;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!("Live feed on '{}' stopped: {}", collection, e);
                        break;
                    }
                }
            }
        });

        Ok(SubscriptionHandle::new(task))
    }

    async fn fetch_all(&self) -> StoreResult<Vec<Recipe>> {
        Self::load_snapshot(&self.pool, &self.name).await
    }

    async fn create(&self, fields: RecipeFields) -> StoreResult<String> {
        let body = serde_json::to_string(&fields)?;
        let id = new_document_id();

        sqlx::query("INSERT INTO documents (collection, id, body) VALUES (?, ?, ?)")
            .bind(&self.name)
            .bind(&id)
            .bind(&body)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        tracing::debug!("Created document {} in '{}'", id, self.name);
        self.notify();
        Ok(id)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(&self.name)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        if result.rows_affected() > 0 {
            tracing::debug!("Deleted document {} from '{}'", id, self.name);
            self.notify();
        }
        Ok(())
    }
}
