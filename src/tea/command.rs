/// Command system for TEA pattern
///
/// Commands represent side effects that should be executed as a result of
/// model updates. The outcome of a store write is only ever observed through
/// the live feed; the executor keeps the write tasks so they can be awaited
/// before the runtime goes away.

use crate::recipe::RecipeFields;
use crate::store::RecipeStore;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Command that can be executed to perform side effects
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Recipe collection writes
    Store(StoreCommand),

    /// Interface effects applied by the terminal front end
    UI(UICommand),
}

/// Recipe collection operations
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCommand {
    Create(RecipeFields),
    Delete(String),
}

/// UI operation commands
#[derive(Debug, Clone, PartialEq)]
pub enum UICommand {
    /// Blocking alert; all other input waits until it is dismissed
    Alert(String),
}

/// Command executor that dispatches commands to the store
pub struct CommandExecutor {
    store: Arc<dyn RecipeStore>,
    pending: Vec<JoinHandle<()>>,
}

impl CommandExecutor {
    /// Create a new command executor
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self {
            store,
            pending: Vec::new(),
        }
    }

    /// Execute a command. UI commands are handed back for the caller to apply.
    pub fn execute(&mut self, command: Command) -> Option<UICommand> {
        match command {
            Command::Store(store_command) => {
                self.execute_store_command(store_command);
                None
            }
            Command::UI(ui_command) => Some(ui_command),
        }
    }

    /// Number of writes that have not finished yet
    pub fn pending_writes(&self) -> usize {
        self.pending.iter().filter(|task| !task.is_finished()).count()
    }

    /// Wait for every write issued so far
    pub async fn flush(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        if !pending.is_empty() {
            tracing::debug!("Waiting for {} store writes", pending.len());
        }
        for task in pending {
            if let Err(e) = task.await {
                tracing::warn!("Store write task ended abnormally: {}", e);
            }
        }
    }

    /// Spawn the write and return immediately. Failures are logged, never surfaced.
    fn execute_store_command(&mut self, command: StoreCommand) {
        self.pending.retain(|task| !task.is_finished());

        let store = Arc::clone(&self.store);
        let task = tokio::spawn(async move {
            match command {
                StoreCommand::Create(fields) => match store.create(fields).await {
                    Ok(id) => tracing::info!("Created recipe {}", id),
                    Err(e) => tracing::warn!("Create in '{}' failed: {}", store.collection(), e),
                },
                StoreCommand::Delete(id) => match store.delete(&id).await {
                    Ok(()) => tracing::info!("Removed recipe {}", id),
                    Err(e) => tracing::warn!(
                        "Delete of {} in '{}' failed: {}",
                        id,
                        store.collection(),
                        e
                    ),
                },
            }
        });
        self.pending.push(task);
    }
}

/// Helper functions for creating common commands
impl Command {
    /// Create a store command
    pub fn store(command: StoreCommand) -> Self {
        Command::Store(command)
    }

    /// Create a UI command
    pub fn ui(command: UICommand) -> Self {
        Command::UI(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::Recipe;
    use crate::store::{MemoryCollection, SnapshotSink, StoreError, StoreResult, SubscriptionHandle};
    use async_trait::async_trait;
    use tokio::sync::mpsc;
    use tokio::time::{timeout, Duration};

    /// Store whose writes always fail
    struct BrokenStore;

    #[async_trait]
    impl RecipeStore for BrokenStore {
        fn collection(&self) -> &str {
            "recipes"
        }

        async fn subscribe(&self, _sink: SnapshotSink) -> StoreResult<SubscriptionHandle> {
            Err(StoreError::DatabaseError("offline".to_string()))
        }

        async fn fetch_all(&self) -> StoreResult<Vec<Recipe>> {
            Err(StoreError::DatabaseError("offline".to_string()))
        }

        async fn create(&self, _fields: RecipeFields) -> StoreResult<String> {
            Err(StoreError::DatabaseError("offline".to_string()))
        }

        async fn delete(&self, _id: &str) -> StoreResult<()> {
            Err(StoreError::DatabaseError("offline".to_string()))
        }
    }

    fn fields() -> RecipeFields {
        RecipeFields {
            title: "Soup".to_string(),
            desc: "Hot".to_string(),
            ingredients: vec!["Water".to_string()],
            steps: vec!["Boil".to_string()],
        }
    }

    #[tokio::test]
    async fn test_create_reaches_the_store() {
        let store = Arc::new(MemoryCollection::new("recipes").unwrap());
        let mut executor = CommandExecutor::new(store.clone());

        let (feed_tx, mut feed_rx) = mpsc::unbounded_channel();
        let _handle = store.subscribe(feed_tx).await.unwrap();
        assert!(feed_rx.recv().await.unwrap().is_empty());

        let ui = executor.execute(Command::store(StoreCommand::Create(fields())));
        assert!(ui.is_none());

        let snapshot = timeout(Duration::from_secs(1), feed_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].title, "Soup");
    }

    #[tokio::test]
    async fn test_flush_waits_for_issued_writes() {
        let store = Arc::new(MemoryCollection::new("recipes").unwrap());
        let mut executor = CommandExecutor::new(store.clone());

        executor.execute(Command::store(StoreCommand::Create(fields())));
        executor.execute(Command::store(StoreCommand::Create(fields())));
        // Nothing has yielded yet, so neither task has run.
        assert_eq!(executor.pending_writes(), 2);

        executor.flush().await;
        assert_eq!(executor.pending_writes(), 0);
        assert_eq!(store.fetch_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_writes_are_swallowed() {
        let mut executor = CommandExecutor::new(Arc::new(BrokenStore));

        assert!(executor
            .execute(Command::store(StoreCommand::Create(fields())))
            .is_none());
        assert!(executor
            .execute(Command::store(StoreCommand::Delete("1".to_string())))
            .is_none());

        executor.flush().await;
        assert_eq!(executor.pending_writes(), 0);
    }

    #[tokio::test]
    async fn test_ui_commands_are_handed_back() {
        let mut executor = CommandExecutor::new(Arc::new(BrokenStore));

        let ui = executor.execute(Command::ui(UICommand::Alert("careful".to_string())));
        assert_eq!(ui, Some(UICommand::Alert("careful".to_string())));
        assert_eq!(executor.pending_writes(), 0);
    }
}
