//! Storage abstractions and the embedded SurrealDB implementation
//!
//! Every record lives in SurrealDB under a string key. Foreign keys are
//! stored as plain id strings and delete rules are applied explicitly by the
//! store, so the same rules hold for the in-memory and RocksDB engines.

pub mod errors;
pub mod filters;
pub mod surreal;
pub mod traits;

use std::sync::Arc;

pub use errors::{StorageError, StorageResult};
pub use filters::{MemoryFilter, PlaceFilter};
pub use surreal::{EmbeddedStore, SurrealStore};
pub use traits::{
    BaseStore, BookmarkStore, CommentStore, InferenceStore, MemoryStore, PlaceStore,
    SavedPlaceStore, Store, TagStore, UserStore,
};

use crate::config::{StorageConfig, StorageEngine};

/// Open the configured storage engine.
pub async fn create_storage_service(
    config: &StorageConfig,
) -> Result<Arc<dyn Store>, StorageError> {
    let store = match config.engine {
        StorageEngine::Memory => {
            tracing::info!("Creating in-memory store");
            let client = surrealdb::Surreal::new::<surrealdb::engine::local::Mem>(())
                .await
                .map_err(|e| {
                    StorageError::Connection(format!("Failed to create memory client: {}", e))
                })?;
            SurrealStore::new(client, &config.namespace, &config.database).await?
        }
        StorageEngine::RocksDb => {
            let path = config.db_path();
            tracing::info!("Creating RocksDB store at {}", path.display());
            std::fs::create_dir_all(&path)?;
            let client = surrealdb::Surreal::new::<surrealdb::engine::local::RocksDb>(
                path.to_string_lossy().to_string(),
            )
            .await
            .map_err(|e| {
                StorageError::Connection(format!("Failed to create RocksDB client: {}", e))
            })?;
            SurrealStore::new(client, &config.namespace, &config.database).await?
        }
    };

    Ok(Arc::new(store))
}
