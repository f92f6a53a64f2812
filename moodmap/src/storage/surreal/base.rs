//! BaseStore implementation

use async_trait::async_trait;
use serde_json::json;
use surrealdb::Connection;

use super::SurrealStore;
use super::schema::TABLES;
use crate::storage::errors::StorageError;
use crate::storage::traits::BaseStore;

#[async_trait]
impl<C> BaseStore for SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn health_check(&self) -> Result<bool, StorageError> {
        match self.client.query("RETURN true").await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Storage health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError> {
        let mut counts = serde_json::Map::new();
        for table in TABLES {
            let total = self.count(*table, "", vec![]).await?;
            counts.insert(table.to_string(), json!(total));
        }

        Ok(json!({
            "type": "surrealdb",
            "namespace": self.namespace,
            "database": self.database,
            "records": counts,
        }))
    }
}
