//! Embedded SurrealDB store
//!
//! Records are keyed by string ids. Reads project `record::id(id)` into a
//! plain `id` field so rows deserialize straight into the domain models.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use surrealdb::{Connection, Surreal};

use crate::storage::errors::StorageError;

pub mod base;
pub mod inference;
pub mod memories;
pub mod places;
pub mod schema;
pub mod social;
pub mod tags;
pub mod users;

/// Store over an embedded engine (in-memory or RocksDB)
pub type EmbeddedStore = SurrealStore<surrealdb::engine::local::Db>;

/// Field list used by every read.
pub(crate) const PROJECTION: &str = "*, record::id(id) AS id";

pub(crate) type Binds = Vec<(&'static str, Value)>;

#[derive(serde::Deserialize)]
pub(crate) struct IdRow {
    #[allow(dead_code)]
    pub id: String,
}

#[derive(serde::Deserialize)]
pub(crate) struct CountRow {
    pub total: usize,
}

/// SurrealDB-backed implementation of every store trait
#[derive(Debug, Clone)]
pub struct SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    pub(crate) client: Surreal<C>,
    pub(crate) namespace: String,
    pub(crate) database: String,
}

impl<C> SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    /// Select namespace and database, then make sure the schema exists.
    pub async fn new(
        client: Surreal<C>,
        namespace: &str,
        database: &str,
    ) -> Result<Self, StorageError> {
        client.use_ns(namespace).use_db(database).await.map_err(|e| {
            StorageError::Connection(format!("Failed to set namespace/database: {}", e))
        })?;

        schema::initialize_schema(&client).await?;

        Ok(Self {
            client,
            namespace: namespace.to_string(),
            database: database.to_string(),
        })
    }

    /// Get the underlying client for advanced operations
    pub fn client(&self) -> &Surreal<C> {
        &self.client
    }

    /// Run a query and deserialize the result of statement `index`.
    pub(crate) async fn rows_at<T: DeserializeOwned>(
        &self,
        sql: impl Into<String>,
        binds: Binds,
        index: usize,
        context: &str,
    ) -> Result<Vec<T>, StorageError> {
        let mut query = self.client.query(sql.into());
        for bind in binds {
            query = query.bind(bind);
        }

        let response = query.await.map_err(|e| query_error(context, e))?;
        let mut response = response.check().map_err(|e| query_error(context, e))?;
        response.take(index).map_err(|e| query_error(context, e))
    }

    pub(crate) async fn rows<T: DeserializeOwned>(
        &self,
        sql: impl Into<String>,
        binds: Binds,
        context: &str,
    ) -> Result<Vec<T>, StorageError> {
        self.rows_at(sql, binds, 0, context).await
    }

    /// Run statements that return nothing the caller needs.
    pub(crate) async fn execute(
        &self,
        sql: impl Into<String>,
        binds: Binds,
        context: &str,
    ) -> Result<(), StorageError> {
        let mut query = self.client.query(sql.into());
        for bind in binds {
            query = query.bind(bind);
        }

        query
            .await
            .and_then(|response| response.check())
            .map_err(|e| query_error(context, e))?;
        Ok(())
    }

    /// Read one record by id.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        table: &'static str,
        id: &str,
    ) -> Result<Option<T>, StorageError> {
        let rows: Vec<T> = self
            .rows(
                format!("SELECT {PROJECTION} FROM type::thing($table, $id)"),
                vec![("table", Value::from(table)), ("id", Value::from(id))],
                &format!("get {}", table),
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    pub(crate) async fn exists(&self, table: &'static str, id: &str) -> Result<bool, StorageError> {
        let rows: Vec<IdRow> = self
            .rows(
                "SELECT record::id(id) AS id FROM type::thing($table, $id)",
                vec![("table", Value::from(table)), ("id", Value::from(id))],
                &format!("check {}", table),
            )
            .await?;
        Ok(!rows.is_empty())
    }

    /// Create a record under `id` and read it back.
    pub(crate) async fn insert<T, D>(
        &self,
        table: &'static str,
        id: &str,
        data: D,
    ) -> Result<T, StorageError>
    where
        T: DeserializeOwned,
        D: Serialize + 'static,
    {
        let rows: Vec<T> = self
            .rows_at(
                format!(
                    "CREATE type::thing($table, $id) CONTENT $data RETURN NONE; \
                     SELECT {PROJECTION} FROM type::thing($table, $id);"
                ),
                vec![
                    ("table", Value::from(table)),
                    ("id", Value::from(id)),
                    ("data", serde_json::to_value(data)?),
                ],
                1,
                &format!("create {}", table),
            )
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| StorageError::Internal(format!("{} {} vanished after create", table, id)))
    }

    /// Merge fields into an existing record and read it back.
    pub(crate) async fn merge<T: DeserializeOwned>(
        &self,
        table: &'static str,
        id: &str,
        patch: Value,
    ) -> Result<T, StorageError> {
        if !self.exists(table, id).await? {
            return Err(StorageError::NotFound(format!("{} {}", table, id)));
        }

        let rows: Vec<T> = self
            .rows_at(
                format!(
                    "UPDATE type::thing($table, $id) MERGE $patch RETURN NONE; \
                     SELECT {PROJECTION} FROM type::thing($table, $id);"
                ),
                vec![
                    ("table", Value::from(table)),
                    ("id", Value::from(id)),
                    ("patch", patch),
                ],
                1,
                &format!("update {}", table),
            )
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| StorageError::NotFound(format!("{} {}", table, id)))
    }

    /// Delete a single record without touching dependents.
    pub(crate) async fn remove(&self, table: &'static str, id: &str) -> Result<bool, StorageError> {
        if !self.exists(table, id).await? {
            return Ok(false);
        }
        self.execute(
            "DELETE type::thing($table, $id)",
            vec![("table", Value::from(table)), ("id", Value::from(id))],
            &format!("delete {}", table),
        )
        .await?;
        Ok(true)
    }

    pub(crate) async fn count(
        &self,
        table: &'static str,
        condition: &str,
        binds: Binds,
    ) -> Result<usize, StorageError> {
        let where_clause = if condition.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", condition)
        };
        let rows: Vec<CountRow> = self
            .rows(
                format!("SELECT count() AS total FROM {table}{where_clause} GROUP ALL"),
                binds,
                &format!("count {}", table),
            )
            .await?;
        Ok(rows.first().map(|row| row.total).unwrap_or(0))
    }
}

/// Map a SurrealDB error, recognising unique index violations and
/// duplicate record ids.
pub(crate) fn query_error(context: &str, e: surrealdb::Error) -> StorageError {
    let message = e.to_string();
    if message.contains("already contains") || message.contains("already exists") {
        StorageError::AlreadyExists(format!("Failed to {}: {}", context, message))
    } else {
        StorageError::Query(format!("Failed to {}: {}", context, message))
    }
}

/// `LIMIT`/`START` clause for optional paging.
pub(crate) fn paging(limit: Option<usize>, offset: Option<usize>) -> String {
    let mut clause = String::new();
    if let Some(limit) = limit {
        clause.push_str(&format!(" LIMIT {}", limit));
    }
    if let Some(offset) = offset.filter(|offset| *offset > 0) {
        clause.push_str(&format!(" START {}", offset));
    }
    clause
}
