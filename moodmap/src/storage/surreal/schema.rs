//! Schema initialization for the embedded store

use crate::storage::errors::StorageError;
use surrealdb::{Connection, Surreal};

/// Every table the store writes to.
pub(crate) const TABLES: &[&str] = &[
    "inference_recommendation",
    "inference_session",
    "saved_place",
    "ai_summary",
    "place",
    "comment",
    "bookmark",
    "image",
    "memory",
    "location",
    "emotion",
    "user",
];

/// Create tables, timestamp fields and indexes. Safe to run on every start.
pub async fn initialize_schema<C>(client: &Surreal<C>) -> Result<(), StorageError>
where
    C: Connection,
{
    let user_table_query = r#"
        DEFINE TABLE IF NOT EXISTS user SCHEMALESS
        COMMENT "Registered users";

        DEFINE FIELD IF NOT EXISTS created_at ON user TYPE datetime DEFAULT time::now();
        DEFINE FIELD IF NOT EXISTS updated_at ON user TYPE datetime DEFAULT time::now() VALUE time::now();

        DEFINE INDEX IF NOT EXISTS user_email_idx ON user FIELDS email UNIQUE;
        DEFINE INDEX IF NOT EXISTS user_nickname_idx ON user FIELDS nickname UNIQUE;
    "#;

    let tag_tables_query = r#"
        DEFINE TABLE IF NOT EXISTS emotion SCHEMALESS
        COMMENT "Emotion tags";
        DEFINE INDEX IF NOT EXISTS emotion_name_idx ON emotion FIELDS name UNIQUE;

        DEFINE TABLE IF NOT EXISTS location SCHEMALESS
        COMMENT "Neighbourhood tags";
        DEFINE INDEX IF NOT EXISTS location_name_idx ON location FIELDS name UNIQUE;
    "#;

    let community_tables_query = r#"
        DEFINE TABLE IF NOT EXISTS memory SCHEMALESS
        COMMENT "User posts";
        DEFINE FIELD IF NOT EXISTS created_at ON memory TYPE datetime DEFAULT time::now();
        DEFINE FIELD IF NOT EXISTS updated_at ON memory TYPE datetime DEFAULT time::now() VALUE time::now();
        DEFINE INDEX IF NOT EXISTS memory_user_idx ON memory FIELDS user_id;
        DEFINE INDEX IF NOT EXISTS memory_location_idx ON memory FIELDS location_id;
        DEFINE INDEX IF NOT EXISTS memory_created_at_idx ON memory FIELDS created_at;

        DEFINE TABLE IF NOT EXISTS image SCHEMALESS
        COMMENT "Images attached to posts";
        DEFINE FIELD IF NOT EXISTS created_at ON image TYPE datetime DEFAULT time::now();
        DEFINE INDEX IF NOT EXISTS image_memory_idx ON image FIELDS memory_id;

        DEFINE TABLE IF NOT EXISTS bookmark SCHEMALESS
        COMMENT "Bookmarked posts";
        DEFINE FIELD IF NOT EXISTS created_at ON bookmark TYPE datetime DEFAULT time::now();
        DEFINE INDEX IF NOT EXISTS bookmark_user_memory_idx ON bookmark FIELDS user_id, memory_id UNIQUE;

        DEFINE TABLE IF NOT EXISTS comment SCHEMALESS
        COMMENT "Comments on posts";
        DEFINE FIELD IF NOT EXISTS created_at ON comment TYPE datetime DEFAULT time::now();
        DEFINE FIELD IF NOT EXISTS updated_at ON comment TYPE datetime DEFAULT time::now() VALUE time::now();
        DEFINE INDEX IF NOT EXISTS comment_memory_idx ON comment FIELDS memory_id;
    "#;

    let place_tables_query = r#"
        DEFINE TABLE IF NOT EXISTS place SCHEMALESS
        COMMENT "Recommended venues";
        DEFINE FIELD IF NOT EXISTS created_at ON place TYPE datetime DEFAULT time::now();
        DEFINE FIELD IF NOT EXISTS updated_at ON place TYPE datetime DEFAULT time::now() VALUE time::now();
        DEFINE INDEX IF NOT EXISTS place_google_id_idx ON place FIELDS google_place_id UNIQUE;
        DEFINE INDEX IF NOT EXISTS place_location_idx ON place FIELDS location_id;

        DEFINE TABLE IF NOT EXISTS ai_summary SCHEMALESS
        COMMENT "LLM summaries of places";
        DEFINE FIELD IF NOT EXISTS created_at ON ai_summary TYPE datetime DEFAULT time::now();
        DEFINE FIELD IF NOT EXISTS updated_at ON ai_summary TYPE datetime DEFAULT time::now() VALUE time::now();
        DEFINE INDEX IF NOT EXISTS ai_summary_place_idx ON ai_summary FIELDS place_id;

        DEFINE TABLE IF NOT EXISTS saved_place SCHEMALESS
        COMMENT "Places saved by users";
        DEFINE FIELD IF NOT EXISTS created_at ON saved_place TYPE datetime DEFAULT time::now();
        DEFINE INDEX IF NOT EXISTS saved_place_unique_idx ON saved_place FIELDS user_id, place_id, rec UNIQUE;
    "#;

    let inference_tables_query = r#"
        DEFINE TABLE IF NOT EXISTS inference_session SCHEMALESS
        COMMENT "Recommendation runs over chosen locations and emotions";
        DEFINE FIELD IF NOT EXISTS created_at ON inference_session TYPE datetime DEFAULT time::now();
        DEFINE INDEX IF NOT EXISTS inference_session_user_idx ON inference_session FIELDS user_id;

        DEFINE TABLE IF NOT EXISTS inference_recommendation SCHEMALESS
        COMMENT "Places recommended by a session";
        DEFINE INDEX IF NOT EXISTS inference_recommendation_session_idx ON inference_recommendation FIELDS session_id;
    "#;

    execute_schema_query(client, user_table_query, "user table").await?;
    execute_schema_query(client, tag_tables_query, "tag tables").await?;
    execute_schema_query(client, community_tables_query, "community tables").await?;
    execute_schema_query(client, place_tables_query, "place tables").await?;
    execute_schema_query(client, inference_tables_query, "inference tables").await?;

    tracing::info!("Schema initialized");
    Ok(())
}

async fn execute_schema_query<C>(
    client: &Surreal<C>,
    query: &str,
    description: &str,
) -> Result<(), StorageError>
where
    C: Connection,
{
    client
        .query(query)
        .await
        .and_then(|response| response.check())
        .map_err(|e| StorageError::Query(format!("Failed to create {}: {}", description, e)))?;

    tracing::debug!("Created {} successfully", description);
    Ok(())
}
