//! Database schema initialization for dodo
//!
//! Defines the SurrealDB schema for todos and the insertion sequence
//! counter used to break `created_at` ties.

use crate::error::DbError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// SQL statements for schema initialization
mod sql {
    /// Define the todo table with all fields
    pub const DEFINE_TODO_TABLE: &str = r#"
        DEFINE TABLE IF NOT EXISTS todo SCHEMAFULL;

        DEFINE FIELD IF NOT EXISTS user_id ON todo TYPE string
            ASSERT string::len($value) > 0;

        DEFINE FIELD IF NOT EXISTS title ON todo TYPE string
            ASSERT string::len($value) > 0;

        DEFINE FIELD IF NOT EXISTS description ON todo TYPE option<string>;

        DEFINE FIELD IF NOT EXISTS is_finished ON todo TYPE bool DEFAULT false;

        DEFINE FIELD IF NOT EXISTS cover ON todo TYPE option<string>;

        DEFINE FIELD IF NOT EXISTS seq ON todo TYPE int DEFAULT 0;

        DEFINE FIELD IF NOT EXISTS created_at ON todo TYPE datetime
            DEFAULT time::now() READONLY;

        DEFINE FIELD IF NOT EXISTS updated_at ON todo TYPE datetime DEFAULT time::now();

        DEFINE INDEX IF NOT EXISTS todo_user_idx ON todo FIELDS user_id;
    "#;

    /// Define the table holding named counters
    pub const DEFINE_SEQUENCE_TABLE: &str = r#"
        DEFINE TABLE IF NOT EXISTS sequence SCHEMALESS;
    "#;
}

/// Initialize the database schema.
///
/// This function is idempotent - it can be called multiple times safely
/// as it uses `IF NOT EXISTS` clauses.
///
/// # Errors
///
/// Returns `DbError::Schema` if any schema definition fails.
pub async fn init_schema(client: &Surreal<Db>) -> Result<(), DbError> {
    client
        .query(sql::DEFINE_TODO_TABLE)
        .await
        .and_then(|response| response.check())
        .map_err(|e| DbError::Schema(Box::new(e)))?;

    client
        .query(sql::DEFINE_SEQUENCE_TABLE)
        .await
        .and_then(|response| response.check())
        .map_err(|e| DbError::Schema(Box::new(e)))?;

    Ok(())
}
