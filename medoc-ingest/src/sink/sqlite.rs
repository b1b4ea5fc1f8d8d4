//! SQLite-backed document store
//!
//! Each collection is one table keyed by `_id` with the document body stored
//! as JSON text:
//!
//! ```sql
//! CREATE TABLE "<namespace>__<collection>" (
//!     _id TEXT PRIMARY KEY,
//!     body TEXT NOT NULL,
//!     inserted_at TEXT NOT NULL
//! )
//! ```

use super::{DocumentSink, SinkConfig, SinkError};
use crate::models::Document;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

const MAX_CONNECTIONS: u32 = 5;
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

pub struct SqliteDocumentStore {
    pool: SqlitePool,
    table: String,
}

impl SqliteDocumentStore {
    /// Validate `config`, open the store (creating it if missing) and ensure
    /// the collection table exists
    pub async fn connect(config: &SinkConfig) -> Result<Self, SinkError> {
        config.validate()?;

        let options = SqliteConnectOptions::from_str(&config.endpoint)
            .map_err(|e| SinkError::InvalidConfig(format!("{}: {}", config.endpoint, e)))?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);

        // Every in-memory connection is its own database
        let in_memory = is_in_memory(&config.endpoint);
        let (options, max_connections) = if in_memory {
            (options, 1)
        } else {
            (options.journal_mode(SqliteJournalMode::Wal), MAX_CONNECTIONS)
        };

        let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
        if in_memory {
            // Dropping the only connection would drop the database with it
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(connection_error)?;

        let store = Self {
            pool,
            table: config.table_name(),
        };
        store.create_table().await?;

        info!(
            endpoint = %config.endpoint,
            table = %store.table,
            max_connections,
            "Document store ready"
        );
        Ok(store)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn create_table(&self) -> Result<(), SinkError> {
        let sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS "{}" (
                _id TEXT PRIMARY KEY,
                body TEXT NOT NULL,
                inserted_at TEXT NOT NULL
            )
            "#,
            self.table
        );
        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(connection_error)?;
        Ok(())
    }

    /// Number of stored documents
    pub async fn count(&self) -> Result<i64, SinkError> {
        let sql = format!(r#"SELECT COUNT(*) FROM "{}""#, self.table);
        sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(connection_error)
    }

    /// Load one document by `_id`
    pub async fn get(&self, id: &str) -> Result<Option<Document>, SinkError> {
        let sql = format!(r#"SELECT body FROM "{}" WHERE _id = ?"#, self.table);
        let body: Option<String> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(connection_error)?;

        body.map(|body| {
            serde_json::from_str(&body).map_err(|e| SinkError::MalformedDocument(format!("{}: {}", id, e)))
        })
        .transpose()
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl DocumentSink for SqliteDocumentStore {
    async fn insert(&self, document: &Document) -> Result<(), SinkError> {
        let id = document
            .id()
            .ok_or_else(|| SinkError::MalformedDocument("document has no string _id".to_string()))?;

        let body = document
            .to_json_string()
            .map_err(|e| SinkError::MalformedDocument(format!("{}: {}", id, e)))?;

        let sql = format!(
            r#"INSERT INTO "{}" (_id, body, inserted_at) VALUES (?, ?, ?)"#,
            self.table
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(body)
            .bind(medoc_common::time::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| insert_error(id, e))?;

        debug!(id = %id, table = %self.table, "Inserted document");
        Ok(())
    }
}

fn is_in_memory(endpoint: &str) -> bool {
    endpoint.contains(":memory:") || endpoint.contains("mode=memory")
}

fn connection_error(err: sqlx::Error) -> SinkError {
    SinkError::Connection(err.to_string())
}

fn insert_error(id: &str, err: sqlx::Error) -> SinkError {
    match err {
        sqlx::Error::Database(db_err) => SinkError::Rejected {
            id: id.to_string(),
            reason: db_err.message().to_string(),
        },
        other => connection_error(other),
    }
}
