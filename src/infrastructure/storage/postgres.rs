//! PostgreSQL record store with connection pooling

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::domain::cache::{CachedRecord, RecordStore};
use crate::domain::DomainError;

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/civic_gateway".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Opens the process-wide pool shared by every store
    pub async fn connect(&self) -> Result<PgPool, DomainError> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(std::time::Duration::from_secs(self.connect_timeout_secs))
            .idle_timeout(std::time::Duration::from_secs(self.idle_timeout_secs))
            .connect(&self.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
    }
}

/// PostgreSQL record store
///
/// One table per record type with `(key, data, queried_at, updated_at)`
/// columns; `data` holds the record fields as JSONB.
pub struct PostgresStore<R>
where
    R: CachedRecord,
{
    pool: PgPool,
    table_name: String,
    _phantom: PhantomData<R>,
}

impl<R> Debug for PostgresStore<R>
where
    R: CachedRecord,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStore")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl<R> PostgresStore<R>
where
    R: CachedRecord,
{
    /// Creates a store over an existing pool. `table_name` must be a trusted
    /// identifier; it is interpolated into SQL.
    pub fn new(pool: PgPool, table_name: impl Into<String>) -> Self {
        Self {
            pool,
            table_name: table_name.into(),
            _phantom: PhantomData,
        }
    }

    /// Ensures the backing table exists
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                key VARCHAR(255) PRIMARY KEY,
                data JSONB NOT NULL,
                queried_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS {table}_updated_at_idx ON {table} (updated_at DESC)
            "#,
            table = self.table_name
        );

        sqlx::raw_sql(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create table: {}", e)))?;

        Ok(())
    }

    fn row_to_record(row: &PgRow) -> Result<R, DomainError> {
        let key: String = row.get("key");
        let data: serde_json::Value = row.get("data");
        let queried_at: DateTime<Utc> = row.get("queried_at");
        let updated_at: DateTime<Utc> = row.get("updated_at");

        let fields: R::Fields = serde_json::from_value(data).map_err(|e| {
            DomainError::storage(format!("Failed to deserialize record '{}': {}", key, e))
        })?;

        Ok(R::assemble(key, fields, queried_at, updated_at))
    }
}

#[async_trait]
impl<R> RecordStore<R> for PostgresStore<R>
where
    R: CachedRecord,
{
    async fn find_by_key(&self, key: &str) -> Result<Option<R>, DomainError> {
        let query = format!(
            "SELECT key, data, queried_at, updated_at FROM {} WHERE key = $1",
            self.table_name
        );

        let row = sqlx::query(&query)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get record: {}", e)))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn find_all(&self) -> Result<Vec<R>, DomainError> {
        let query = format!(
            "SELECT key, data, queried_at, updated_at FROM {} ORDER BY updated_at DESC",
            self.table_name
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list records: {}", e)))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn upsert_by_key(&self, key: &str, fields: R::Fields) -> Result<R, DomainError> {
        let data = serde_json::to_value(&fields).map_err(|e| {
            DomainError::storage(format!("Failed to serialize record: {}", e))
        })?;

        // Whole-payload replace; the first fetch time survives
        let query = format!(
            r#"
            INSERT INTO {} (key, data, queried_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            ON CONFLICT (key) DO UPDATE
            SET data = EXCLUDED.data, updated_at = NOW()
            RETURNING key, data, queried_at, updated_at
            "#,
            self.table_name
        );

        let row = sqlx::query(&query)
            .bind(key)
            .bind(&data)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to upsert record: {}", e)))?;

        Self::row_to_record(&row)
    }
}
