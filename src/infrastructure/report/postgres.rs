//! PostgreSQL report repository

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::report::{ReportEntity, ReportRepository};
use crate::domain::DomainError;

/// Stores reports as JSONB rows keyed by id
pub struct PostgresReportRepository<E>
where
    E: ReportEntity,
{
    pool: PgPool,
    table_name: String,
    _phantom: PhantomData<E>,
}

impl<E> Debug for PostgresReportRepository<E>
where
    E: ReportEntity,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresReportRepository")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl<E> PostgresReportRepository<E>
where
    E: ReportEntity,
{
    pub fn new(pool: PgPool, table_name: impl Into<String>) -> Self {
        Self {
            pool,
            table_name: table_name.into(),
            _phantom: PhantomData,
        }
    }

    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY,
                data JSONB NOT NULL,
                reported_at TIMESTAMPTZ NOT NULL
            )
            "#,
            self.table_name
        );

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create table: {}", e)))?;

        Ok(())
    }

    fn decode(data: serde_json::Value) -> Result<E, DomainError> {
        serde_json::from_value(data)
            .map_err(|e| DomainError::storage(format!("Failed to deserialize report: {}", e)))
    }

    fn encode(report: &E) -> Result<serde_json::Value, DomainError> {
        serde_json::to_value(report)
            .map_err(|e| DomainError::storage(format!("Failed to serialize report: {}", e)))
    }
}

#[async_trait]
impl<E> ReportRepository<E> for PostgresReportRepository<E>
where
    E: ReportEntity,
{
    async fn get(&self, id: Uuid) -> Result<Option<E>, DomainError> {
        let query = format!("SELECT data FROM {} WHERE id = $1", self.table_name);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get report: {}", e)))?;

        row.map(|r| Self::decode(r.get("data"))).transpose()
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        let query = format!(
            "SELECT data FROM {} ORDER BY reported_at DESC",
            self.table_name
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list reports: {}", e)))?;

        rows.into_iter().map(|r| Self::decode(r.get("data"))).collect()
    }

    async fn create(&self, report: E) -> Result<E, DomainError> {
        let query = format!(
            "INSERT INTO {} (id, data, reported_at) VALUES ($1, $2, $3)",
            self.table_name
        );

        sqlx::query(&query)
            .bind(report.id())
            .bind(Self::encode(&report)?)
            .bind(report.reported_at())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create report: {}", e)))?;

        Ok(report)
    }

    async fn update(&self, report: E) -> Result<E, DomainError> {
        let query = format!(
            "UPDATE {} SET data = $2, reported_at = $3 WHERE id = $1",
            self.table_name
        );

        let result = sqlx::query(&query)
            .bind(report.id())
            .bind(Self::encode(&report)?)
            .bind(report.reported_at())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to update report: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Report '{}' not found",
                report.id()
            )));
        }

        Ok(report)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let query = format!("DELETE FROM {} WHERE id = $1", self.table_name);

        let result = sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete report: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
