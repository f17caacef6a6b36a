//! Report repository trait

use std::fmt::Debug;

use async_trait::async_trait;
use uuid::Uuid;

use super::entity::ReportEntity;
use crate::domain::DomainError;

/// CRUD storage for user-submitted reports
#[async_trait]
pub trait ReportRepository<E>: Send + Sync + Debug
where
    E: ReportEntity,
{
    async fn get(&self, id: Uuid) -> Result<Option<E>, DomainError>;

    /// Lists all reports, newest first
    async fn list(&self) -> Result<Vec<E>, DomainError>;

    async fn create(&self, report: E) -> Result<E, DomainError>;

    /// Replaces an existing report, returns `NotFound` if absent
    async fn update(&self, report: E) -> Result<E, DomainError>;

    /// Deletes a report, returns true if it existed
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
