//! Record store trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

use super::record::CachedRecord;

/// Persistent record set backing one resolver
///
/// Absence is `Ok(None)`, never an error. Any `Err` is a persistence failure.
#[async_trait]
pub trait RecordStore<R>: Send + Sync + Debug
where
    R: CachedRecord,
{
    /// Looks up a record by its normalized key
    async fn find_by_key(&self, key: &str) -> Result<Option<R>, DomainError>;

    /// Returns every record, most recently updated first
    async fn find_all(&self) -> Result<Vec<R>, DomainError>;

    /// Creates the record if absent, otherwise replaces its fields and
    /// refreshes `updated_at`. Returns the record as stored.
    async fn upsert_by_key(&self, key: &str, fields: R::Fields) -> Result<R, DomainError>;
}
