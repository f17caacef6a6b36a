//! In-memory record store implementation

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::cache::{CachedRecord, RecordStore};
use crate::domain::DomainError;

/// Thread-safe in-memory record store
///
/// Useful for testing and development. Data is lost when the process terminates.
#[derive(Debug)]
pub struct InMemoryStore<R>
where
    R: CachedRecord,
{
    records: RwLock<HashMap<String, R>>,
}

impl<R> Default for InMemoryStore<R>
where
    R: CachedRecord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R> InMemoryStore<R>
where
    R: CachedRecord,
{
    /// Creates a new empty store
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a store pre-populated with records
    pub fn with_records(records: Vec<R>) -> Self {
        let store = Self::new();
        {
            let mut map = store.records.write().unwrap_or_else(|e| e.into_inner());

            for record in records {
                map.insert(record.key().to_string(), record);
            }
        }
        store
    }
}

#[async_trait]
impl<R> RecordStore<R> for InMemoryStore<R>
where
    R: CachedRecord,
{
    async fn find_by_key(&self, key: &str) -> Result<Option<R>, DomainError> {
        let records = self.records.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(records.get(key).cloned())
    }

    async fn find_all(&self) -> Result<Vec<R>, DomainError> {
        let records = self.records.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut all: Vec<R> = records.values().cloned().collect();
        all.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
        Ok(all)
    }

    async fn upsert_by_key(&self, key: &str, fields: R::Fields) -> Result<R, DomainError> {
        let mut records = self.records.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let now = Utc::now();
        let queried_at = records.get(key).map(|r| r.queried_at()).unwrap_or(now);
        let record = R::assemble(key.to_string(), fields, queried_at, now);

        records.insert(key.to_string(), record.clone());
        Ok(record)
    }
}
