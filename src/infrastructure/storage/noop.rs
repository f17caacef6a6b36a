//! Store used when persistence is disabled

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::cache::{CachedRecord, RecordStore};
use crate::domain::DomainError;

/// Remembers nothing: every lookup misses and upserts return the record
/// without persisting it.
pub struct NoopStore<R> {
    _phantom: PhantomData<fn() -> R>,
}

impl<R> Debug for NoopStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoopStore").finish()
    }
}

impl<R> Default for NoopStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> NoopStore<R> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<R> RecordStore<R> for NoopStore<R>
where
    R: CachedRecord,
{
    async fn find_by_key(&self, _key: &str) -> Result<Option<R>, DomainError> {
        Ok(None)
    }

    async fn find_all(&self) -> Result<Vec<R>, DomainError> {
        Ok(Vec::new())
    }

    async fn upsert_by_key(&self, key: &str, fields: R::Fields) -> Result<R, DomainError> {
        let now = Utc::now();
        Ok(R::assemble(key.to_string(), fields, now, now))
    }
}
