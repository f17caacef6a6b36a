//! Cache-aside resolvers
//!
//! Each resolver checks its store first and only calls the remote provider
//! on a miss. There is no in-process lock between the store check and the
//! upsert: concurrent misses on one key may both fetch, and the last
//! whole-record upsert wins.

mod city;
mod transit;

pub use city::CityResolver;
pub use transit::TransitStatusResolver;

use chrono::Utc;
use tracing::{error, warn};

use crate::domain::cache::{CachedRecord, Lookup, RecordStore};
use crate::domain::{DomainError, ProviderResult};

/// Maps a failed store read to a lookup outcome
fn read_failure<T>(resource: &str, key: &str, error: DomainError) -> Lookup<T> {
    error!(resource = %resource, key = %key, error = %error, "Store read failed");
    Lookup::StoreError {
        message: error.to_string(),
        unsaved: None,
    }
}

/// Separates missing configuration from unexpected provider failures
fn provider_failure<T>(resource: &str, error: DomainError) -> Result<Lookup<T>, DomainError> {
    match error {
        DomainError::Configuration { message } => {
            warn!(resource = %resource, error = %message, "Provider not configured");
            Ok(Lookup::ConfigError(message))
        }
        other => Err(other),
    }
}

/// Persists a freshly fetched record; the caller always gets the data back
async fn persist<R>(
    store: &dyn RecordStore<R>,
    resource: &str,
    key: &str,
    fields: R::Fields,
) -> Lookup<R>
where
    R: CachedRecord,
{
    match store.upsert_by_key(key, fields.clone()).await {
        Ok(record) => Lookup::Fetched {
            value: record,
            write_failures: 0,
        },
        Err(e) => {
            error!(resource = %resource, key = %key, error = %e, "Failed to cache fetched record");
            let now = Utc::now();
            Lookup::StoreError {
                message: e.to_string(),
                unsaved: Some(R::assemble(key.to_string(), fields, now, now)),
            }
        }
    }
}

/// Maps a provider result for a single key
async fn store_single<R>(
    store: &dyn RecordStore<R>,
    resource: &str,
    key: &str,
    result: ProviderResult<R::Fields>,
) -> Lookup<R>
where
    R: CachedRecord,
{
    match result {
        ProviderResult::Found(fields) => persist(store, resource, key, fields).await,
        ProviderResult::NotFound => Lookup::NotFound,
        ProviderResult::ProviderError(detail) => {
            warn!(resource = %resource, key = %key, error = %detail, "Remote fetch failed");
            Lookup::RemoteError(detail)
        }
    }
}
