use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use super::{provider_failure, read_failure, store_single};
use crate::domain::cache::{normalize_key, CachedRecord, Lookup, RecordStore};
use crate::domain::transit::{FetchedLine, TransitLineRecord};
use crate::domain::{DomainError, ProviderResult, TransitStatusProvider};

const RESOURCE: &str = "transit_line";

/// Resolves transit line statuses, in bulk or per line, through the store
#[derive(Debug, Clone)]
pub struct TransitStatusResolver {
    store: Arc<dyn RecordStore<TransitLineRecord>>,
    provider: Arc<dyn TransitStatusProvider>,
}

impl TransitStatusResolver {
    pub fn new(
        store: Arc<dyn RecordStore<TransitLineRecord>>,
        provider: Arc<dyn TransitStatusProvider>,
    ) -> Self {
        Self { store, provider }
    }

    /// Returns every line.
    ///
    /// A non-empty store is served as-is with no remote call; an empty store
    /// triggers a single bulk fetch whose lines are all upserted.
    #[instrument(skip(self), fields(provider = self.provider.provider_name()))]
    pub async fn all_lines(&self) -> Result<Lookup<Vec<TransitLineRecord>>, DomainError> {
        match self.store.find_all().await {
            Ok(records) if !records.is_empty() => {
                debug!(count = records.len(), "Transit lines served from cache");
                return Ok(Lookup::Hit(records));
            }
            Ok(_) => {}
            Err(e) => return Ok(read_failure(RESOURCE, "*", e)),
        }

        info!("No cached transit lines, fetching bulk status");
        self.fetch_and_store_all().await
    }

    /// Returns one line by id, serving from the store when cached
    #[instrument(skip(self), fields(provider = self.provider.provider_name()))]
    pub async fn line(&self, line_id: &str) -> Result<Lookup<TransitLineRecord>, DomainError> {
        let key = normalize_key(line_id);

        match self.store.find_by_key(&key).await {
            Ok(Some(record)) => {
                debug!(key = %key, "Transit line served from cache");
                return Ok(Lookup::Hit(record));
            }
            Ok(None) => {}
            Err(e) => return Ok(read_failure(RESOURCE, &key, e)),
        }

        info!(key = %key, "Transit line not cached, querying provider");
        self.fetch_and_store_line(&key).await
    }

    /// Re-fetches every line and overwrites the cached statuses
    #[instrument(skip(self), fields(provider = self.provider.provider_name()))]
    pub async fn refresh_all_lines(&self) -> Result<Lookup<Vec<TransitLineRecord>>, DomainError> {
        info!("Refreshing all transit line statuses");
        self.fetch_and_store_all().await
    }

    /// Re-fetches one line and overwrites its cached status
    #[instrument(skip(self), fields(provider = self.provider.provider_name()))]
    pub async fn refresh_line(
        &self,
        line_id: &str,
    ) -> Result<Lookup<TransitLineRecord>, DomainError> {
        let key = normalize_key(line_id);
        info!(key = %key, "Refreshing transit line status");
        self.fetch_and_store_line(&key).await
    }

    async fn fetch_and_store_line(
        &self,
        key: &str,
    ) -> Result<Lookup<TransitLineRecord>, DomainError> {
        let result = match self.provider.fetch_line(key).await {
            Ok(result) => result,
            Err(e) => return provider_failure(RESOURCE, e),
        };

        let result = match result {
            ProviderResult::Found(line) => ProviderResult::Found(line.fields),
            ProviderResult::NotFound => ProviderResult::NotFound,
            ProviderResult::ProviderError(detail) => ProviderResult::ProviderError(detail),
        };

        Ok(store_single(self.store.as_ref(), RESOURCE, key, result).await)
    }

    async fn fetch_and_store_all(&self) -> Result<Lookup<Vec<TransitLineRecord>>, DomainError> {
        let lines = match self.provider.fetch_all_lines().await {
            Ok(ProviderResult::Found(lines)) => lines,
            Ok(ProviderResult::NotFound) => return Ok(Lookup::NotFound),
            Ok(ProviderResult::ProviderError(detail)) => {
                warn!(error = %detail, "Bulk transit fetch failed");
                return Ok(Lookup::RemoteError(detail));
            }
            Err(e) => return provider_failure(RESOURCE, e),
        };

        let total = lines.len();
        let writes = lines.into_iter().map(|line| self.store_line(line));
        let outcomes = join_all(writes).await;

        let write_failures = outcomes.iter().filter(|(_, saved)| !saved).count();
        let records: Vec<TransitLineRecord> =
            outcomes.into_iter().map(|(record, _)| record).collect();

        if write_failures > 0 {
            warn!(
                total = total,
                failed = write_failures,
                "Some transit lines could not be cached"
            );
        } else {
            info!(total = total, "Transit lines cached");
        }

        Ok(Lookup::Fetched {
            value: records,
            write_failures,
        })
    }

    /// Upserts one fetched line. A failed write still yields the mapped record.
    async fn store_line(&self, line: FetchedLine) -> (TransitLineRecord, bool) {
        let key = normalize_key(&line.line_id);

        match self.store.upsert_by_key(&key, line.fields.clone()).await {
            Ok(record) => (record, true),
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to cache transit line");
                let now = Utc::now();
                (
                    TransitLineRecord::assemble(key, line.fields, now, now),
                    false,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::cache::{MockRecordStore, Provenance};
    use crate::domain::provider::mock::MockTransitProvider;
    use crate::domain::transit::LineFields;
    use crate::infrastructure::storage::InMemoryStore;

    fn line(id: &str, name: &str, status: &str, severity: i32) -> FetchedLine {
        FetchedLine {
            line_id: id.to_string(),
            fields: LineFields {
                line_name: name.to_string(),
                mode: "tube".to_string(),
                status: status.to_string(),
                severity,
                reason: "No issues reported".to_string(),
                city: "London".to_string(),
            },
        }
    }

    fn cached(fetched: FetchedLine) -> TransitLineRecord {
        let now = Utc::now();
        TransitLineRecord::assemble(fetched.line_id, fetched.fields, now, now)
    }

    fn network() -> MockTransitProvider {
        MockTransitProvider::new()
            .with_line(line("bakerloo", "Bakerloo", "Good Service", 10))
            .with_line(line("central", "Central", "Minor Delays", 9))
            .with_line(line("victoria", "Victoria", "Good Service", 10))
    }

    #[tokio::test]
    async fn test_empty_store_fetches_and_stores_all() {
        let store = Arc::new(MockRecordStore::new());
        let provider = Arc::new(network());
        let resolver = TransitStatusResolver::new(store.clone(), provider.clone());

        let outcome = resolver.all_lines().await.unwrap();

        assert_eq!(outcome.provenance(), Some(Provenance::RemoteFresh));
        let Lookup::Fetched { value, write_failures } = outcome else {
            panic!("expected a fresh fetch");
        };
        assert_eq!(value.len(), 3);
        assert_eq!(write_failures, 0);
        assert_eq!(store.upsert_count(), 3);
        assert_eq!(store.len(), 3);
        assert_eq!(provider.bulk_calls(), 1);
    }

    #[tokio::test]
    async fn test_non_empty_store_is_served_without_remote_call() {
        let store = Arc::new(
            MockRecordStore::new().with_record(cached(line("central", "Central", "Good Service", 10))),
        );
        let provider = Arc::new(network());
        let resolver = TransitStatusResolver::new(store.clone(), provider.clone());

        let outcome = resolver.all_lines().await.unwrap();

        assert!(outcome.is_hit());
        assert_eq!(outcome.value().unwrap().len(), 1);
        assert_eq!(provider.total_calls(), 0);
        assert_eq!(store.upsert_count(), 0);
    }

    #[tokio::test]
    async fn test_partial_write_failures_are_counted() {
        let store = Arc::new(MockRecordStore::new().with_failing_key("central"));
        let provider = Arc::new(network());
        let resolver = TransitStatusResolver::new(store.clone(), provider);

        let outcome = resolver.all_lines().await.unwrap();

        let Lookup::Fetched { value, write_failures } = outcome else {
            panic!("expected a fresh fetch");
        };
        assert_eq!(write_failures, 1);
        assert_eq!(value.len(), 3);
        assert!(value.iter().any(|r| r.line_id() == "central"));
        assert_eq!(store.upsert_count(), 3);
        assert_eq!(store.len(), 2);
        assert!(store.get("central").is_none());
    }

    #[tokio::test]
    async fn test_bulk_provider_error_writes_nothing() {
        let store = Arc::new(MockRecordStore::new());
        let provider = Arc::new(MockTransitProvider::new().with_provider_error("HTTP 500"));
        let resolver = TransitStatusResolver::new(store.clone(), provider);

        let outcome = resolver.all_lines().await.unwrap();

        assert_eq!(outcome, Lookup::RemoteError("HTTP 500".to_string()));
        assert_eq!(store.upsert_count(), 0);
    }

    #[tokio::test]
    async fn test_bulk_empty_response_is_not_found() {
        let store = Arc::new(MockRecordStore::new());
        let resolver =
            TransitStatusResolver::new(store.clone(), Arc::new(MockTransitProvider::new()));

        let outcome = resolver.all_lines().await.unwrap();

        assert!(outcome.is_not_found());
        assert_eq!(store.upsert_count(), 0);
    }

    #[tokio::test]
    async fn test_bulk_store_read_failure_skips_remote() {
        let store = Arc::new(MockRecordStore::new().with_read_error("pool closed"));
        let provider = Arc::new(network());
        let resolver = TransitStatusResolver::new(store, provider.clone());

        let outcome = resolver.all_lines().await.unwrap();

        assert!(matches!(outcome, Lookup::StoreError { unsaved: None, .. }));
        assert_eq!(provider.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_bulk_missing_config() {
        let store = Arc::new(MockRecordStore::new());
        let provider = Arc::new(MockTransitProvider::new().with_config_error("no modes"));
        let resolver = TransitStatusResolver::new(store.clone(), provider);

        let outcome = resolver.all_lines().await.unwrap();

        assert_eq!(outcome, Lookup::ConfigError("no modes".to_string()));
        assert_eq!(store.upsert_count(), 0);
    }

    #[tokio::test]
    async fn test_point_lookup_hit() {
        let store = Arc::new(
            MockRecordStore::new().with_record(cached(line("central", "Central", "Minor Delays", 9))),
        );
        let provider = Arc::new(network());
        let resolver = TransitStatusResolver::new(store, provider.clone());

        let outcome = resolver.line("Central").await.unwrap();

        assert!(outcome.is_hit());
        assert_eq!(outcome.value().unwrap().status(), "Minor Delays");
        assert_eq!(provider.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_point_lookup_miss_then_hit() {
        let store = Arc::new(InMemoryStore::<TransitLineRecord>::new());
        let provider = Arc::new(network());
        let resolver = TransitStatusResolver::new(store, provider.clone());

        let first = resolver.line("Central").await.unwrap();
        assert_eq!(first.provenance(), Some(Provenance::RemoteFresh));
        let record = first.value().unwrap();
        assert_eq!(record.line_id(), "central");
        assert_eq!(record.line_name(), "Central");
        assert_eq!(record.severity(), 9);
        assert_eq!(provider.point_calls(), vec!["central".to_string()]);

        let second = resolver.line("central").await.unwrap();
        assert!(second.is_hit());
        assert_eq!(provider.point_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_point_lookup_unknown_line() {
        let store = Arc::new(MockRecordStore::new());
        let resolver = TransitStatusResolver::new(store.clone(), Arc::new(network()));

        let outcome = resolver.line("Nonexistent").await.unwrap();

        assert!(outcome.is_not_found());
        assert_eq!(store.upsert_count(), 0);
    }

    #[tokio::test]
    async fn test_point_write_failure_returns_unsaved_record() {
        let store = Arc::new(MockRecordStore::new().with_write_error("read-only"));
        let resolver = TransitStatusResolver::new(store, Arc::new(network()));

        let outcome = resolver.line("victoria").await.unwrap();

        let Lookup::StoreError { unsaved, .. } = outcome else {
            panic!("expected a store error");
        };
        assert_eq!(unsaved.unwrap().line_name(), "Victoria");
    }

    #[tokio::test]
    async fn test_stale_status_is_not_refreshed_by_lookup() {
        let store = Arc::new(
            MockRecordStore::new().with_record(cached(line("central", "Central", "Good Service", 10))),
        );
        let provider = Arc::new(network());
        let resolver = TransitStatusResolver::new(store.clone(), provider.clone());

        let outcome = resolver.line("central").await.unwrap();

        assert_eq!(outcome.value().unwrap().status(), "Good Service");
        assert_eq!(provider.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_refresh_overwrites_cached_status() {
        let store = Arc::new(InMemoryStore::with_records(vec![cached(line(
            "central",
            "Central",
            "Good Service",
            10,
        ))]));
        let provider = Arc::new(network());
        let resolver = TransitStatusResolver::new(store, provider.clone());

        let before = resolver.line("central").await.unwrap().into_value().unwrap();
        let refreshed = resolver.refresh_line("central").await.unwrap();
        let after = resolver.line("central").await.unwrap();

        assert_eq!(refreshed.provenance(), Some(Provenance::RemoteFresh));
        let after = after.into_value().unwrap();
        assert_eq!(after.status(), "Minor Delays");
        assert_eq!(after.queried_at(), before.queried_at());
        assert!(after.updated_at() >= before.updated_at());
        assert_eq!(provider.point_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_all_bypasses_cache() {
        let store = Arc::new(
            MockRecordStore::new().with_record(cached(line("central", "Central", "Good Service", 10))),
        );
        let provider = Arc::new(network());
        let resolver = TransitStatusResolver::new(store.clone(), provider.clone());

        let outcome = resolver.refresh_all_lines().await.unwrap();

        assert_eq!(outcome.value().unwrap().len(), 3);
        assert_eq!(provider.bulk_calls(), 1);
        assert_eq!(store.get("central").unwrap().status(), "Minor Delays");
    }
}
