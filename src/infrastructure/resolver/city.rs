use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::{provider_failure, read_failure, store_single};
use crate::domain::cache::{normalize_key, Lookup, RecordStore};
use crate::domain::city::CityRecord;
use crate::domain::{DomainError, GeocodingProvider};

const RESOURCE: &str = "city";

/// Resolves free-text city names to cached geographic metadata
#[derive(Debug, Clone)]
pub struct CityResolver {
    store: Arc<dyn RecordStore<CityRecord>>,
    provider: Arc<dyn GeocodingProvider>,
}

impl CityResolver {
    pub fn new(
        store: Arc<dyn RecordStore<CityRecord>>,
        provider: Arc<dyn GeocodingProvider>,
    ) -> Self {
        Self { store, provider }
    }

    /// Looks up a city, serving from the store when cached.
    ///
    /// `Err` is returned only for a malformed provider payload.
    #[instrument(skip(self), fields(provider = self.provider.provider_name()))]
    pub async fn lookup(&self, name: &str) -> Result<Lookup<CityRecord>, DomainError> {
        let key = normalize_key(name);

        match self.store.find_by_key(&key).await {
            Ok(Some(record)) => {
                debug!(key = %key, "City served from cache");
                return Ok(Lookup::Hit(record));
            }
            Ok(None) => {}
            Err(e) => return Ok(read_failure(RESOURCE, &key, e)),
        }

        info!(key = %key, "City not cached, querying provider");

        let result = match self.provider.fetch_city(&key).await {
            Ok(result) => result,
            Err(e) => return provider_failure(RESOURCE, e),
        };

        Ok(store_single(self.store.as_ref(), RESOURCE, &key, result).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::cache::{CachedRecord, MockRecordStore, Provenance};
    use crate::domain::city::{CityFields, Coordinates};
    use crate::domain::provider::mock::MockGeocodingProvider;
    use crate::infrastructure::storage::InMemoryStore;

    fn tokyo() -> CityFields {
        CityFields {
            city_name: "Tokyo".to_string(),
            country: "Japan".to_string(),
            region: "Tokyo".to_string(),
            coordinates: Coordinates::new(35.6895, 139.69171).unwrap(),
            population: 9_733_276,
        }
    }

    fn cached(key: &str, fields: CityFields) -> CityRecord {
        let now = Utc::now();
        CityRecord::assemble(key.to_string(), fields, now, now)
    }

    fn resolver(
        store: Arc<MockRecordStore<CityRecord>>,
        provider: Arc<MockGeocodingProvider>,
    ) -> CityResolver {
        CityResolver::new(store, provider)
    }

    #[tokio::test]
    async fn test_miss_fetches_and_stores() {
        let store = Arc::new(MockRecordStore::new());
        let provider = Arc::new(MockGeocodingProvider::new().with_city("tokyo", tokyo()));

        let outcome = resolver(store.clone(), provider.clone())
            .lookup("Tokyo")
            .await
            .unwrap();

        assert_eq!(outcome.provenance(), Some(Provenance::RemoteFresh));
        let Lookup::Fetched { value, write_failures } = outcome else {
            panic!("expected a fresh fetch");
        };
        assert_eq!(write_failures, 0);
        assert_eq!(value.city_name(), "Tokyo");
        assert_eq!(value.country(), "Japan");
        assert_eq!(value.coordinates().latitude(), 35.6895);
        assert_eq!(value.coordinates().longitude(), 139.69171);
        assert_eq!(value.population(), 9_733_276);

        assert_eq!(store.upsert_count(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("tokyo"), Some(value));
        assert_eq!(provider.calls(), vec!["tokyo".to_string()]);
    }

    #[tokio::test]
    async fn test_hit_never_calls_provider() {
        let store = Arc::new(MockRecordStore::new().with_record(cached("tokyo", tokyo())));
        let provider = Arc::new(MockGeocodingProvider::new().with_provider_error("must not be called"));
        let resolver = resolver(store.clone(), provider.clone());

        for query in ["tokyo", "Tokyo", "  TOKYO  "] {
            let outcome = resolver.lookup(query).await.unwrap();
            assert!(outcome.is_hit());
            assert_eq!(outcome.provenance(), Some(Provenance::LocalCache));
        }

        assert!(provider.calls().is_empty());
        assert_eq!(store.upsert_count(), 0);
    }

    #[tokio::test]
    async fn test_hit_returns_stale_data_as_is() {
        let mut stale = tokyo();
        stale.population = 1;
        let store = Arc::new(MockRecordStore::new().with_record(cached("tokyo", stale)));
        let provider = Arc::new(MockGeocodingProvider::new().with_city("tokyo", tokyo()));

        let outcome = resolver(store, provider.clone()).lookup("tokyo").await.unwrap();

        assert_eq!(outcome.value().unwrap().population(), 1);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_writes_nothing() {
        let store = Arc::new(MockRecordStore::new());
        let provider = Arc::new(MockGeocodingProvider::new());

        let outcome = resolver(store.clone(), provider).lookup("Atlantis").await.unwrap();

        assert!(outcome.is_not_found());
        assert_eq!(store.upsert_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_error_writes_nothing() {
        let store = Arc::new(MockRecordStore::new());
        let provider = Arc::new(MockGeocodingProvider::new().with_provider_error("HTTP 503"));

        let outcome = resolver(store.clone(), provider).lookup("Tokyo").await.unwrap();

        assert_eq!(outcome, Lookup::RemoteError("HTTP 503".to_string()));
        assert_eq!(store.upsert_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_config_on_miss() {
        let store = Arc::new(MockRecordStore::new());
        let provider = Arc::new(MockGeocodingProvider::new().with_config_error("no username"));

        let outcome = resolver(store.clone(), provider).lookup("Tokyo").await.unwrap();

        assert_eq!(outcome, Lookup::ConfigError("no username".to_string()));
        assert_eq!(store.upsert_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_config_still_serves_hits() {
        let store = Arc::new(MockRecordStore::new().with_record(cached("tokyo", tokyo())));
        let provider = Arc::new(MockGeocodingProvider::new().with_config_error("no username"));

        let outcome = resolver(store, provider).lookup("tokyo").await.unwrap();
        assert!(outcome.is_hit());
    }

    #[tokio::test]
    async fn test_store_read_failure_skips_remote() {
        let store = Arc::new(MockRecordStore::new().with_read_error("connection lost"));
        let provider = Arc::new(MockGeocodingProvider::new().with_city("tokyo", tokyo()));

        let outcome = resolver(store, provider.clone()).lookup("Tokyo").await.unwrap();

        assert!(matches!(outcome, Lookup::StoreError { unsaved: None, .. }));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_store_write_failure_returns_unsaved_record() {
        let store = Arc::new(MockRecordStore::new().with_write_error("disk full"));
        let provider = Arc::new(MockGeocodingProvider::new().with_city("tokyo", tokyo()));

        let outcome = resolver(store.clone(), provider).lookup("Tokyo").await.unwrap();

        let Lookup::StoreError { message, unsaved } = outcome else {
            panic!("expected a store error");
        };
        assert!(message.contains("disk full"));
        let unsaved = unsaved.expect("fetched record is still returned");
        assert_eq!(unsaved.lookup_key(), "tokyo");
        assert_eq!(unsaved.fields(), &tokyo());
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_malformed_payload_escapes() {
        let store = Arc::new(MockRecordStore::new());
        let provider = Arc::new(MockGeocodingProvider::new().with_malformed_payload("bad shape"));

        let result = resolver(store, provider).lookup("Tokyo").await;
        assert!(matches!(result, Err(DomainError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_empty_key_is_looked_up() {
        let store = Arc::new(MockRecordStore::new());
        let provider = Arc::new(MockGeocodingProvider::new());

        let outcome = resolver(store, provider.clone()).lookup("   ").await.unwrap();

        assert!(outcome.is_not_found());
        assert_eq!(provider.calls(), vec![String::new()]);
    }

    #[tokio::test]
    async fn test_second_lookup_is_a_hit() {
        let store = Arc::new(InMemoryStore::<CityRecord>::new());
        let provider = Arc::new(MockGeocodingProvider::new().with_city("tokyo", tokyo()));
        let resolver = CityResolver::new(store, provider.clone());

        let first = resolver.lookup("Tokyo").await.unwrap();
        let second = resolver.lookup("tokyo ").await.unwrap();

        assert_eq!(first.provenance(), Some(Provenance::RemoteFresh));
        assert_eq!(second.provenance(), Some(Provenance::LocalCache));
        assert_eq!(first.value(), second.value());
        assert_eq!(provider.calls().len(), 1);
    }
}
