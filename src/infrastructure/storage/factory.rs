//! Storage factory for runtime storage selection

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::cache::RecordStore;
use crate::domain::city::CityRecord;
use crate::domain::report::{GeoReport, ReportRepository, TransitIncident};
use crate::domain::transit::TransitLineRecord;
use crate::domain::DomainError;
use crate::infrastructure::report::{InMemoryReportRepository, PostgresReportRepository};

use super::in_memory::InMemoryStore;
use super::noop::NoopStore;
use super::postgres::{PostgresConfig, PostgresStore};

pub const CITY_TABLE: &str = "city_cache";
pub const TRANSIT_LINE_TABLE: &str = "transit_line_cache";
pub const GEO_REPORT_TABLE: &str = "geo_reports";
pub const TRANSIT_INCIDENT_TABLE: &str = "transit_incidents";

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// No persistence; resolvers run remote-only
    Disabled,
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "disabled" | "off" => Some(Self::Disabled),
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Disabled,
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    /// Returns the storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::Disabled => StorageType::Disabled,
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// The store handles shared by every resolver and service
#[derive(Debug, Clone)]
pub struct Stores {
    pub cities: Arc<dyn RecordStore<CityRecord>>,
    pub transit_lines: Arc<dyn RecordStore<TransitLineRecord>>,
    pub geo_reports: Arc<dyn ReportRepository<GeoReport>>,
    pub transit_incidents: Arc<dyn ReportRepository<TransitIncident>>,
}

/// Factory for creating store instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates every store for the configuration. A configured PostgreSQL
    /// backend that cannot be reached is an error.
    pub async fn create(config: &StorageConfig) -> Result<Stores, DomainError> {
        match config {
            StorageConfig::Disabled => {
                warn!("Storage not configured; lookups will not be cached and reports are kept in memory");
                Ok(Self::disabled())
            }
            StorageConfig::InMemory => {
                info!("Using in-memory storage");
                Ok(Self::in_memory())
            }
            StorageConfig::Postgres(pg_config) => {
                info!("Connecting to PostgreSQL");
                Self::postgres(pg_config).await
            }
        }
    }

    pub fn in_memory() -> Stores {
        Stores {
            cities: Arc::new(InMemoryStore::<CityRecord>::new()),
            transit_lines: Arc::new(InMemoryStore::<TransitLineRecord>::new()),
            geo_reports: Arc::new(InMemoryReportRepository::<GeoReport>::new()),
            transit_incidents: Arc::new(InMemoryReportRepository::<TransitIncident>::new()),
        }
    }

    pub fn disabled() -> Stores {
        Stores {
            cities: Arc::new(NoopStore::<CityRecord>::new()),
            transit_lines: Arc::new(NoopStore::<TransitLineRecord>::new()),
            geo_reports: Arc::new(InMemoryReportRepository::<GeoReport>::new()),
            transit_incidents: Arc::new(InMemoryReportRepository::<TransitIncident>::new()),
        }
    }

    /// Opens one pool and builds every store on top of it
    pub async fn postgres(config: &PostgresConfig) -> Result<Stores, DomainError> {
        let pool = config.connect().await?;

        let cities = PostgresStore::<CityRecord>::new(pool.clone(), CITY_TABLE);
        cities.ensure_table().await?;

        let transit_lines = PostgresStore::<TransitLineRecord>::new(pool.clone(), TRANSIT_LINE_TABLE);
        transit_lines.ensure_table().await?;

        let geo_reports = PostgresReportRepository::<GeoReport>::new(pool.clone(), GEO_REPORT_TABLE);
        geo_reports.ensure_table().await?;

        let transit_incidents =
            PostgresReportRepository::<TransitIncident>::new(pool, TRANSIT_INCIDENT_TABLE);
        transit_incidents.ensure_table().await?;

        Ok(Stores {
            cities: Arc::new(cities),
            transit_lines: Arc::new(transit_lines),
            geo_reports: Arc::new(geo_reports),
            transit_incidents: Arc::new(transit_incidents),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_parse() {
        assert_eq!(StorageType::parse("memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::parse(" PostgreSQL "), Some(StorageType::Postgres));
        assert_eq!(StorageType::parse("off"), Some(StorageType::Disabled));
        assert_eq!(StorageType::parse("mongodb"), None);
    }

    #[tokio::test]
    async fn test_disabled_storage_never_caches() {
        let stores = StorageFactory::create(&StorageConfig::Disabled).await.unwrap();
        assert!(stores.cities.find_all().await.unwrap().is_empty());
        assert_eq!(StorageConfig::Disabled.storage_type(), StorageType::Disabled);
    }
}
