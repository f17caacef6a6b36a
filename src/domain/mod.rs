//! Domain layer - Core entities, traits and outcomes

pub mod cache;
pub mod city;
pub mod error;
pub mod provider;
pub mod report;
pub mod transit;

pub use cache::{normalize_key, CachedRecord, Lookup, Provenance, RecordStore};
pub use city::{CityFields, CityRecord, Coordinates};
pub use error::DomainError;
pub use provider::{GeocodingProvider, ProviderResult, TransitStatusProvider};
pub use report::{GeoReport, ReportEntity, ReportRepository, TransitIncident};
pub use transit::{FetchedLine, LineFields, TransitLineRecord};
