//! Storage infrastructure - Record store implementations

mod factory;
mod in_memory;
mod noop;
mod postgres;

pub use factory::{
    StorageConfig, StorageFactory, StorageType, Stores, CITY_TABLE, GEO_REPORT_TABLE,
    TRANSIT_INCIDENT_TABLE, TRANSIT_LINE_TABLE,
};
pub use in_memory::InMemoryStore;
pub use noop::NoopStore;
pub use postgres::{PostgresConfig, PostgresStore};
