//! Report infrastructure - repositories and services

mod in_memory;
mod postgres;
mod service;

pub use in_memory::InMemoryReportRepository;
pub use postgres::PostgresReportRepository;
pub use service::{
    CreateGeoReportRequest, CreateTransitIncidentRequest, GeoReportService,
    TransitIncidentService, UpdateGeoReportRequest, UpdateTransitIncidentRequest,
};
