//! Report domain
//!
//! Geo reports and transit incidents submitted by users.

mod entity;
mod repository;
mod validation;

pub use entity::{GeoReport, ReportEntity, TransitIncident};
pub use repository::ReportRepository;
pub use validation::{validate_geo_report, validate_transit_incident, ReportValidationError};
