//! Report validation

use thiserror::Error;

use super::entity::{GeoReport, TransitIncident};

/// Errors that can occur during report validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReportValidationError {
    #[error("Field '{0}' cannot be empty")]
    EmptyField(&'static str),

    #[error("Field '{0}' cannot exceed {1} characters")]
    FieldTooLong(&'static str, usize),
}

const MAX_SHORT_FIELD_LENGTH: usize = 200;
const MAX_DESCRIPTION_LENGTH: usize = 2000;

fn require(field: &'static str, value: &str, max: usize) -> Result<(), ReportValidationError> {
    if value.trim().is_empty() {
        return Err(ReportValidationError::EmptyField(field));
    }

    if value.chars().count() > max {
        return Err(ReportValidationError::FieldTooLong(field, max));
    }

    Ok(())
}

/// Validate a geo report. Coordinates are range-checked on construction.
pub fn validate_geo_report(report: &GeoReport) -> Result<(), ReportValidationError> {
    require("city", &report.city, MAX_SHORT_FIELD_LENGTH)?;
    require("description", &report.description, MAX_DESCRIPTION_LENGTH)?;
    require("incidentType", &report.incident_type, MAX_SHORT_FIELD_LENGTH)?;
    Ok(())
}

/// Validate a transit incident
pub fn validate_transit_incident(incident: &TransitIncident) -> Result<(), ReportValidationError> {
    require("lineId", &incident.line_id, MAX_SHORT_FIELD_LENGTH)?;
    require("lineName", &incident.line_name, MAX_SHORT_FIELD_LENGTH)?;
    require("lineStatus", &incident.line_status, MAX_SHORT_FIELD_LENGTH)?;
    Ok(())
}
