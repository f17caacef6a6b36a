//! User-submitted report entities

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{
    validate_geo_report, validate_transit_incident, ReportValidationError,
};
use crate::domain::city::Coordinates;

/// Trait for report types held by a [`ReportRepository`](super::ReportRepository)
pub trait ReportEntity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    fn id(&self) -> Uuid;

    /// Listing order key; repositories list newest first
    fn reported_at(&self) -> DateTime<Utc>;

    fn validate(&self) -> Result<(), ReportValidationError>;
}

/// A citizen report about an incident in a city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoReport {
    pub id: Uuid,
    pub city: String,
    pub description: String,
    pub incident_type: String,
    pub coordinates: Coordinates,
    pub reported_at: DateTime<Utc>,
}

impl GeoReport {
    pub fn new(
        city: impl Into<String>,
        description: impl Into<String>,
        incident_type: impl Into<String>,
        coordinates: Coordinates,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            city: city.into(),
            description: description.into(),
            incident_type: incident_type.into(),
            coordinates,
            reported_at: Utc::now(),
        }
    }
}

impl ReportEntity for GeoReport {
    fn id(&self) -> Uuid {
        self.id
    }

    fn reported_at(&self) -> DateTime<Utc> {
        self.reported_at
    }

    fn validate(&self) -> Result<(), ReportValidationError> {
        validate_geo_report(self)
    }
}

/// A user-reported incident on a transit line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitIncident {
    pub id: Uuid,
    pub line_id: String,
    pub line_name: String,
    pub line_status: String,
    pub line_severity: i32,
    pub reported_at: DateTime<Utc>,
}

impl TransitIncident {
    pub fn new(
        line_id: impl Into<String>,
        line_name: impl Into<String>,
        line_status: impl Into<String>,
        line_severity: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            line_id: line_id.into(),
            line_name: line_name.into(),
            line_status: line_status.into(),
            line_severity,
            reported_at: Utc::now(),
        }
    }
}

impl ReportEntity for TransitIncident {
    fn id(&self) -> Uuid {
        self.id
    }

    fn reported_at(&self) -> DateTime<Utc> {
        self.reported_at
    }

    fn validate(&self) -> Result<(), ReportValidationError> {
        validate_transit_incident(self)
    }
}
