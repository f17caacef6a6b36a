//! City record and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::cache::CachedRecord;

/// Placeholder for optional display fields the provider left out
pub const UNKNOWN: &str = "N/A";

/// Errors raised when building coordinates
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoordinateError {
    #[error("Latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A WGS84 position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Creates coordinates, rejecting out-of-range or non-finite values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Geographic metadata for a city, as mapped from the geocoding provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityFields {
    pub city_name: String,
    pub country: String,
    pub region: String,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub population: u64,
}

/// A cached city, keyed by the normalized search string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityRecord {
    lookup_key: String,
    #[serde(flatten)]
    fields: CityFields,
    queried_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CityRecord {
    pub fn lookup_key(&self) -> &str {
        &self.lookup_key
    }

    pub fn city_name(&self) -> &str {
        &self.fields.city_name
    }

    pub fn country(&self) -> &str {
        &self.fields.country
    }

    pub fn region(&self) -> &str {
        &self.fields.region
    }

    pub fn coordinates(&self) -> Coordinates {
        self.fields.coordinates
    }

    pub fn population(&self) -> u64 {
        self.fields.population
    }
}

impl CachedRecord for CityRecord {
    type Fields = CityFields;

    fn key(&self) -> &str {
        &self.lookup_key
    }

    fn fields(&self) -> &CityFields {
        &self.fields
    }

    fn queried_at(&self) -> DateTime<Utc> {
        self.queried_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn assemble(
        key: String,
        fields: CityFields,
        queried_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            lookup_key: key,
            fields,
            queried_at,
            updated_at,
        }
    }
}
