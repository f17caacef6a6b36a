//! Remote provider traits
//!
//! Clients report expected outcomes through [`ProviderResult`]. An `Err` is
//! reserved for missing configuration (`DomainError::Configuration`, raised
//! before any network call) and for payloads that do not have the expected
//! shape (`DomainError::Internal`).

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::city::CityFields;
use crate::domain::transit::FetchedLine;
use crate::domain::DomainError;

/// Outcome of a remote fetch
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResult<T> {
    Found(T),
    NotFound,
    /// Network failure or non-success response, with the provider's detail
    ProviderError(String),
}

/// Geocoding lookup by free-text city name
#[async_trait]
pub trait GeocodingProvider: Send + Sync + Debug {
    /// Fetches the provider's single best match for `name`
    async fn fetch_city(&self, name: &str) -> Result<ProviderResult<CityFields>, DomainError>;

    fn provider_name(&self) -> &'static str;
}

/// Transit status feed
#[async_trait]
pub trait TransitStatusProvider: Send + Sync + Debug {
    /// Fetches every line for the configured modes
    async fn fetch_all_lines(&self) -> Result<ProviderResult<Vec<FetchedLine>>, DomainError>;

    /// Fetches one line by its normalized id
    async fn fetch_line(&self, line_id: &str) -> Result<ProviderResult<FetchedLine>, DomainError>;

    fn provider_name(&self) -> &'static str;
}
