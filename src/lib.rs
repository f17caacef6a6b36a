//! Civic Gateway
//!
//! HTTP gateway over public data providers with a local cache-aside store:
//! - City metadata from GeoNames
//! - Line status from Transport for London
//! - User-submitted geo reports and transit incidents

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::geocoding::GeoNamesProvider;
use infrastructure::http::HttpClient;
use infrastructure::storage::StorageFactory;
use infrastructure::transit::TflProvider;
use tracing::{info, warn};

/// Create the application state: stores, provider clients, resolvers and services
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = config.storage_config()?;
    info!(backend = ?storage_config.storage_type(), "Storage backend selected");

    let stores = StorageFactory::create(&storage_config).await?;

    let client = HttpClient::with_timeout(config.http.timeout())?;

    if config.geocoding.username.is_none() {
        warn!("GeoNames username is not configured; uncached city lookups will fail");
    }

    let geocoder = GeoNamesProvider::with_base_url(
        client.clone(),
        config.geocoding.username.clone(),
        config.geocoding.base_url.clone(),
    );

    let transit = TflProvider::with_base_url(
        client,
        config.transit.base_url.clone(),
        config.transit.modes.clone(),
        config.transit.city.clone(),
    )
    .with_app_key(config.transit.app_key.clone());

    Ok(AppState::new(
        stores,
        Arc::new(geocoder),
        Arc::new(transit),
        config.transit.city.clone(),
    ))
}
