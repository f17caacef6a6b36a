//! Application state shared by every handler

use std::sync::Arc;

use crate::domain::{GeocodingProvider, TransitStatusProvider};
use crate::infrastructure::report::{GeoReportService, TransitIncidentService};
use crate::infrastructure::resolver::{CityResolver, TransitStatusResolver};
use crate::infrastructure::storage::Stores;

/// Resolvers and report services, built once over the shared stores
#[derive(Debug, Clone)]
pub struct AppState {
    pub city_resolver: Arc<CityResolver>,
    pub transit_resolver: Arc<TransitStatusResolver>,
    pub geo_reports: Arc<GeoReportService>,
    pub transit_incidents: Arc<TransitIncidentService>,
    pub stores: Stores,
    /// City label on bulk transit responses
    pub transit_city: String,
}

impl AppState {
    pub fn new(
        stores: Stores,
        geocoder: Arc<dyn GeocodingProvider>,
        transit: Arc<dyn TransitStatusProvider>,
        transit_city: impl Into<String>,
    ) -> Self {
        Self {
            city_resolver: Arc::new(CityResolver::new(stores.cities.clone(), geocoder)),
            transit_resolver: Arc::new(TransitStatusResolver::new(
                stores.transit_lines.clone(),
                transit,
            )),
            geo_reports: Arc::new(GeoReportService::new(stores.geo_reports.clone())),
            transit_incidents: Arc::new(TransitIncidentService::new(
                stores.transit_incidents.clone(),
            )),
            stores,
            transit_city: transit_city.into(),
        }
    }
}
