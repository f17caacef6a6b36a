use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::city::{CityFields, Coordinates, UNKNOWN};
use crate::domain::{DomainError, GeocodingProvider, ProviderResult};
use crate::infrastructure::http::HttpClientTrait;

pub const DEFAULT_GEONAMES_BASE_URL: &str = "http://api.geonames.org";
const PROVIDER: &str = "geonames";

/// GeoNames search API provider
///
/// Always requests a single row and takes the top-ranked populated place.
/// There is no disambiguation between candidates.
#[derive(Debug)]
pub struct GeoNamesProvider<C: HttpClientTrait> {
    client: C,
    username: Option<String>,
    base_url: String,
}

impl<C: HttpClientTrait> GeoNamesProvider<C> {
    pub fn new(client: C, username: Option<String>) -> Self {
        Self::with_base_url(client, username, DEFAULT_GEONAMES_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        username: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            username: username.filter(|u| !u.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self) -> String {
        format!("{}/searchJSON", self.base_url)
    }

    fn parse_response(json: serde_json::Value) -> Result<ProviderResult<CityFields>, DomainError> {
        let response: GeoNamesResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::internal(format!("Malformed GeoNames payload: {}", e))
        })?;

        // GeoNames reports account and quota problems in-band with a 200
        if let Some(status) = response.status {
            return Ok(ProviderResult::ProviderError(status.message));
        }

        let Some(city) = response.geonames.into_iter().next() else {
            return Ok(ProviderResult::NotFound);
        };

        let latitude = parse_coordinate(&city.lat, "lat")?;
        let longitude = parse_coordinate(&city.lng, "lng")?;
        let coordinates = Coordinates::new(latitude, longitude)
            .map_err(|e| DomainError::internal(format!("Malformed GeoNames payload: {}", e)))?;

        Ok(ProviderResult::Found(CityFields {
            city_name: city.name,
            country: or_unknown(city.country_name),
            region: or_unknown(city.admin_name1),
            coordinates,
            population: city.population.unwrap_or(0),
        }))
    }
}

#[async_trait]
impl<C: HttpClientTrait> GeocodingProvider for GeoNamesProvider<C> {
    async fn fetch_city(&self, name: &str) -> Result<ProviderResult<CityFields>, DomainError> {
        let username = self.username.as_deref().ok_or_else(|| {
            DomainError::configuration("GeoNames username is not configured (GEONAMES_USERNAME)")
        })?;

        debug!(city = %name, "Querying GeoNames");

        let query = [
            ("name", name),
            ("maxRows", "1"),
            ("username", username),
            ("featureClass", "P"),
            ("style", "FULL"),
        ];

        match self.client.get_json(&self.search_url(), &query).await {
            Ok(json) => Self::parse_response(json),
            Err(DomainError::NotFound { .. }) => Ok(ProviderResult::NotFound),
            Err(DomainError::Provider { message, .. }) => {
                warn!(city = %name, error = %message, "GeoNames request failed");
                Ok(ProviderResult::ProviderError(message))
            }
            Err(e) => Err(e),
        }
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

fn or_unknown(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// GeoNames sends coordinates as decimal strings
fn parse_coordinate(value: &serde_json::Value, field: &str) -> Result<f64, DomainError> {
    let parsed = match value {
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        serde_json::Value::Number(n) => n.as_f64(),
        _ => None,
    };

    parsed.ok_or_else(|| {
        DomainError::internal(format!(
            "Malformed GeoNames payload: invalid '{}' value {}",
            field, value
        ))
    })
}

#[derive(Debug, Deserialize)]
struct GeoNamesResponse {
    #[serde(default)]
    geonames: Vec<GeoNamesCity>,
    #[serde(default)]
    status: Option<GeoNamesStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeoNamesCity {
    name: String,
    lat: serde_json::Value,
    lng: serde_json::Value,
    #[serde(default)]
    country_name: Option<String>,
    #[serde(default)]
    population: Option<u64>,
    #[serde(default, rename = "adminName1")]
    admin_name1: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeoNamesStatus {
    message: String,
}
