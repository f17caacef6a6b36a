//! City lookup endpoints

use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::lookup::{lookup_response, LookupMessages};
use super::state::AppState;
use super::types::ApiError;
use crate::domain::{CachedRecord, CityFields, CityRecord, Provenance};

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    pub name: Option<String>,
}

/// City as returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityData {
    pub lookup_key: String,
    #[serde(flatten)]
    pub city: CityFields,
    pub source: Provenance,
    pub last_updated: DateTime<Utc>,
}

impl CityData {
    fn new(record: CityRecord, source: Provenance) -> Self {
        Self {
            lookup_key: record.key().to_string(),
            city: record.fields().clone(),
            source,
            last_updated: record.updated_at(),
        }
    }
}

/// GET /api/geo/city?name=
pub async fn get_city(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Response, ApiError> {
    let name = query
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Query parameter 'name' is required"))?;

    resolve_city(&state, &name).await
}

/// GET /api/geo/city/{name}
pub async fn get_city_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    resolve_city(&state, &name).await
}

async fn resolve_city(state: &AppState, name: &str) -> Result<Response, ApiError> {
    debug!(name = %name, "Resolving city");

    let lookup = state.city_resolver.lookup(name).await?;

    Ok(lookup_response(
        lookup,
        LookupMessages {
            found: "City retrieved",
            not_found: format!("City '{}' not found", name.trim()),
            remote_failed: "Failed to fetch city from GeoNames",
        },
        CityData::new,
    ))
}
