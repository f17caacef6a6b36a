//! Geo report endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::state::AppState;
use super::types::{ApiError, Envelope, Json};
use crate::domain::GeoReport;
use crate::infrastructure::report::{CreateGeoReportRequest, UpdateGeoReportRequest};

/// Request to file a geo report
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGeoReportApiRequest {
    pub city: String,
    pub description: String,
    pub incident_type: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Request to update a geo report; absent fields are kept
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGeoReportApiRequest {
    pub city: Option<String>,
    pub description: Option<String>,
    pub incident_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

fn not_found(id: &str) -> ApiError {
    ApiError::not_found(format!("Report '{}' not found", id))
}

/// GET /api/geo/reports
pub async fn list_reports(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<GeoReport>>>, ApiError> {
    debug!("Listing geo reports");

    let reports = state.geo_reports.list().await?;

    Ok(Json(Envelope::with_data(
        format!("{} reports", reports.len()),
        reports,
    )))
}

/// POST /api/geo/reports
pub async fn create_report(
    State(state): State<AppState>,
    Json(request): Json<CreateGeoReportApiRequest>,
) -> Result<(StatusCode, Json<Envelope<GeoReport>>), ApiError> {
    debug!(city = %request.city, "Creating geo report");

    let report = state
        .geo_reports
        .create(CreateGeoReportRequest {
            city: request.city,
            description: request.description,
            incident_type: request.incident_type,
            latitude: request.latitude,
            longitude: request.longitude,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_data("Report created", report)),
    ))
}

/// GET /api/geo/reports/{id}
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<GeoReport>>, ApiError> {
    debug!(id = %id, "Getting geo report");

    let report = state
        .geo_reports
        .get(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;

    Ok(Json(Envelope::with_data("Report retrieved", report)))
}

/// PUT /api/geo/reports/{id}
pub async fn update_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateGeoReportApiRequest>,
) -> Result<Json<Envelope<GeoReport>>, ApiError> {
    debug!(id = %id, "Updating geo report");

    let report = state
        .geo_reports
        .update(
            &id,
            UpdateGeoReportRequest {
                city: request.city,
                description: request.description,
                incident_type: request.incident_type,
                latitude: request.latitude,
                longitude: request.longitude,
            },
        )
        .await?;

    Ok(Json(Envelope::with_data("Report updated", report)))
}

/// DELETE /api/geo/reports/{id}
pub async fn delete_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Value>>, ApiError> {
    debug!(id = %id, "Deleting geo report");

    if !state.geo_reports.delete(&id).await? {
        return Err(not_found(&id));
    }

    Ok(Json(Envelope::message("Report deleted")))
}
