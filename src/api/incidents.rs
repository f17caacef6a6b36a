//! Transit incident endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::state::AppState;
use super::types::{ApiError, Envelope, Json};
use crate::domain::TransitIncident;
use crate::infrastructure::report::{CreateTransitIncidentRequest, UpdateTransitIncidentRequest};

/// Request to report an incident on a line
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentApiRequest {
    pub line_id: String,
    pub line_name: String,
    pub line_status: String,
    #[serde(default)]
    pub line_severity: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIncidentApiRequest {
    pub line_id: Option<String>,
    pub line_name: Option<String>,
    pub line_status: Option<String>,
    pub line_severity: Option<i32>,
}

fn not_found(id: &str) -> ApiError {
    ApiError::not_found(format!("Incident '{}' not found", id))
}

/// GET /api/transit/incidents
pub async fn list_incidents(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<TransitIncident>>>, ApiError> {
    debug!("Listing transit incidents");

    let incidents = state.transit_incidents.list().await?;

    Ok(Json(Envelope::with_data(
        format!("{} incidents", incidents.len()),
        incidents,
    )))
}

/// POST /api/transit/incidents
pub async fn create_incident(
    State(state): State<AppState>,
    Json(request): Json<CreateIncidentApiRequest>,
) -> Result<(StatusCode, Json<Envelope<TransitIncident>>), ApiError> {
    debug!(line_id = %request.line_id, "Creating transit incident");

    let incident = state
        .transit_incidents
        .create(CreateTransitIncidentRequest {
            line_id: request.line_id,
            line_name: request.line_name,
            line_status: request.line_status,
            line_severity: request.line_severity,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_data("Incident created", incident)),
    ))
}

/// GET /api/transit/incidents/{id}
pub async fn get_incident(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<TransitIncident>>, ApiError> {
    let incident = state
        .transit_incidents
        .get(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;

    Ok(Json(Envelope::with_data("Incident retrieved", incident)))
}

/// PUT /api/transit/incidents/{id}
pub async fn update_incident(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateIncidentApiRequest>,
) -> Result<Json<Envelope<TransitIncident>>, ApiError> {
    debug!(id = %id, "Updating transit incident");

    let incident = state
        .transit_incidents
        .update(
            &id,
            UpdateTransitIncidentRequest {
                line_id: request.line_id,
                line_name: request.line_name,
                line_status: request.line_status,
                line_severity: request.line_severity,
            },
        )
        .await?;

    Ok(Json(Envelope::with_data("Incident updated", incident)))
}

/// DELETE /api/transit/incidents/{id}
pub async fn delete_incident(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Value>>, ApiError> {
    debug!(id = %id, "Deleting transit incident");

    if !state.transit_incidents.delete(&id).await? {
        return Err(not_found(&id));
    }

    Ok(Json(Envelope::message("Incident deleted")))
}
