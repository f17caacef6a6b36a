//! Transit line status endpoints

use axum::{
    extract::{Path, State},
    response::Response,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::lookup::{lookup_response, LookupMessages};
use super::state::AppState;
use super::types::ApiError;
use crate::domain::{CachedRecord, LineFields, Lookup, Provenance, TransitLineRecord};

const REMOTE_FAILED: &str = "Failed to fetch line status from TfL";

/// One line as returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineData {
    pub line_id: String,
    #[serde(flatten)]
    pub line: LineFields,
    pub source: Provenance,
    pub last_updated: DateTime<Utc>,
}

impl LineData {
    fn new(record: TransitLineRecord, source: Provenance) -> Self {
        Self {
            line_id: record.key().to_string(),
            line: record.fields().clone(),
            source,
            last_updated: record.updated_at(),
        }
    }
}

/// Bulk status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinesData {
    pub city: String,
    pub total_lines: usize,
    pub lines: Vec<LineData>,
    pub source: Provenance,
    pub last_updated: Option<DateTime<Utc>>,
}

impl LinesData {
    fn new(city: String, records: Vec<TransitLineRecord>, source: Provenance) -> Self {
        let last_updated = records.iter().map(|r| r.updated_at()).max();
        let lines: Vec<LineData> = records
            .into_iter()
            .map(|r| LineData::new(r, source))
            .collect();

        Self {
            city,
            total_lines: lines.len(),
            lines,
            source,
            last_updated,
        }
    }
}

/// GET /api/transit/lines
pub async fn list_lines(State(state): State<AppState>) -> Result<Response, ApiError> {
    debug!("Resolving all transit lines");

    let lookup = state.transit_resolver.all_lines().await?;
    Ok(bulk_response(&state, lookup))
}

/// POST /api/transit/lines/refresh
pub async fn refresh_lines(State(state): State<AppState>) -> Result<Response, ApiError> {
    debug!("Refreshing all transit lines");

    let lookup = state.transit_resolver.refresh_all_lines().await?;
    Ok(bulk_response(&state, lookup))
}

/// GET /api/transit/lines/{line_id}
pub async fn get_line(
    State(state): State<AppState>,
    Path(line_id): Path<String>,
) -> Result<Response, ApiError> {
    debug!(line_id = %line_id, "Resolving transit line");

    let lookup = state.transit_resolver.line(&line_id).await?;
    Ok(line_response(&line_id, lookup))
}

/// POST /api/transit/lines/{line_id}/refresh
pub async fn refresh_line(
    State(state): State<AppState>,
    Path(line_id): Path<String>,
) -> Result<Response, ApiError> {
    debug!(line_id = %line_id, "Refreshing transit line");

    let lookup = state.transit_resolver.refresh_line(&line_id).await?;
    Ok(line_response(&line_id, lookup))
}

fn bulk_response(state: &AppState, lookup: Lookup<Vec<TransitLineRecord>>) -> Response {
    let city = state.transit_city.clone();

    lookup_response(
        lookup,
        LookupMessages {
            found: "Line statuses retrieved",
            not_found: "No transit lines found".to_string(),
            remote_failed: REMOTE_FAILED,
        },
        |records, source| LinesData::new(city, records, source),
    )
}

fn line_response(line_id: &str, lookup: Lookup<TransitLineRecord>) -> Response {
    lookup_response(
        lookup,
        LookupMessages {
            found: "Line status retrieved",
            not_found: format!("Line '{}' not found", line_id.trim()),
            remote_failed: REMOTE_FAILED,
        },
        LineData::new,
    )
}
