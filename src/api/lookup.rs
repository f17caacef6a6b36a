//! Translation of resolver outcomes into HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::types::{ApiError, Envelope, Json};
use crate::domain::{Lookup, Provenance};

/// Messages for one kind of lookup
pub struct LookupMessages {
    pub found: &'static str,
    pub not_found: String,
    pub remote_failed: &'static str,
}

/// Renders a lookup: 200 for hits and fetches, 404 for not found, 500 otherwise.
///
/// Data fetched but not persisted is still included in the 500 body.
pub fn lookup_response<T, D, F>(lookup: Lookup<T>, messages: LookupMessages, render: F) -> Response
where
    D: Serialize,
    F: FnOnce(T, Provenance) -> D,
{
    match lookup {
        Lookup::Hit(value) => ok(messages.found, render(value, Provenance::LocalCache)),
        Lookup::Fetched {
            value,
            write_failures,
        } => {
            let data = render(value, Provenance::RemoteFresh);

            if write_failures > 0 {
                ok(
                    format!("{} ({} could not be cached)", messages.found, write_failures),
                    data,
                )
            } else {
                ok(messages.found, data)
            }
        }
        Lookup::NotFound => ApiError::not_found(messages.not_found).into_response(),
        Lookup::RemoteError(detail) => {
            ApiError::internal(format!("{}: {}", messages.remote_failed, detail)).into_response()
        }
        Lookup::StoreError { message, unsaved } => {
            let error = ApiError::internal(format!("Storage unavailable: {}", message));

            let data = unsaved
                .map(|value| render(value, Provenance::RemoteFresh))
                .and_then(|data| serde_json::to_value(data).ok());

            match data {
                Some(data) => error.with_data(data).into_response(),
                None => error.into_response(),
            }
        }
        Lookup::ConfigError(message) => {
            ApiError::internal(format!("Provider not configured: {}", message)).into_response()
        }
    }
}

fn ok<D: Serialize>(message: impl Into<String>, data: D) -> Response {
    (StatusCode::OK, Json(Envelope::with_data(message, data))).into_response()
}
