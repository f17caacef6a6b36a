//! API error type and domain error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::error;

use super::envelope::Envelope;
use crate::domain::DomainError;

/// Message returned for failures whose detail must not reach clients
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// API error with status code and envelope body
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: Envelope<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: Envelope::message(message),
        }
    }

    /// Attach data to the error body
    pub fn with_data(mut self, data: Value) -> Self {
        self.response.data = Some(data);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::Provider { provider, message } => {
                Self::internal(format!("{}: {}", provider, message))
            }
            DomainError::Configuration { message } => Self::internal(message),
            DomainError::Storage { message } => Self::internal(message),
            DomainError::Internal { message } => {
                error!(error = %message, "Unexpected failure");
                Self::internal(INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.response.message)
    }
}

impl std::error::Error for ApiError {}
