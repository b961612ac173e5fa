use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::orchestration::OrchestratorError;

/// API error type with HTTP status code and message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        let message = err.to_string();
        match err {
            OrchestratorError::NotFound { .. } | OrchestratorError::UnknownAgent(_) => {
                Self::not_found(message)
            }
            OrchestratorError::EmptyRequest | OrchestratorError::InvalidPlan(_) => {
                Self::bad_request(message)
            }
            OrchestratorError::DuplicateAgent(_)
            | OrchestratorError::InvalidTransition(_)
            | OrchestratorError::CyclicDependency { .. }
            | OrchestratorError::NoEligibleAgent(_)
            | OrchestratorError::DependenciesUnmet { .. } => Self::conflict(message),
            OrchestratorError::ExecutionTimeout(_) => {
                Self::new(StatusCode::GATEWAY_TIMEOUT, message)
            }
            OrchestratorError::ExecutionFailed(_) => Self::internal_server_error(message),
        }
    }
}
