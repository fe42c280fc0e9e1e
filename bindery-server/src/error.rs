//! Mapping pipeline failures onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bindery_core::{BinderyError, ValidationError};

/// A failed request, rendered as a plain-text response
#[derive(Debug)]
pub struct ApiError(pub BinderyError);

impl From<BinderyError> for ApiError {
    fn from(err: BinderyError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl ApiError {
    /// Status code for this failure
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BinderyError::Validation(_) => StatusCode::BAD_REQUEST,
            BinderyError::Fetch(err) => err
                .upstream_status()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .filter(|status| status.is_client_error() || status.is_server_error())
                .unwrap_or(StatusCode::BAD_REQUEST),
            BinderyError::Assembly(_) | BinderyError::Conversion(_) | BinderyError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = if self.0.is_client_error() {
            tracing::info!("Rejected request ({}): {}", status, self.0);
            self.0.to_string()
        } else {
            tracing::error!("Book generation failed: {}", self.0);
            "failed to generate book".to_string()
        };
        (status, body).into_response()
    }
}
