//! Server-level error types
//!
//! Feature slices map their own errors (see `features::lists::routes`); this type covers the
//! routes that live outside any slice.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::response::ErrorResponse;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::ServiceUnavailable(ref reason) => {
                tracing::error!("Service unavailable: {}", reason);
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            },
        };

        (status, Json(ErrorResponse::new(code, self.to_string()))).into_response()
    }
}
