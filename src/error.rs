//! Application error types.

use axum::{Json, http::StatusCode};
use thiserror::Error;

use crate::ApiResponse;
use crate::catalog::CatalogError;
use crate::recorder::RecorderError;

/// Startup and wiring errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Recorder error: {0}")]
    Recorder(#[from] RecorderError),
}

/// Error half of every JSON handler result
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

/// JSON handler result
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Build an error envelope with a matching status code
pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ApiResponse {
            code: status.as_u16(),
            message: message.into(),
            data: None,
        }),
    )
}

/// Map a catalog failure to an HTTP status
pub fn catalog_status(err: &CatalogError) -> StatusCode {
    match err {
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CatalogError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_GATEWAY,
    }
}
