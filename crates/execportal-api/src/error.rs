//! Error types for execportal-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use execportal_core::error::ErrorCode;
use execportal_core::CoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Core(e) => match e.code() {
                ErrorCode::NotLoaded => StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::InvalidPeriodRange
                | ErrorCode::UnknownStatement
                | ErrorCode::UnknownMetric => StatusCode::BAD_REQUEST,
                ErrorCode::NotSupported => StatusCode::NOT_IMPLEMENTED,
                ErrorCode::FileNotFound => StatusCode::NOT_FOUND,
                ErrorCode::ParseError | ErrorCode::IoError | ErrorCode::InvalidFormat => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Body served for the error
    pub fn body(&self) -> serde_json::Value {
        match self {
            ApiError::NotFound { .. } => json!({
                "code": "NOT_FOUND",
                "message": self.to_string(),
            }),
            ApiError::BadRequest { .. } => json!({
                "code": "BAD_REQUEST",
                "message": self.to_string(),
            }),
            ApiError::Core(e) => {
                let details = e.to_details();
                json!({
                    "code": details.code,
                    "message": details.message,
                    "suggestions": details.suggestions,
                })
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!(target: "execportal::api", "{}", self);
        } else {
            log::debug!(target: "execportal::api", "{}", self);
        }
        (status, Json(self.body())).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
