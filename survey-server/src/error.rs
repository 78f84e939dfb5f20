//! HTTP error type for survey-server
//!
//! Not-found and bad-request errors carry their message to the caller.
//! Storage failures answer with a fixed per-operation message; the underlying
//! error is logged here and never returned.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Participant record absent (404)
    #[error("Not found")]
    NotFound,

    /// Malformed body, multipart stream or path parameter (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Request rejected while reading the body (status chosen by the extractor)
    #[error("Rejected ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    /// Disk I/O or stored-document failure (500)
    #[error("{message}: {source}")]
    Storage {
        /// Message returned to the caller
        message: &'static str,
        #[source]
        source: survey_common::Error,
    },
}

impl ApiError {
    /// Map a store error for an operation whose failures read as `message`
    ///
    /// `NotFound` and `InvalidInput` keep their own status codes.
    pub fn storage(message: &'static str) -> impl FnOnce(survey_common::Error) -> ApiError {
        move |source| match source {
            survey_common::Error::NotFound(_) => ApiError::NotFound,
            survey_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            source => ApiError::Storage { message, source },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Rejected { status, message } => (status, message),
            ApiError::Storage { message, source } => {
                error!("{}: {}", message, source);
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        ApiError::Rejected {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl From<axum::extract::multipart::MultipartRejection> for ApiError {
    fn from(e: axum::extract::multipart::MultipartRejection) -> Self {
        ApiError::Rejected {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl From<axum::extract::rejection::BytesRejection> for ApiError {
    fn from(e: axum::extract::rejection::BytesRejection) -> Self {
        ApiError::Rejected {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
