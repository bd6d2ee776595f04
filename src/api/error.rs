use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use super::models::ErrorResponse;
use crate::pipeline::ExtractionFailure;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No URL provided")]
    MissingUrl,
    #[error("Invalid TeraBox URL")]
    InvalidLink,
    #[error("Payload exceeds {0} bytes")]
    PayloadTooLarge(usize),
    #[error(transparent)]
    ExtractionFailed(#[from] ExtractionFailure),
    #[error("Server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingUrl | ApiError::InvalidLink => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ExtractionFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            error: self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
