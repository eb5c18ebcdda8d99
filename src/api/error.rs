use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::upload_service::UploadError;
use crate::utils::validation::RejectReason;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Rejected: {0}")]
    Rejected(RejectReason),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Store Failed: {0}")]
    StoreFailed(String),
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Rejected(reason) => AppError::Rejected(reason),
            UploadError::StoreFailed(detail) => AppError::StoreFailed(detail),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Rejected(reason) => (StatusCode::BAD_REQUEST, reason.message().to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            // Detail was already logged for operators
            AppError::StoreFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to upload file to object store".to_string(),
            ),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
