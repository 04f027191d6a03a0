use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::inference::ClassifyError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Inference(String),

    /// The request body could not be read at all (too large, aborted).
    #[error("{1}")]
    UnreadableBody(StatusCode, String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Inference(msg) => {
                tracing::error!("Inference failed: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::UnreadableBody(status, msg) => (status, msg),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<ClassifyError> for AppError {
    fn from(e: ClassifyError) -> Self {
        match e {
            ClassifyError::InvalidInput => {
                AppError::BadRequest(ClassifyError::InvalidInput.to_string())
            }
            ClassifyError::Inference(msg) => AppError::Inference(msg),
        }
    }
}
