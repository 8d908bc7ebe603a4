//! Handler error taxonomy and its single translation into the response
//! envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shared::ApiResponse;
use thiserror::Error;

use crate::store::StoreError;

/// Everything a handler can fail with. Conversion to the wire envelope
/// happens once, in the [`IntoResponse`] impl, so handlers just use `?`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// One message per violated field rule.
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Task not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            // Storage detail goes to the log, not to the client.
            ApiError::Store(err) => {
                tracing::error!(error = %err, "store operation failed");
                "Something went wrong".to_string()
            }
            other => other.to_string(),
        };
        let body = ApiResponse::<()>::error(status.as_u16(), message);
        (status, Json(body)).into_response()
    }
}
