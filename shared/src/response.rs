use serde::{Deserialize, Serialize};

/// Uniform wrapper around every API response body.
///
/// On the wire this is `{ statusCode, data, message, success }`, with
/// `success` always derived from the status code. Error responses carry
/// `data: null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub data: Option<T>,
    pub message: String,
    pub success: bool,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload for a successful response.
    pub fn new(status_code: u16, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code,
            data: Some(data),
            message: message.into(),
            success: status_code < 400,
        }
    }

    /// Build an error envelope with no payload.
    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            data: None,
            message: message.into(),
            success: status_code < 400,
        }
    }
}
