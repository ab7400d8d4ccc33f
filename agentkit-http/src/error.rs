use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

pub const PROMPT_REQUIRED: &str = "Prompt is required.";
pub const PROMPT_FAILED: &str = "Failed to process prompt.";
pub const WALLET_NOT_FOUND: &str = "Wallet data not found.";
pub const WALLET_FAILED: &str = "Failed to retrieve wallet data.";

/// Error body returned by every endpoint: `{"error": "<message>"}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip)]
    status: StatusCode,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            status,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Custom JSON extractor that returns our ErrorResponse on deserialization failures
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ErrorResponse))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        // A body sent without a JSON content type reads as an empty object
        if let JsonRejection::MissingJsonContentType(_) = rejection {
            return ErrorResponse::invalid_request(PROMPT_REQUIRED);
        }
        let message = rejection.body_text();
        error!("JSON deserialization error: {}", message);
        ErrorResponse::invalid_request(message)
    }
}
