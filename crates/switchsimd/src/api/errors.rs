//! Error responses for the REST API
//!
//! Every error body is JSON: `{"error": <message>, "kind": <kind>}`, plus
//! `"output"` when an external action produced any.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use switchsim_core::{Error, ErrorKind};

/// API error type
#[derive(Debug)]
pub enum ApiError {
    /// The request body could not be parsed (400)
    MalformedRequest(String),
    /// An external action needed to answer the request failed (500)
    ActionFailed { message: String, output: String },
    /// Anything else (500)
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<&'a str>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::MalformedRequest(msg) => write!(f, "Malformed request: {msg}"),
            ApiError::ActionFailed { message, .. } => write!(f, "Action failed: {message}"),
            ApiError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::MalformedRequest(format!("Failed to parse the request body as JSON: {err}"))
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err.kind() {
            ErrorKind::MalformedRequest => ApiError::MalformedRequest(err.to_string()),
            ErrorKind::ExternalActionFailure => ApiError::ActionFailed {
                output: err.captured_output().unwrap_or_default().to_string(),
                message: err.to_string(),
            },
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message, output) = match &self {
            ApiError::MalformedRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorKind::MalformedRequest, msg, None)
            }
            ApiError::ActionFailed { message, output } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorKind::ExternalActionFailure,
                message,
                Some(output.as_str()).filter(|o| !o.is_empty()),
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorKind::Internal, msg, None),
        };

        let body = Json(ErrorBody {
            error: message,
            kind,
            output,
        });

        (status, body).into_response()
    }
}
