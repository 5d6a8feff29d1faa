//! Error types for the switch configuration engine
//!
//! Engine-level failures are reported per field as [`FieldError`] values so a
//! multi-field update can report each failure alongside the fields that
//! succeeded. [`Error`] is the underlying error enum used everywhere else.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for switch engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the switch engine
#[derive(Error, Debug)]
pub enum Error {
    /// Interface name is not part of the fixed interface set
    #[error("Unknown interface: {0}")]
    UnknownInterface(String),

    /// Interface state is not `up` or `down`
    #[error("Invalid interface state '{0}' (valid states: up, down)")]
    InvalidState(String),

    /// A field value failed validation (blank hostname, disallowed status, ...)
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// The external action reported failure
    #[error("Action {action} failed: {reason}")]
    ExternalAction {
        /// Action name (e.g. `set_hostname`)
        action: String,
        /// Output captured from the action
        output: String,
        /// Failure reason reported by the runner
        reason: String,
    },

    /// The inbound update could not be understood
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The runner could not execute an action at all
    #[error("Runner error: {0}")]
    Runner(String),

}

impl Error {
    /// Create an unknown interface error
    pub fn unknown_interface(name: impl Into<String>) -> Self {
        Self::UnknownInterface(name.into())
    }

    /// Create an invalid state error
    pub fn invalid_state(state: impl Into<String>) -> Self {
        Self::InvalidState(state.into())
    }

    /// Create an invalid value error
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }

    /// Create an external action failure
    pub fn external_action(
        action: impl Into<String>,
        output: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ExternalAction {
            action: action.into(),
            output: output.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed request error
    pub fn malformed_request(msg: impl Into<String>) -> Self {
        Self::MalformedRequest(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a runner error
    pub fn runner(msg: impl Into<String>) -> Self {
        Self::Runner(msg.into())
    }

    /// Classify this error for callers
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownInterface(_) => ErrorKind::UnknownInterface,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::InvalidValue(_) => ErrorKind::InvalidValue,
            Self::ExternalAction { .. } | Self::Runner(_) => ErrorKind::ExternalActionFailure,
            Self::MalformedRequest(_) => ErrorKind::MalformedRequest,
            Self::Config(_) => ErrorKind::Internal,
        }
    }

    /// Output captured from an external action, if this error carries any
    pub fn captured_output(&self) -> Option<&str> {
        match self {
            Self::ExternalAction { output, .. } if !output.is_empty() => Some(output),
            _ => None,
        }
    }
}

/// Stable, machine-readable error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnknownInterface,
    InvalidState,
    InvalidValue,
    ExternalActionFailure,
    MalformedRequest,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownInterface => "unknown_interface",
            Self::InvalidState => "invalid_state",
            Self::InvalidValue => "invalid_value",
            Self::ExternalActionFailure => "external_action_failure",
            Self::MalformedRequest => "malformed_request",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure attributed to one field of an update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name as it appears in the change summary (`hostname`, `interface_eth0`, ...)
    pub field: String,
    /// Error classification
    pub kind: ErrorKind,
    /// Human-readable failure reason
    pub message: String,
    /// Captured action output, for external action failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl FieldError {
    /// Attribute `error` to `field`
    pub fn new(field: impl Into<String>, error: &Error) -> Self {
        Self {
            field: field.into(),
            kind: error.kind(),
            message: error.to_string(),
            output: error.captured_output().map(str::to_string),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
