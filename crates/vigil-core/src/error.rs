//! Error types for Vigil

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type alias using [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A single failed form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name as shown on the form (`email`, `password`, `captcha`, ...)
    pub field: String,
    /// Message rendered next to the field
    pub message: String,
}

impl FieldError {
    /// Create a new field error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Main error type for Vigil
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One or more form fields failed validation
    #[error("Validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    /// Credentials were rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Catch-all around a simulated async operation
    #[error("Operation failed: {0}")]
    Operation(String),

    /// A guarded operation is already running
    #[error("Operation already in progress: {0}")]
    OperationInProgress(String),

    /// Unknown dashboard view identifier
    #[error("Invalid view: {0}")]
    InvalidView(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (should not happen in production)
    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Create a validation error for a single field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation(vec![FieldError::new(field, message)])
    }

    /// Field errors carried by a validation failure, empty for other kinds
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Error::Validation(fields) => fields,
            _ => &[],
        }
    }

    /// Message for a specific field, if that field failed
    pub fn field_message(&self, field: &str) -> Option<&str> {
        self.field_errors()
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Whether the error is a validation failure
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Text shown inline on the form or view that triggered the error
    pub fn inline_message(&self) -> String {
        match self {
            Error::Validation(fields) => fields
                .first()
                .map(|f| f.message.clone())
                .unwrap_or_else(|| "Invalid input".to_string()),
            Error::Authentication(msg) => msg.clone(),
            Error::OperationInProgress(_) => "Please wait for the current request".to_string(),
            Error::Operation(_) => "An error occurred. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}
