//! Error types for the DocSage service
//!
//! Every failure reaching the client is serialized as the uniform
//! `{"success": false, "error": <message>}` body with an HTTP status
//! matching the failure mode.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("{field} is required")]
    MissingField { field: String },

    #[error("Invalid file type. Only PDF and TXT files are allowed.")]
    UnsupportedFileType { extension: String },

    #[error("File too large: {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Document is too short or could not be parsed")]
    DocumentTooShort { chars: usize },

    // Session state errors
    #[error("No document uploaded. Please upload a document first.")]
    DocumentMissing,

    #[error("No active challenge found")]
    ChallengeMissing,

    #[error("Invalid question index")]
    QuestionIndexOutOfRange { index: usize, count: usize },

    // Ingestion errors
    #[error("Document parsing failed: {message}")]
    Parse { message: String },

    // External service errors
    #[error("Embedding service error: {message}")]
    Embedding { message: String },

    // Internal errors
    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation { .. }
            | AppError::MissingField { .. }
            | AppError::UnsupportedFileType { .. }
            | AppError::DocumentTooShort { .. }
            | AppError::DocumentMissing
            | AppError::ChallengeMissing
            | AppError::QuestionIndexOutOfRange { .. }
            | AppError::Parse { .. } => StatusCode::BAD_REQUEST,

            // 413 Payload Too Large
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,

            // 502 Bad Gateway
            AppError::Embedding { .. } => StatusCode::BAD_GATEWAY,

            // 500 Internal Server Error
            AppError::Internal { .. }
            | AppError::Configuration { .. }
            | AppError::Serialization(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Wire shape for all failed requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        // Log based on severity
        if self.is_server_error() {
            tracing::error!(
                error = %message,
                status = status.as_u16(),
                "Server error"
            );
        } else if self.is_client_error() {
            tracing::warn!(
                error = %message,
                status = status.as_u16(),
                "Client error"
            );
        }

        let body = ErrorResponse {
            success: false,
            error: message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}
