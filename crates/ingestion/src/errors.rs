//! Ingestion error types

use docsage_common::errors::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("PDF parse error: {message}")]
    PdfParse { message: String },

    #[error("Text decoding error: {message}")]
    Encoding { message: String },

    #[error("Unsupported file type: {extension}")]
    UnsupportedFileType { extension: String },

    #[error("Document contains no extractable text")]
    EmptyDocument,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<IngestionError> for AppError {
    fn from(e: IngestionError) -> Self {
        match e {
            IngestionError::UnsupportedFileType { extension } => {
                AppError::UnsupportedFileType { extension }
            }
            IngestionError::EmptyDocument => AppError::DocumentTooShort { chars: 0 },
            other => AppError::Parse {
                message: other.to_string(),
            },
        }
    }
}
