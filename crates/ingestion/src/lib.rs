//! DocSage ingestion
//!
//! Turns uploaded bytes into clean document text and retrieval-sized
//! chunks. PDF and TXT are the only supported formats.

pub mod chunker;
pub mod clean;
pub mod errors;
pub mod pdf;
pub mod txt;

pub use chunker::{chunk_text, ChunkingConfig, TextChunk};
pub use errors::IngestionError;

/// Extensions accepted by [`extract_text`]
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt"];

/// Extract clean text from an uploaded file.
///
/// Dispatches on the filename extension and applies [`clean::clean_text`]
/// to the raw extraction.
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String, IngestionError> {
    let extension = file_extension(filename).unwrap_or_default();

    let raw = match extension.as_str() {
        "pdf" => pdf::extract_text_from_pdf(bytes)?,
        "txt" => txt::decode_text(bytes)?,
        _ => return Err(IngestionError::UnsupportedFileType { extension }),
    };

    let cleaned = clean::clean_text(&raw);
    if cleaned.is_empty() {
        return Err(IngestionError::EmptyDocument);
    }

    tracing::debug!(
        filename = %filename,
        raw_len = raw.len(),
        cleaned_len = cleaned.len(),
        "Document text extracted"
    );

    Ok(cleaned)
}

/// Lowercased extension of a filename, if it has one
pub fn file_extension(filename: &str) -> Option<String> {
    let (stem, extension) = filename.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    Some(extension.to_ascii_lowercase())
}
