//! Document upload handler
//!
//! Accepts a multipart `file` field (PDF or TXT), extracts and cleans the
//! text, builds the summary and chunk/embedding index, and replaces the
//! session's document state.

use axum::extract::{Multipart, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use std::time::Instant;
use uuid::Uuid;

use crate::extract::SessionId;
use crate::AppState;
use docsage_common::errors::{AppError, Result};
use docsage_common::metrics;
use docsage_common::session::{DocumentChunk, DocumentState};
use docsage_ingestion::{chunk_text, extract_text, file_extension, ChunkingConfig, SUPPORTED_EXTENSIONS};

/// Response after a successful upload
#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub summary: String,
    pub filename: String,
    pub word_count: usize,
    pub session_id: String,
}

/// Handle document upload and return the generated summary
pub async fn upload(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let start = Instant::now();

    let (filename, data) = read_file_field(&mut multipart).await?;

    let extension = file_extension(&filename).unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::UnsupportedFileType { extension });
    }

    let limit = state.config.upload.max_bytes;
    if data.len() > limit {
        return Err(AppError::PayloadTooLarge {
            size: data.len(),
            limit,
        });
    }

    let text = extract_text(&filename, &data)?;
    let chars = text.chars().count();
    if chars < state.config.upload.min_text_chars {
        return Err(AppError::DocumentTooShort { chars });
    }

    let summary = state.summarizer.summarize(&text);

    let chunking = ChunkingConfig {
        chunk_size: state.config.engine.chunk_size,
        min_chunk_size: state.config.engine.min_chunk_size,
    };
    let chunks = chunk_text(&text, &chunking);
    let contents: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
    let embeddings = state.embedder.embed_batch(&contents).await?;

    let word_count = text.split_whitespace().count();
    let document = DocumentState {
        document_id: Uuid::new_v4(),
        filename: filename.clone(),
        word_count,
        text,
        summary: summary.clone(),
        chunks: chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| DocumentChunk {
                index: chunk.index,
                content: chunk.content,
                embedding,
            })
            .collect(),
        uploaded_at: Utc::now(),
    };
    let chunk_count = document.chunks.len();

    state
        .store
        .update(&session_id, |session| session.set_document(document))
        .await;

    metrics::record_ingestion(start.elapsed().as_secs_f64(), chunk_count);
    metrics::set_active_sessions(state.store.len().await);

    tracing::info!(
        session_id = %session_id,
        filename = %filename,
        word_count,
        chunk_count,
        latency_ms = start.elapsed().as_millis() as u64,
        "Document ingested"
    );

    Ok(Json(UploadResponse {
        success: true,
        summary,
        filename,
        word_count,
        session_id,
    }))
}

/// Pull the `file` field out of the multipart body.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>)> {
    while let Some(field) = multipart.next_field().await.map_err(|e| AppError::Validation {
        message: format!("Invalid upload request: {}", e),
        field: None,
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(sanitize_filename)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AppError::Validation {
                message: "No file selected".to_string(),
                field: Some("file".to_string()),
            })?;

        let data = field.bytes().await.map_err(|e| AppError::Validation {
            message: format!("Failed to read upload: {}", e),
            field: Some("file".to_string()),
        })?;

        return Ok((filename, data.to_vec()));
    }

    Err(AppError::Validation {
        message: "No file provided".to_string(),
        field: Some("file".to_string()),
    })
}

/// Strip any path components a client may have sent along
fn sanitize_filename(name: &str) -> String {
    name.rsplit(['/', '\\'])
        .next()
        .unwrap_or(name)
        .trim()
        .to_string()
}
