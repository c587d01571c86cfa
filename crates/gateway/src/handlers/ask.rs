//! Question answering handler

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use validator::Validate;

use crate::extract::SessionId;
use crate::AppState;
use docsage_common::errors::{AppError, Result};
use docsage_common::metrics;
use docsage_common::session::ConversationTurn;

/// Ask request
#[derive(Debug, Deserialize, Validate)]
pub struct AskRequest {
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub question: String,
}

/// Ask response
#[derive(Serialize)]
pub struct AskResponse {
    pub success: bool,
    pub answer: String,
    pub references: Vec<String>,
    pub source_sentences: Vec<String>,
}

/// Answer a question from the session's document
pub async fn ask(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let start = Instant::now();

    let question = request.question.trim().to_string();
    if question.is_empty() {
        return Err(AppError::Validation {
            message: "No question provided".to_string(),
            field: Some("question".to_string()),
        });
    }
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: Some("question".to_string()),
    })?;

    let session = state
        .store
        .get(&session_id)
        .await
        .ok_or(AppError::DocumentMissing)?;
    let document = session.document().cloned().ok_or(AppError::DocumentMissing)?;

    let answer = state.qa.answer(&question, &document).await?;

    state
        .store
        .update(&session_id, |session| {
            session.history.push(ConversationTurn::question(question.as_str()));
            session.history.push(ConversationTurn::answer(
                answer.answer.as_str(),
                answer.references.clone(),
                answer.source_sentences.clone(),
            ));
        })
        .await;

    metrics::record_question(start.elapsed().as_secs_f64(), answer.is_grounded());

    tracing::info!(
        session_id = %session_id,
        grounded = answer.is_grounded(),
        references = answer.references.len(),
        latency_ms = start.elapsed().as_millis() as u64,
        "Question answered"
    );

    Ok(Json(AskResponse {
        success: true,
        answer: answer.answer,
        references: answer.references,
        source_sentences: answer.source_sentences,
    }))
}
