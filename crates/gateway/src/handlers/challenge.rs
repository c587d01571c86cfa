//! Challenge generation handler

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::extract::SessionId;
use crate::AppState;
use docsage_common::errors::{AppError, Result};
use docsage_common::metrics;
use docsage_common::session::{Challenge, ChallengeQuestion};

/// Challenge response
#[derive(Serialize)]
pub struct ChallengeResponse {
    pub success: bool,
    pub questions: Vec<ChallengeQuestion>,
}

/// Generate comprehension questions from the session's document.
///
/// Regeneration replaces any previously active challenge set.
pub async fn challenge(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
) -> Result<Json<ChallengeResponse>> {
    let session = state
        .store
        .get(&session_id)
        .await
        .ok_or(AppError::DocumentMissing)?;
    let document = session.document().cloned().ok_or(AppError::DocumentMissing)?;

    let questions = state.challenger.generate(&document.text);

    state
        .store
        .update(&session_id, |session| {
            session.challenge = Some(Challenge::new(questions.clone()));
        })
        .await;

    metrics::record_challenge(questions.len());

    tracing::info!(
        session_id = %session_id,
        question_count = questions.len(),
        "Challenge generated"
    );

    Ok(Json(ChallengeResponse {
        success: true,
        questions,
    }))
}
