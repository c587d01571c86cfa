//! Challenge answer evaluation handler

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::extract::SessionId;
use crate::AppState;
use docsage_common::errors::{AppError, Result};
use docsage_common::metrics;
use docsage_engine::Evaluation;

/// Evaluate request
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub question_index: Option<usize>,
    pub answer: Option<String>,
}

/// Evaluate response
#[derive(Serialize)]
pub struct EvaluateResponse {
    pub success: bool,
    pub evaluation: Evaluation,
}

/// Score a free-text answer to an active challenge question
pub async fn evaluate(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>> {
    let answer = request.answer.filter(|a| !a.trim().is_empty());
    let (Some(index), Some(answer)) = (request.question_index, answer) else {
        return Err(AppError::Validation {
            message: "Question index and answer are required".to_string(),
            field: None,
        });
    };

    let session = state
        .store
        .get(&session_id)
        .await
        .ok_or(AppError::ChallengeMissing)?;
    let document = session
        .document()
        .cloned()
        .ok_or(AppError::ChallengeMissing)?;
    let challenge = session.challenge.ok_or(AppError::ChallengeMissing)?;

    let question = challenge
        .questions
        .get(index)
        .ok_or(AppError::QuestionIndexOutOfRange {
            index,
            count: challenge.questions.len(),
        })?;

    let evaluation = state
        .evaluator
        .evaluate(question, &answer, &document.text)
        .await?;

    metrics::record_evaluation(evaluation.score);

    tracing::info!(
        session_id = %session_id,
        question_index = index,
        score = evaluation.score,
        grade = %evaluation.grade,
        "Answer evaluated"
    );

    Ok(Json(EvaluateResponse {
        success: true,
        evaluation,
    }))
}
