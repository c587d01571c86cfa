//! Session reset handler

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::extract::SessionId;
use crate::AppState;
use docsage_common::errors::Result;
use docsage_common::metrics;

/// Reset response
#[derive(Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub message: String,
}

/// Clear the session's document, history, and challenge state.
///
/// Resetting an unknown session is not an error; the outcome is the same.
pub async fn reset(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
) -> Result<Json<ResetResponse>> {
    let existed = state.store.reset(&session_id).await;
    metrics::set_active_sessions(state.store.len().await);

    tracing::info!(session_id = %session_id, existed, "Session reset");

    Ok(Json(ResetResponse {
        success: true,
        message: "Session reset successfully".to_string(),
    }))
}
