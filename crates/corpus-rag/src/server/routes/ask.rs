//! Ask endpoint: conversational question answering

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{AskRequest, AskResponse};

/// POST /ask - answer a question against the indexed corpus
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let start = Instant::now();
    let question = request.question()?.to_string();

    tracing::info!("Question: \"{}\"", question);

    // The session lock is held across the whole answer, so turns within a
    // session never interleave.
    let (session_id, session) = state.sessions().resolve(request.session_id);
    let mut history = session.lock().await;

    let answer = state.engine().answer(&mut history, &question).await?;

    tracing::info!(
        "Answered in {}ms (session {}, {} turns)",
        start.elapsed().as_millis(),
        session_id,
        history.len()
    );

    Ok(Json(AskResponse { answer, session_id }))
}
