//! Axum route handler for the chat endpoint.

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::advice::dispatcher::{AdviceResponse, ChatInput, ChatRequest};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /chat
///
/// Body: `{message?: string, skills?: {name: number}}`.
/// A skills assessment yields a career recommendation; otherwise the message
/// is answered from the keyword table.
pub async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<AdviceResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let input = ChatInput::from_request(request)?;
    let response = state.dispatcher.dispatch(input)?;

    Ok(Json(response))
}
