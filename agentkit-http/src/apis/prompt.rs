use agentkit_core::Prompt;
use axum::{
    extract::State,
    response::{IntoResponse, Response, Sse},
};
use tracing::{debug, error, info};
use uuid::Uuid;

use super::types::PromptRequest;
use crate::error::{PROMPT_FAILED, PROMPT_REQUIRED};
use crate::streaming::{ChunkFormatter, StreamRelay};
use crate::{ApiJson, ErrorResponse, ServerState};

/// POST /api/prompt - run a prompt and stream the agent's progress as SSE
pub async fn handle_prompt(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<PromptRequest>,
) -> Result<Response, ErrorResponse> {
    let request_id = Uuid::new_v4().to_string();

    let prompt = payload
        .prompt
        .and_then(Prompt::new)
        .ok_or_else(|| ErrorResponse::invalid_request(PROMPT_REQUIRED))?;

    info!("[{}] POST /api/prompt ({} bytes)", request_id, prompt.len());
    debug!("[{}] Received prompt: {}", request_id, prompt.as_str());

    let run = state.session.submit(prompt).await.map_err(|e| {
        error!("[{}] Error processing prompt: {}", request_id, e);
        ErrorResponse::internal_error(PROMPT_FAILED)
    })?;
    debug!("[{}] Stream initialized", request_id);

    let mut relay = StreamRelay::new(run, ChunkFormatter, request_id.clone());
    relay.prime().await.map_err(|e| {
        error!("[{}] Error processing prompt: {}", request_id, e);
        ErrorResponse::internal_error(PROMPT_FAILED)
    })?;

    Ok(Sse::new(relay.into_sse_stream()).into_response())
}
