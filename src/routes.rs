//! HTTP endpoints: health check, GroupMe callback and direct generation.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::error::PipelineError;
use crate::pipeline::{InboundMessage, MessageProcessor, Outcome};

/// Text served on `GET /`.
pub const HEALTH_TEXT: &str = "This is the Bingo Bot, how may I help you?";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<MessageProcessor>,
}

/// Build the Axum router.
pub fn bot_routes(processor: Arc<MessageProcessor>) -> Router {
    let state = AppState { processor };

    Router::new()
        .route("/", get(health).post(groupme_callback))
        .route("/generate", get(generate))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    HEALTH_TEXT
}

async fn groupme_callback(
    State(state): State<AppState>,
    Json(message): Json<InboundMessage>,
) -> Response {
    info!(
        text = %message.text,
        sender = %message.sender_id,
        created_at = ?message.created_at,
        "Received GroupMe callback"
    );
    respond(state.processor.process(&message).await)
}

async fn generate(State(state): State<AppState>) -> Response {
    info!("Direct card generation requested");
    respond(state.processor.send_card().await)
}

/// Plain-text response for a handled request.
fn respond(result: Result<Outcome, PipelineError>) -> Response {
    match result {
        Ok(outcome) => outcome.message().into_response(),
        Err(e) => {
            let status = if e.is_upstream() {
                StatusCode::BAD_GATEWAY
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string()).into_response()
        }
    }
}
