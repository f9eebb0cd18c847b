use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use policy_domain::{AnswerSource, ChatMessage, Role};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tracing::{error, info};

const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Shared state of the chat service.
pub struct ChatService {
    source: Arc<dyn AnswerSource>,
    model: String,
}

impl ChatService {
    pub fn new(source: Arc<dyn AnswerSource>, model: impl Into<String>) -> Self {
        Self { source, model: model.into() }
    }

    pub fn router(self) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/chat", post(chat))
            .with_state(Arc::new(self))
    }

    /// Serves until the listener fails.
    pub async fn serve(self, listener: TcpListener) -> anyhow::Result<()> {
        info!(addr = %listener.local_addr()?, model = %self.model, "Chat service listening");
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: String,
    #[serde(default)]
    history: Vec<HistoryEntry>,
}

#[derive(Debug, Deserialize)]
struct HistoryEntry {
    role: String,
    content: String,
}

impl From<HistoryEntry> for ChatMessage {
    fn from(entry: HistoryEntry) -> Self {
        ChatMessage { role: Role::from_client(&entry.role), content: entry.content }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ChatReply {
    Answer { response: String },
    Failure { error: String },
}

impl ChatReply {
    fn failure(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Self>) {
        (status, Json(ChatReply::Failure { error: message.into() }))
    }
}

async fn health(State(service): State<Arc<ChatService>>) -> Json<Value> {
    Json(json!({"status": "healthy", "model": service.model}))
}

async fn chat(
    State(service): State<Arc<ChatService>>,
    request: Result<Json<ChatRequest>, JsonRejection>,
) -> (StatusCode, Json<ChatReply>) {
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => {
            error!(error = %rejection, "Chat error");
            return ChatReply::failure(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE);
        }
    };

    let message = request.message.trim();
    if message.is_empty() {
        return ChatReply::failure(StatusCode::BAD_REQUEST, "Empty message");
    }

    let history: Vec<ChatMessage> = request.history.into_iter().map(Into::into).collect();

    match service.source.answer(message, &history).await {
        Ok(response) => {
            let preview: String = message.chars().take(80).collect();
            info!(question = %preview, chars = response.chars().count(), "Answered");
            (StatusCode::OK, Json(ChatReply::Answer { response }))
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "Chat error");
            ChatReply::failure(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE)
        }
    }
}
