//! `POST /v2/chat_v2` (spec.md §4.H, §6): streams the chat orchestrator's
//! steps back to the client as `text/event-stream`.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use tokio_stream::wrappers::UnboundedReceiverStream;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::chat::provider::OpenAiChatProvider;
use crate::chat::{self};
use crate::config::config;
use crate::errors::AppError;
use crate::infra::repositories::user;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub session_id: Option<Uuid>,
    pub message_text: String,
}

#[utoipa::path(
    post,
    path = "/v2/chat_v2",
    request_body = ChatRequest,
    responses((status = 200, description = "Server-sent chat events", content_type = "text/event-stream"))
)]
pub async fn chat_v2(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let display_name = user::get(&state.pool, auth.user_id).await.ok().and_then(|u| u.display_name);

    let llm = config().await.llm();
    let provider: Arc<dyn chat::provider::ChatProvider> =
        Arc::new(OpenAiChatProvider::new(llm.chat_model.clone()));

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    tokio::spawn(chat::run(
        state,
        provider,
        auth.user_id,
        body.session_id,
        display_name,
        body.message_text,
        tx,
    ));

    let stream = UnboundedReceiverStream::new(rx).map(|part| Ok(part.into_event()));
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
