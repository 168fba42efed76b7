use deadpool_diesel::postgres::Pool;
use uuid::Uuid;

use polica_entities::{adapt_infra_error, ChatMessage, InfraError, NewChatMessage};

/// Persists one turn of the chat orchestrator loop (spec.md §4.H): a user
/// message, a tool call, a tool output, or the model's final reply are each
/// their own row.
pub async fn append(pool: &Pool, new: NewChatMessage) -> Result<ChatMessage, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| ChatMessage::append(conn, new))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}

pub async fn history_for_session(
    pool: &Pool,
    user_id: Uuid,
    session_id: Uuid,
) -> Result<Vec<ChatMessage>, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| ChatMessage::history_for_session(conn, user_id, session_id))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}

pub async fn list_sessions_for_user(pool: &Pool, user_id: Uuid) -> Result<Vec<Uuid>, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| ChatMessage::list_sessions_for_user(conn, user_id))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}
