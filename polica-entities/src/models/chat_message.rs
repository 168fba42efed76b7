use chrono::{DateTime, Utc};
use diesel::{
    ExpressionMethods, Insertable, PgConnection, QueryDsl, Queryable, RunQueryDsl, Selectable,
    SelectableHelper,
};
use serde::Serialize;
use serde_json::Value as Json;
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::models::DieselResult;
use crate::schema::chat_messages;

/// Who produced a `ChatMessage` row (spec.md §4.H's orchestration loop:
/// a turn may leave behind a user message, a tool call, its tool output,
/// and the model's final reply, each as a separate row ordered by `timestamp`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Sender {
    User,
    Ai,
    ToolCall,
    ToolOutput,
}

/// One row in a chat session's transcript (spec.md §3).
#[derive(Debug, Clone, Serialize, Queryable, Selectable)]
#[diesel(table_name = chat_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChatMessage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub sender: String,
    pub content: Option<String>,
    pub tool_calls: Option<Json>,
    pub tool_outputs: Option<Json>,
    pub ai_response: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn sender(&self) -> Sender {
        self.sender.parse().unwrap_or(Sender::User)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chat_messages)]
pub struct NewChatMessage {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub sender: String,
    pub content: Option<String>,
    pub tool_calls: Option<Json>,
    pub tool_outputs: Option<Json>,
    pub ai_response: Option<String>,
}

impl ChatMessage {
    pub fn append(conn: &mut PgConnection, new: NewChatMessage) -> DieselResult<ChatMessage> {
        diesel::insert_into(chat_messages::table)
            .values(new)
            .returning(ChatMessage::as_returning())
            .get_result(conn)
    }

    /// Full transcript for one session, ordered oldest-first — the shape the
    /// chat orchestrator replays into the LLM's message history on each turn
    /// (spec.md §4.H). A session belongs to exactly one user; `user_id` is
    /// still filtered on to keep a forged `session_id` from reading another
    /// user's history.
    pub fn history_for_session(
        conn: &mut PgConnection,
        user_id: Uuid,
        session_id: Uuid,
    ) -> DieselResult<Vec<ChatMessage>> {
        chat_messages::table
            .filter(chat_messages::user_id.eq(user_id))
            .filter(chat_messages::session_id.eq(session_id))
            .order(chat_messages::timestamp.asc())
            .select(ChatMessage::as_select())
            .load(conn)
    }

    pub fn list_sessions_for_user(conn: &mut PgConnection, user_id: Uuid) -> DieselResult<Vec<Uuid>> {
        chat_messages::table
            .filter(chat_messages::user_id.eq(user_id))
            .select(chat_messages::session_id)
            .distinct()
            .load(conn)
    }
}
