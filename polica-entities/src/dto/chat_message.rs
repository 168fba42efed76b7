use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as Json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::chat_message::ChatMessage;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatMessageDto {
    pub id: Uuid,
    pub session_id: Uuid,
    pub sender: String,
    pub content: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub tool_calls: Option<Json>,
    #[schema(value_type = Option<Object>)]
    pub tool_outputs: Option<Json>,
    pub ai_response: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<ChatMessage> for ChatMessageDto {
    fn from(m: ChatMessage) -> Self {
        Self {
            id: m.id,
            session_id: m.session_id,
            sender: m.sender,
            content: m.content,
            tool_calls: m.tool_calls,
            tool_outputs: m.tool_outputs,
            ai_response: m.ai_response,
            timestamp: m.timestamp,
        }
    }
}
