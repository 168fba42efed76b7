//! Wire framing for the chat SSE stream (spec.md §4.H):
//! `data: {"type": "text"|"tool_call"|"tool_output"|"error"|"end", "content": <json>}\n\n`

use axum::response::sse::Event;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Part {
    Text(String),
    ToolCall { name: String, arguments: Value },
    ToolOutput { name: String, output: Value },
    Error(String),
    End { session_id: Uuid },
}

impl Part {
    pub fn into_event(self) -> Event {
        Event::default().json_data(&self).unwrap_or_else(|_| Event::default().data("{}"))
    }
}
