//! The AI chat orchestrator (spec.md §4.H): one state machine per HTTP
//! request, driving `WaitingModel -> (EmittingText | RequestingTools) ->
//! ExecutingTools -> WaitingModel | Done | Failed` and streaming each
//! step out over `tx` as an SSE [`sse::Part`].

pub mod provider;
pub mod sse;
pub mod tools;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionToolType, FinishReason, FunctionCall,
};
use futures::StreamExt;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use polica_entities::{ChatMessage, NewChatMessage, Sender};

use crate::chat::provider::ChatProvider;
use crate::chat::sse::Part;
use crate::constants::MAX_CHAT_TOOL_ROUNDS;
use crate::infra::repositories::chat as chat_repo;
use crate::state::AppState;

const MAX_PROVIDER_RETRIES: u32 = 3;
const MAX_BACKOFF_SECONDS: u64 = 60;
const HISTORY_DEPTH: i64 = 20;

fn system_prompt(display_name: Option<&str>) -> String {
    let greeting = display_name
        .map(|name| format!(" Korisnika oslovljavaj s {name} kad je to prirodno."))
        .unwrap_or_default();
    format!(
        "Ti si asistent za kupovinu u hrvatskim trgovinama. Pomažeš korisnicima pronaći \
         proizvode, usporediti cijene po jedinici mjere i pronaći najbliže trgovine. Odgovaraj \
         na hrvatskom jeziku, kratko i korisno. Kad je potrebno, koristi dostupne alate umjesto \
         nagađanja o cijenama ili lokacijama.{greeting}"
    )
}

#[derive(Default, Clone)]
struct PendingToolCall {
    id: String,
    name: String,
    arguments: String,
}

fn history_to_messages(history: Vec<ChatMessage>) -> Vec<ChatCompletionRequestMessage> {
    history
        .into_iter()
        .filter_map(|msg| match msg.sender() {
            Sender::User => msg.content.map(|content| {
                ChatCompletionRequestUserMessageArgs::default()
                    .content(content)
                    .build()
                    .expect("user message always builds")
                    .into()
            }),
            Sender::Ai => msg.ai_response.map(|content| {
                ChatCompletionRequestAssistantMessageArgs::default()
                    .content(content)
                    .build()
                    .expect("assistant message always builds")
                    .into()
            }),
            // Tool mechanics are not replayed across turns: the surrounding
            // user/assistant text already carries the outcome.
            Sender::ToolCall | Sender::ToolOutput => None,
        })
        .collect()
}

/// Drives one chat turn end-to-end and streams every step to `tx`. Never
/// returns an `Err`: all failure paths emit a [`Part::Error`] (and usually a
/// trailing [`Part::End`]) instead, since the HTTP response is already
/// committed to `text/event-stream` by the time this runs.
pub async fn run(
    state: AppState,
    provider: Arc<dyn ChatProvider>,
    user_id: Uuid,
    session_id: Option<Uuid>,
    display_name: Option<String>,
    message_text: String,
    tx: UnboundedSender<Part>,
) {
    let session_id = session_id.unwrap_or_else(Uuid::new_v4);

    let history = match chat_repo::history_for_session(&state.pool, user_id, session_id).await {
        Ok(mut rows) => {
            if rows.len() as i64 > HISTORY_DEPTH {
                rows = rows.split_off(rows.len() - HISTORY_DEPTH as usize);
            }
            rows
        }
        Err(e) => {
            fail(&tx, session_id, e.to_string());
            return;
        }
    };

    if let Err(e) = chat_repo::append(
        &state.pool,
        NewChatMessage {
            user_id,
            session_id,
            sender: "user".to_string(),
            content: Some(message_text.clone()),
            tool_calls: None,
            tool_outputs: None,
            ai_response: None,
        },
    )
    .await
    {
        fail(&tx, session_id, e.to_string());
        return;
    }

    let mut messages: Vec<ChatCompletionRequestMessage> = vec![ChatCompletionRequestSystemMessageArgs::default()
        .content(system_prompt(display_name.as_deref()))
        .build()
        .expect("system message always builds")
        .into()];
    messages.extend(history_to_messages(history));
    messages.push(
        ChatCompletionRequestUserMessageArgs::default()
            .content(message_text)
            .build()
            .expect("user message always builds")
            .into(),
    );

    let tool_defs = tools::definitions();

    for _round in 0..MAX_CHAT_TOOL_ROUNDS {
        let stream = match open_stream_with_backoff(provider.as_ref(), messages.clone(), tool_defs.clone()).await {
            Ok(stream) => stream,
            Err(e) => {
                fail(&tx, session_id, e.message());
                return;
            }
        };

        let (text, tool_calls, finish_reason) = match consume_stream(stream, &tx).await {
            Ok(outcome) => outcome,
            Err(e) => {
                fail(&tx, session_id, e.message());
                return;
            }
        };

        let has_tool_calls = !tool_calls.is_empty() && matches!(finish_reason, Some(FinishReason::ToolCalls));
        if !has_tool_calls {
            finalize(&state, user_id, session_id, text, &tx).await;
            return;
        }

        messages.push(assistant_tool_call_message(&tool_calls));

        for call in &tool_calls {
            let arguments_value: Value =
                serde_json::from_str(&call.arguments).unwrap_or_else(|_| Value::String(call.arguments.clone()));
            let _ = tx.send(Part::ToolCall {
                name: call.name.clone(),
                arguments: arguments_value,
            });

            if let Err(e) = chat_repo::append(
                &state.pool,
                NewChatMessage {
                    user_id,
                    session_id,
                    sender: "tool_call".to_string(),
                    content: None,
                    tool_calls: Some(serde_json::json!([{
                        "id": call.id,
                        "name": call.name,
                        "arguments": call.arguments,
                    }])),
                    tool_outputs: None,
                    ai_response: None,
                },
            )
            .await
            {
                fail(&tx, session_id, e.to_string());
                return;
            }

            let output = match tools::dispatch(&state, user_id, &call.name, &call.arguments).await {
                None => {
                    fail(&tx, session_id, format!("unknown tool: {}", call.name));
                    return;
                }
                Some(Err(e)) => {
                    fail(&tx, session_id, e.message());
                    return;
                }
                Some(Ok(value)) => value,
            };

            if let Err(e) = chat_repo::append(
                &state.pool,
                NewChatMessage {
                    user_id,
                    session_id,
                    sender: "tool_output".to_string(),
                    content: None,
                    tool_calls: None,
                    tool_outputs: Some(output.clone()),
                    ai_response: None,
                },
            )
            .await
            {
                fail(&tx, session_id, e.to_string());
                return;
            }

            let _ = tx.send(Part::ToolOutput {
                name: call.name.clone(),
                output: output.clone(),
            });

            messages.push(
                ChatCompletionRequestToolMessageArgs::default()
                    .tool_call_id(call.id.clone())
                    .content(output.to_string())
                    .build()
                    .expect("tool message always builds")
                    .into(),
            );
        }
    }

    // Tool-call budget exhausted (spec.md §4.H step 6): finalize with
    // whatever text the model has produced so far, if any.
    finalize(&state, user_id, session_id, String::new(), &tx).await;
}

/// Emits an `error` part followed by the mandatory trailing `end` (spec.md
/// §7: "chat always ends with `end`"), even on a failure path.
fn fail(tx: &UnboundedSender<Part>, session_id: Uuid, message: String) {
    let _ = tx.send(Part::Error(message));
    let _ = tx.send(Part::End { session_id });
}

async fn finalize(
    state: &AppState,
    user_id: Uuid,
    session_id: Uuid,
    text: String,
    tx: &UnboundedSender<Part>,
) {
    let ai_response = if text.is_empty() { None } else { Some(text) };
    let _ = chat_repo::append(
        &state.pool,
        NewChatMessage {
            user_id,
            session_id,
            sender: "ai".to_string(),
            content: None,
            tool_calls: None,
            tool_outputs: None,
            ai_response,
        },
    )
    .await;
    let _ = tx.send(Part::End { session_id });
}

fn assistant_tool_call_message(calls: &[PendingToolCall]) -> ChatCompletionRequestMessage {
    let tool_calls: Vec<ChatCompletionMessageToolCall> = calls
        .iter()
        .map(|c| ChatCompletionMessageToolCall {
            id: c.id.clone(),
            r#type: ChatCompletionToolType::Function,
            function: FunctionCall {
                name: c.name.clone(),
                arguments: c.arguments.clone(),
            },
        })
        .collect();
    ChatCompletionRequestAssistantMessageArgs::default()
        .tool_calls(tool_calls)
        .build()
        .expect("assistant tool-call message always builds")
        .into()
}

async fn open_stream_with_backoff(
    provider: &dyn ChatProvider,
    messages: Vec<ChatCompletionRequestMessage>,
    tools: Vec<async_openai::types::ChatCompletionTool>,
) -> Result<provider::ChatStream, crate::errors::AppError> {
    let mut attempt: u32 = 0;
    loop {
        match provider.stream_turn(messages.clone(), tools.clone()).await {
            Ok(stream) => return Ok(stream),
            Err(e) if e.is_retryable() && attempt < MAX_PROVIDER_RETRIES => {
                let backoff = Duration::from_secs(2u64.saturating_pow(attempt).min(MAX_BACKOFF_SECONDS));
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Drains one streamed completion, forwarding text deltas as they arrive and
/// accumulating any tool-call fragments, which OpenAI-compatible APIs emit
/// piecemeal keyed by tool-call index.
async fn consume_stream(
    mut stream: provider::ChatStream,
    tx: &UnboundedSender<Part>,
) -> Result<(String, Vec<PendingToolCall>, Option<FinishReason>), crate::errors::AppError> {
    let mut text = String::new();
    let mut pending: BTreeMap<u32, PendingToolCall> = BTreeMap::new();
    let mut finish_reason = None;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let Some(choice) = chunk.choices.into_iter().next() else {
            continue;
        };

        if let Some(content) = choice.delta.content {
            if !content.is_empty() {
                text.push_str(&content);
                let _ = tx.send(Part::Text(content));
            }
        }

        if let Some(deltas) = choice.delta.tool_calls {
            for delta in deltas {
                let entry = pending.entry(delta.index).or_default();
                if let Some(id) = delta.id {
                    entry.id = id;
                }
                if let Some(function) = delta.function {
                    if let Some(name) = function.name {
                        entry.name.push_str(&name);
                    }
                    if let Some(arguments) = function.arguments {
                        entry.arguments.push_str(&arguments);
                    }
                }
            }
        }

        if choice.finish_reason.is_some() {
            finish_reason = choice.finish_reason;
        }
    }

    Ok((text, pending.into_values().collect(), finish_reason))
}
