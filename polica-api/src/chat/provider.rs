//! The streaming, tool-calling seam of the chat orchestrator (spec.md §4.H).
//! Kept as a trait so the orchestrator loop in `chat::mod` never talks to
//! `async-openai` directly, mirroring how `polica-normalizer::provider`
//! separates the LLM call from the pipeline that drives it.

use std::pin::Pin;

use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionTool, CreateChatCompletionRequestArgs,
    CreateChatCompletionStreamResponse,
};
use async_openai::error::OpenAIError;
use async_openai::Client;
use async_trait::async_trait;
use futures::Stream;

use crate::errors::{internal_error, AppError};
use polica_entities::InfraError;

/// Coarse retryable/non-retryable split for provider failures (spec.md
/// §4.H: "provider 429/5xx -> exponential backoff ... other errors
/// terminate"). `async-openai` doesn't always surface the HTTP status on
/// `ApiError`, so network-level and API-level failures are both treated as
/// transient; anything else (bad arguments, malformed stream) is terminal.
pub fn classify_provider_error(err: OpenAIError) -> AppError {
    match err {
        OpenAIError::Reqwest(e) => AppError::Infra(InfraError::UpstreamUnavailable(e.to_string())),
        OpenAIError::ApiError(e) => AppError::Infra(InfraError::UpstreamUnavailable(e.message)),
        other => internal_error(other),
    }
}

pub type ChatStream =
    Pin<Box<dyn Stream<Item = Result<CreateChatCompletionStreamResponse, AppError>> + Send>>;

#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn stream_turn(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
        tools: Vec<ChatCompletionTool>,
    ) -> Result<ChatStream, AppError>;
}

pub struct OpenAiChatProvider {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiChatProvider {
    pub fn new(model: String) -> Self {
        Self {
            client: Client::new(),
            model,
        }
    }
}

#[async_trait]
impl ChatProvider for OpenAiChatProvider {
    async fn stream_turn(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
        tools: Vec<ChatCompletionTool>,
    ) -> Result<ChatStream, AppError> {
        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&self.model).messages(messages).stream(true);
        if !tools.is_empty() {
            builder.tools(tools);
        }
        let request = builder.build().map_err(internal_error)?;

        let stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(classify_provider_error)?;
        let mapped = futures::StreamExt::map(stream, |chunk| chunk.map_err(classify_provider_error));
        Ok(Box::pin(mapped))
    }
}
