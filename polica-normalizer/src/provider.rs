//! The two model-backed seams of the golden-record pipeline (spec.md §4.F):
//! synthesizing a canonical record from an EAN's chain-reported variants, and
//! embedding its `text_for_embedding` for later hybrid search. Both are
//! traits so tests can swap in a fixture provider instead of calling out to
//! a real model (spec.md §9's "normalization is pluggable" design note).

use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs, CreateEmbeddingRequestArgs, EmbeddingInput, ResponseFormat,
};
use async_openai::Client;
use async_trait::async_trait;
use serde::Deserialize;

use crate::aggregate::ProductAggregate;
use crate::error::ProviderError;

/// The embedding dimensionality golden records are stored with (spec.md §3:
/// `g_products.embedding` is a 768-dim vector kept opaque in `jsonb`).
pub const EMBEDDING_DIMENSIONS: usize = 768;

/// What an LLM call is expected to produce for one EAN's aggregate. Field
/// names mirror `g_products` columns 1:1 so deserialization doubles as
/// response validation.
#[derive(Debug, Clone, Deserialize)]
pub struct CanonicalDraft {
    pub canonical_name: String,
    pub brand: Option<String>,
    pub category: String,
    pub base_unit_type: String,
    pub variants: Vec<polica_common::Variant>,
    pub text_for_embedding: String,
    pub keywords: Vec<String>,
    pub is_generic_product: bool,
    pub seasonal_start_month: Option<i16>,
    pub seasonal_end_month: Option<i16>,
}

#[async_trait]
pub trait NormalizerProvider: Send + Sync {
    async fn synthesize(&self, aggregate: &ProductAggregate) -> Result<CanonicalDraft, ProviderError>;
}

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;
}

/// `NormalizerProvider`/`EmbeddingProvider` backed by an OpenAI-compatible
/// chat-completions and embeddings API, configured from the standard
/// `OPENAI_API_KEY`/`OPENAI_API_BASE` environment variables.
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    chat_model: String,
    embedding_model: String,
}

impl OpenAiProvider {
    pub fn new(chat_model: String, embedding_model: String) -> Self {
        Self {
            client: Client::new(),
            chat_model,
            embedding_model,
        }
    }
}

const SYSTEM_PROMPT: &str = "You normalize Croatian grocery product listings from multiple retail \
chains into a single canonical record. Respond with a single JSON object only, matching exactly \
the fields: canonical_name (string), brand (string or null), category (string), base_unit_type \
(one of \"WEIGHT\", \"VOLUME\", \"COUNT\"), variants (array of {unit, value, piece_count}), \
text_for_embedding (string, a natural-language description suitable for semantic search), \
keywords (array of exactly 8 lowercase strings), is_generic_product (bool, true for unbranded \
staples like loose fruit or bread rolls), seasonal_start_month and seasonal_end_month (integers \
1-12 or null, set only for genuinely seasonal produce).";

#[async_trait]
impl NormalizerProvider for OpenAiProvider {
    async fn synthesize(&self, aggregate: &ProductAggregate) -> Result<CanonicalDraft, ProviderError> {
        let user_prompt = serde_json::json!({
            "ean": aggregate.ean,
            "name_variations": aggregate.name_variations,
            "brands": aggregate.brands,
            "categories": aggregate.categories,
            "units": aggregate.units,
            "quantities": aggregate.quantities,
        })
        .to_string();

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.chat_model)
            .response_format(ResponseFormat::JsonObject)
            .messages(vec![
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_prompt)
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ProviderError::EmptyCompletion)?;

        let draft: CanonicalDraft = serde_json::from_str(&content)?;
        Ok(draft)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.embedding_model)
            .input(EmbeddingInput::String(text.to_string()))
            .build()?;

        let response = self.client.embeddings().create(request).await?;
        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .unwrap_or_default();

        if embedding.len() != EMBEDDING_DIMENSIONS {
            return Err(ProviderError::WrongEmbeddingDimension {
                expected: EMBEDDING_DIMENSIONS,
                actual: embedding.len(),
            });
        }
        Ok(embedding)
    }
}

#[cfg(test)]
pub mod fixtures {
    //! A scripted `NormalizerProvider`/`EmbeddingProvider` pair for unit
    //! tests that exercise `worker.rs` without a network call.
    use super::*;
    use std::sync::Mutex;

    pub struct FixtureProvider {
        pub draft: Mutex<Option<CanonicalDraft>>,
    }

    #[async_trait]
    impl NormalizerProvider for FixtureProvider {
        async fn synthesize(&self, _aggregate: &ProductAggregate) -> Result<CanonicalDraft, ProviderError> {
            self.draft
                .lock()
                .unwrap()
                .take()
                .ok_or(ProviderError::EmptyCompletion)
        }
    }

    #[async_trait]
    impl EmbeddingProvider for FixtureProvider {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, ProviderError> {
            Ok(vec![0.0; EMBEDDING_DIMENSIONS])
        }
    }
}
