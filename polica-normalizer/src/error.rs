use polica_entities::InfraError;

/// Failures scoped to a single EAN or golden product. Every call site that
/// produces one logs it and moves to the next item rather than aborting the
/// batch (spec.md §4.F step 7): a bad LLM response for one product must
/// never stall the rest of the range.
#[derive(Debug, thiserror::Error)]
pub enum NormalizerError {
    #[error("db error: {0}")]
    Db(#[from] InfraError),
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("LLM returned an invalid canonical record: {0}")]
    InvalidCanonicalRecord(String),
}

impl From<diesel::result::Error> for NormalizerError {
    fn from(e: diesel::result::Error) -> Self {
        Self::Db(e.into())
    }
}

/// Failures talking to the LLM chat-completion or embedding endpoints.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("chat completion request failed: {0}")]
    ChatCompletion(#[from] async_openai::error::OpenAIError),
    #[error("chat completion returned no content")]
    EmptyCompletion,
    #[error("failed to parse chat completion JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
    #[error("embedding response had unexpected dimensionality: expected {expected}, got {actual}")]
    WrongEmbeddingDimension { expected: usize, actual: usize },
}
