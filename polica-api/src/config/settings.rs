use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// LLM provider settings (spec.md §4.F, §4.H): one chat-completion model for
/// normalization/tool-calling, one embedding model for golden-product vectors.
#[derive(Debug, Deserialize)]
pub struct LlmConfig {
    pub openai_api_key: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

/// JWT bearer-auth settings (spec.md §4.I, §7). `service_api_key` is the
/// long-lived bearer accepted on the crawler/importer status endpoints
/// (spec.md §6: "a long-lived API-key bearer is also accepted on
/// service-to-service endpoints"), set by the operator alongside the
/// crawler/importer deployments.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub jwt_secret: String,
    #[serde(default = "default_jwt_ttl_seconds")]
    pub jwt_ttl_seconds: i64,
    pub service_api_key: String,
}

fn default_jwt_ttl_seconds() -> i64 {
    60 * 60 * 24 * 7
}
