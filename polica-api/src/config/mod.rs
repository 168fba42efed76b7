pub mod settings;

use dotenvy::dotenv;
use tokio::sync::OnceCell;

use settings::{JwtConfig, LlmConfig, ServerConfig};

/// Process-wide configuration, loaded once from the environment (spec.md §6:
/// "DB DSN, LLM API key + text-model name, embedding-model name ... JWT
/// secret"). Mirrors the teacher's `OnceCell`-backed `config()` accessor so
/// every binary in the workspace reads env the same way.
#[derive(Debug)]
pub struct Config {
    server: ServerConfig,
    llm: LlmConfig,
    jwt: JwtConfig,
}

impl Config {
    pub fn server_host(&self) -> &str {
        &self.server.host
    }

    pub fn server_port(&self) -> u16 {
        self.server.port
    }

    pub fn llm(&self) -> &LlmConfig {
        &self.llm
    }

    pub fn jwt(&self) -> &JwtConfig {
        &self.jwt
    }
}

pub static CONFIG: OnceCell<Config> = OnceCell::const_new();

async fn init_config() -> Config {
    dotenv().ok();

    let server = envy::from_env::<ServerConfig>().unwrap_or_default();
    let llm = envy::from_env::<LlmConfig>().expect("missing LLM configuration in environment");
    let jwt = envy::from_env::<JwtConfig>().expect("missing JWT configuration in environment");

    Config { server, llm, jwt }
}

pub async fn config() -> &'static Config {
    CONFIG.get_or_init(init_config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_server_config() {
        let server_config = ServerConfig::default();
        assert_eq!(server_config.host, "0.0.0.0");
        assert_eq!(server_config.port, 3000);
    }
}
