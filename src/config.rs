use std::env;
use std::sync::OnceLock;
use thiserror::Error;

const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_SUMMARY_MODEL: &str = "llama3.2";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the student registry server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server binds on all interfaces.
    pub server_port: u16,
    /// Base URL of the Ollama runtime used for summaries.
    pub ollama_url: String,
    /// Model identifier sent with every generation request.
    pub summary_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_SERVER_PORT,
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            summary_model: DEFAULT_SUMMARY_MODEL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults for unset keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?
                .unwrap_or(defaults.server_port),
            ollama_url: load_env_optional("OLLAMA_URL").unwrap_or(defaults.ollama_url),
            summary_model: load_env_optional("SUMMARY_MODEL").unwrap_or(defaults.summary_model),
        })
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load configuration from the environment (and `.env`) and install it in the global cache.
///
/// Subsequent calls return the configuration installed by the first one.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    log_loaded_config(&config);
    Ok(CONFIG.get_or_init(|| config))
}

fn log_loaded_config(config: &Config) {
    tracing::debug!(
        server_port = config.server_port,
        ollama_url = %config.ollama_url,
        summary_model = %config.summary_model,
        "Loaded configuration"
    );
}
