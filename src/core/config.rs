use std::env;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_GEMINI_API_HOST: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Startup configuration problems. Fatal before the server binds.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing env var GEMINI_API_KEY. Set it in the environment or in a .env file")]
    MissingApiKey,
    #[error("Invalid value for {name}: {value:?} (expected a positive integer)")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub gemini_api_key: String,
    pub gemini_api_hostname: String,
    pub gemini_model: String,
    pub logo_path: String,
    pub request_timeout: Duration,
    pub context_max_messages: usize,
}

impl AppConfig {
    /// Build the config from the process environment. A `.env` file is
    /// loaded by the CLI before this runs.
    pub fn from_env() -> Result<Self, ConfigError> {
        let gemini_api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let gemini_api_hostname = env::var("SUPPORT_GEMINI_API_HOST")
            .unwrap_or_else(|_| DEFAULT_GEMINI_API_HOST.to_string());
        let gemini_model =
            env::var("SUPPORT_GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
        let logo_path = env::var("SUPPORT_LOGO_PATH").unwrap_or_else(|_| "./logo.jpeg".to_string());
        let timeout_secs = positive_int_var("SUPPORT_REQUEST_TIMEOUT_SECS", 30)?;
        let context_max_messages = positive_int_var("SUPPORT_CONTEXT_MAX_MESSAGES", 20)?;

        Ok(Self {
            gemini_api_key,
            gemini_api_hostname,
            gemini_model,
            logo_path,
            request_timeout: Duration::from_secs(timeout_secs as u64),
            context_max_messages,
        })
    }
}

fn positive_int_var(name: &'static str, default: usize) -> Result<usize, ConfigError> {
    match env::var(name) {
        Ok(value) => match value.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::InvalidNumber { name, value }),
        },
        Err(_) => Ok(default),
    }
}
