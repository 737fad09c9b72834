use anyhow::{Context, Result};
use std::env;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_RELAY_URL: &str = "http://localhost:3001";

/// Settings for the relay server and its upstream client.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub host: String,
    pub port: u16,
}

impl RelayConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .context("GEMINI_API_KEY is not set")?;

        let mut config = Self::new(api_key);
        if let Ok(model) = env::var("GEMINI_MODEL") {
            config.model = model;
        }
        if let Ok(api_base) = env::var("GEMINI_API_BASE") {
            config.api_base = api_base;
        }
        if let Ok(host) = env::var("RELAY_HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("RELAY_PORT") {
            config.port = port
                .parse()
                .with_context(|| format!("RELAY_PORT is not a valid port: {}", port))?;
        }
        Ok(config)
    }

    /// Full `generateContent` URL for the configured model.
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

/// Settings for the terminal chat client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub relay_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            relay_url: env::var("CHAT_RELAY_URL").unwrap_or_else(|_| DEFAULT_RELAY_URL.to_string()),
        }
    }
}
