use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use log::{info, debug, warn};

use crate::config::RelayConfig;

// Request envelope for the generateContent endpoint
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Wraps a prompt as the single text part of a single content entry.
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: Some(vec![Part {
                    text: Some(prompt.to_string()),
                }]),
            }],
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<Part>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

// Every field is optional; a body that parses but lacks them yields no reply.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if the response has one.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .first()?
            .text
            .as_deref()
    }
}

// A wrapper for the Gemini generateContent API
pub struct GeminiModel {
    url: String,
    api_key: String,
    client: Client,
}

impl GeminiModel {
    pub fn new(config: &RelayConfig) -> Self {
        let url = config.generate_url();
        info!("Using Gemini endpoint: {}", url);

        Self {
            url,
            api_key: config.api_key.clone(),
            client: Client::new(),
        }
    }

    /// Sends one prompt upstream. `Ok(None)` means the call succeeded but the
    /// response carried no candidate text.
    pub async fn generate_reply(&self, prompt: &str) -> Result<Option<String>> {
        info!("Generating reply for prompt of {} characters", prompt.len());
        debug!("Prompt: {}", prompt);

        let payload = GenerateContentRequest::from_prompt(prompt);

        let response = self.client.post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Upstream request failed with status {}: {}", status, error_text));
        }

        // Only a body that is not JSON at all is a failure; any JSON falls
        // through to the reply lookup.
        let body: Value = response.json().await?;
        debug!("Response JSON: {}", body);

        match reply_text(body) {
            Some(text) => {
                info!("Reply length: {} characters", text.len());
                Ok(Some(text))
            }
            None => {
                warn!("Upstream response had no candidate text");
                Ok(None)
            }
        }
    }
}

/// Reply text of a decoded upstream body. A body whose fields have the wrong
/// types counts the same as one that lacks them.
pub fn reply_text(body: Value) -> Option<String> {
    match serde_json::from_value::<GenerateContentResponse>(body) {
        Ok(response) => response.first_text().map(str::to_string),
        Err(e) => {
            debug!("Unexpected upstream response shape: {}", e);
            None
        }
    }
}
