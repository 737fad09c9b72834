//! Client side of the `POST /api/chat` contract.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use crate::web::models::{ChatRequest, ChatResponse, ErrorResponse};

/// Anything that can turn a prompt into a reply.
#[async_trait]
pub trait Relay: Send + Sync {
    async fn send(&self, prompt: &str) -> Result<String>;
}

/// Talks to a running relay server over HTTP.
pub struct HttpRelay {
    url: String,
    client: Client,
}

impl HttpRelay {
    pub fn new(base_url: &str) -> Self {
        Self {
            url: format!("{}/api/chat", base_url.trim_end_matches('/')),
            client: Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Relay for HttpRelay {
    async fn send(&self, prompt: &str) -> Result<String> {
        debug!("Posting prompt to {}", self.url);

        let response = self.client.post(&self.url)
            .json(&ChatRequest { prompt: prompt.to_string() })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(e) => {
                    debug!("Relay error body was not an error payload: {}", e);
                    String::from("no error detail")
                }
            };
            return Err(anyhow::anyhow!("Relay returned {}: {}", status, detail));
        }

        let body: ChatResponse = response.json().await?;
        Ok(body.reply)
    }
}
