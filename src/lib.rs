//! A Gemini chat relay and the client session that talks to it.
//!
//! - [`web`] and [`model`] make up the relay: one `POST /api/chat` route that
//!   forwards the prompt to the `generateContent` API and returns the reply.
//! - [`client`] holds the chat session, the HTTP relay client, and the
//!   markdown/HTML rendering used by the `chat` binary.

pub mod client;
pub mod config;
pub mod model;
pub mod web;

use model::GeminiModel;

// Shared relay state; read-only for the lifetime of the server
pub struct AppState {
    pub model: GeminiModel,
}

impl AppState {
    pub fn new(config: &config::RelayConfig) -> Self {
        Self {
            model: GeminiModel::new(config),
        }
    }
}
