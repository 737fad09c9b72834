use anyhow::Result;
use log::{error, warn};

use super::message::Message;
use super::relay::Relay;

/// Text shown in the transcript when the relay call fails.
pub const ERROR_TEXT: &str = "Failed to get response. Please try again.";

/// In-memory state of one chat session: the append-only message list, the
/// pending input and the loading flag.
#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<Message>,
    input: String,
    loading: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the send control is enabled.
    pub fn can_send(&self) -> bool {
        !self.loading
    }

    /// First half of a submission. Returns the prompt to send, or `None` when
    /// the input is blank or a request is already in flight.
    pub fn begin_submit(&mut self) -> Option<String> {
        if !self.can_send() || self.input.trim().is_empty() {
            return None;
        }

        let prompt = std::mem::take(&mut self.input);
        self.messages.push(Message::user(prompt.clone()));
        self.loading = true;
        Some(prompt)
    }

    /// Second half of a submission: records the relay outcome and clears the
    /// loading flag.
    pub fn finish_submit(&mut self, result: Result<String>) {
        match result {
            Ok(reply) => {
                if reply.is_empty() {
                    warn!("Relay returned an empty reply");
                }
                self.messages.push(Message::assistant(reply));
            }
            Err(e) => {
                error!("Error: {:#}", e);
                self.messages.push(Message::error(ERROR_TEXT));
            }
        }
        self.loading = false;
    }

    /// Runs a whole submission against `relay`. Returns false if nothing was sent.
    pub async fn submit<R: Relay + ?Sized>(&mut self, relay: &R) -> bool {
        let Some(prompt) = self.begin_submit() else {
            return false;
        };
        let result = relay.send(&prompt).await;
        self.finish_submit(result);
        true
    }
}
