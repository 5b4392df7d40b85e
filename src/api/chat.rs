//! Chat endpoints: send an utterance, read or clear the remote transcript.

use super::error::TransportError;
use super::transport::Transport;
use super::types::{ChatMessage, ChatRequest};

#[derive(Debug, Clone)]
pub struct ChatClient {
    transport: Transport,
}

impl ChatClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Post `text` and return the assistant's reply (never the echoed user
    /// message). Blank text is refused before anything goes on the wire.
    pub async fn send_message(&self, text: &str) -> Result<ChatMessage, TransportError> {
        if text.trim().is_empty() {
            tracing::debug!("blank chat message rejected before send");
            return Err(TransportError::new(None, "refusing to send a blank message"));
        }
        self.transport
            .post("/chat", &ChatRequest { message: text })
            .await
    }

    /// Full remote transcript, oldest first.
    pub async fn get_history(&self) -> Result<Vec<ChatMessage>, TransportError> {
        self.transport.get("/chat/history").await
    }

    pub async fn clear_history(&self) -> Result<(), TransportError> {
        let _: serde_json::Value = self.transport.delete("/chat/history").await?;
        Ok(())
    }
}
