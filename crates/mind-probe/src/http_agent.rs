//! OpenAI-compatible chat backend.
//!
//! Keeps the running message history client-side and replays it on every
//! request, so each reply reflects the full prior conversation.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::agent::{AgentError, ConversationalAgent};
use crate::config::AgentEndpoint;

/// Request timeout for a single chat completion.
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Chat agent speaking the `/chat/completions` wire format.
pub struct ChatHttpAgent {
    client: reqwest::Client,
    endpoint: AgentEndpoint,
    label: String,
    history: Vec<ChatMessage>,
}

impl ChatHttpAgent {
    pub fn new(endpoint: AgentEndpoint, label: Option<String>) -> Self {
        let label = label.unwrap_or_else(|| endpoint.model.clone());
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to create HTTP client"),
            endpoint,
            label,
            history: Vec::new(),
        }
    }
}

#[async_trait]
impl ConversationalAgent for ChatHttpAgent {
    async fn send_message(&mut self, prompt: &str) -> Result<String, AgentError> {
        self.history.push(ChatMessage {
            role: "user",
            content: prompt.to_string(),
        });

        let request_body = serde_json::json!({
            "model": self.endpoint.model,
            "messages": self.history,
            "temperature": 0.7,
        });

        let url = format!(
            "{}/chat/completions",
            self.endpoint.url.trim_end_matches('/')
        );
        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request_body);
        if let Some(key) = &self.endpoint.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| AgentError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::RequestFailed(format!(
                "chat endpoint error ({status}): {body}"
            )));
        }

        let resp_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AgentError::ParseError(e.to_string()))?;

        let content = resp_json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string();
        if content.is_empty() {
            return Err(AgentError::EmptyReply);
        }

        debug!(agent = %self.label, turns = self.history.len(), "chat reply received");
        self.history.push(ChatMessage {
            role: "assistant",
            content: content.clone(),
        });
        Ok(content)
    }

    fn name(&self) -> String {
        self.label.clone()
    }

    async fn reset_conversation(&mut self) {
        self.history.clear();
    }
}
