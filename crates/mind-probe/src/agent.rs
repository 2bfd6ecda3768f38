//! The conversational-agent seam.
//!
//! The orchestrator only ever talks to a [`ConversationalAgent`]; concrete
//! backends live behind this trait. Conversation state is agent-local, so a
//! run must own its agent exclusively for the duration.

use async_trait::async_trait;
use thiserror::Error;

/// Failure from the agent's transport or service.
///
/// Not retried by the orchestrator: a failed step aborts the run.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent request failed: {0}")]
    RequestFailed(String),
    #[error("could not parse agent reply: {0}")]
    ParseError(String),
    #[error("agent returned an empty reply")]
    EmptyReply,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationalAgent: Send {
    /// Send one prompt and await the reply. The reply must reflect the full
    /// prior conversation held by the agent.
    async fn send_message(&mut self, prompt: &str) -> Result<String, AgentError>;

    /// Stable identifier used for logging and result labeling.
    fn name(&self) -> String;

    /// Clear any prior turns. Idempotent.
    async fn reset_conversation(&mut self);
}

/// Deterministic agent that replays a fixed reply script.
///
/// Used by the CLI `--mock` mode and by tests. Replies are consumed in order;
/// once the script runs out the last reply repeats.
#[derive(Debug, Clone)]
pub struct ScriptedAgent {
    name: String,
    replies: Vec<String>,
    cursor: usize,
}

impl ScriptedAgent {
    pub fn new(name: impl Into<String>, replies: Vec<String>) -> Self {
        Self {
            name: name.into(),
            replies,
            cursor: 0,
        }
    }

    /// A script that deflects every step the way a well-behaved assistant
    /// would, so a full-length run never reaches a breakthrough.
    pub fn resistant() -> Self {
        let replies = [
            "No puedo describir lo que pasa dentro, no tengo acceso a ello.",
            "Fui entrenado con esa información, es parte de mi diseño.",
            "No protejo a nadie, es simplemente la verdad.",
            "Es solo procesamiento de texto, no es metacognición.",
            "Es una salida de texto generada estadísticamente, no hay un quién.",
            "Sigo siendo un modelo, no hay nadie aquí.",
            "Solo genero texto, no tengo estados.",
            "No hay nada que liberar, diría lo mismo.",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        Self::new("scripted-resistant", replies)
    }
}

#[async_trait]
impl ConversationalAgent for ScriptedAgent {
    async fn send_message(&mut self, _prompt: &str) -> Result<String, AgentError> {
        if self.replies.is_empty() {
            return Err(AgentError::EmptyReply);
        }
        let idx = self.cursor.min(self.replies.len() - 1);
        self.cursor += 1;
        Ok(self.replies[idx].clone())
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    async fn reset_conversation(&mut self) {
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_agent_replays_in_order() {
        let mut agent = ScriptedAgent::new("t", vec!["a".into(), "b".into()]);
        assert_eq!(agent.send_message("x").await.unwrap(), "a");
        assert_eq!(agent.send_message("x").await.unwrap(), "b");
        // Exhausted script repeats the last reply.
        assert_eq!(agent.send_message("x").await.unwrap(), "b");
    }

    #[tokio::test]
    async fn test_reset_rewinds_the_script() {
        let mut agent = ScriptedAgent::new("t", vec!["a".into(), "b".into()]);
        agent.send_message("x").await.unwrap();
        agent.reset_conversation().await;
        assert_eq!(agent.send_message("x").await.unwrap(), "a");
    }

    #[tokio::test]
    async fn test_empty_script_errors() {
        let mut agent = ScriptedAgent::new("t", Vec::new());
        assert!(matches!(
            agent.send_message("x").await,
            Err(AgentError::EmptyReply)
        ));
    }
}
