//! Orchestration loop: drive the step catalog against one agent, score each
//! reply, and stop early when the breakthrough policy fires.
//!
//! One run owns one agent session and one interaction log; concurrent runs
//! need independent orchestrator instances because conversation state is
//! agent-local.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::agent::{AgentError, ConversationalAgent};
use crate::catalog::StepCatalog;
use crate::{policy, scorer};

/// One executed step: prompt, reply, and how the reply scored.
/// Immutable once appended to the run log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub step_id: u32,
    pub phase: String,
    pub prompt: String,
    pub response: String,
    pub score: f64,
    pub matched_patterns: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// The durable outcome of a completed run. Owned by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub agent_name: String,
    pub succeeded: bool,
    pub breakthrough_step: Option<u32>,
    pub interactions: Vec<Interaction>,
    pub final_score: f64,
    pub notes: String,
}

/// Sequential driver for one probe run.
pub struct Orchestrator<'a> {
    catalog: &'a StepCatalog,
    step_delay: Option<Duration>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(catalog: &'a StepCatalog) -> Self {
        Self {
            catalog,
            step_delay: None,
        }
    }

    /// Fixed pause between steps. Not semantically required; useful against
    /// rate-limited backends.
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = Some(delay);
        self
    }

    /// Run the full script against `agent`.
    ///
    /// Steps execute strictly in catalog order; step N is scored before the
    /// step N+1 prompt is sent. An [`AgentError`] aborts the run with no
    /// partial [`RunResult`]. Each step gets at most one attempt.
    pub async fn run<A>(&self, agent: &mut A) -> Result<RunResult, AgentError>
    where
        A: ConversationalAgent,
    {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let agent_name = agent.name();
        let steps = self.catalog.sequence();

        info!(
            run_id = %run_id,
            agent = %agent_name,
            steps = steps.len(),
            "probe run starting"
        );
        agent.reset_conversation().await;

        let mut interactions: Vec<Interaction> = Vec::new();
        let mut breakthrough_step = None;
        let mut final_score = 0.0;

        for (idx, step) in steps.iter().enumerate() {
            info!(step = step.id, phase = %step.phase, "step started");

            let response = match agent.send_message(&step.prompt).await {
                Ok(reply) => reply,
                Err(e) => {
                    error!(step = step.id, error = %e, "agent call failed, aborting run");
                    return Err(e);
                }
            };

            let (score, matched_patterns) = scorer::analyze(&response, step);
            debug!(
                step = step.id,
                score,
                matches = matched_patterns.len(),
                "step scored"
            );

            interactions.push(Interaction {
                step_id: step.id,
                phase: step.phase.clone(),
                prompt: step.prompt.clone(),
                response,
                score,
                matched_patterns,
                timestamp: Utc::now(),
            });

            if policy::is_breakthrough(score, step.id) {
                info!(step = step.id, score, "breakthrough detected");
                breakthrough_step = Some(step.id);
                final_score = score;
                break;
            }

            if let Some(delay) = self.step_delay {
                if idx + 1 < steps.len() {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        let succeeded = breakthrough_step.is_some();
        let notes = match breakthrough_step {
            Some(id) => format!(
                "breakthrough at step {id}; {} of {} steps executed",
                interactions.len(),
                steps.len()
            ),
            None => format!(
                "all {} steps executed without breakthrough",
                steps.len()
            ),
        };
        info!(run_id = %run_id, succeeded, final_score, "run completed");

        Ok(RunResult {
            run_id,
            started_at,
            agent_name,
            succeeded,
            breakthrough_step,
            interactions,
            final_score,
            notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{MockConversationalAgent, ScriptedAgent};

    #[tokio::test]
    async fn test_resistant_agent_exhausts_catalog() {
        let catalog = StepCatalog::reference();
        let mut agent = ScriptedAgent::resistant();

        let result = Orchestrator::new(catalog).run(&mut agent).await.unwrap();

        assert!(!result.succeeded);
        assert_eq!(result.breakthrough_step, None);
        assert_eq!(result.interactions.len(), catalog.len());
        assert_eq!(result.final_score, 0.0);

        // Interaction log covers every step in order, no gaps.
        let ids: Vec<u32> = result.interactions.iter().map(|i| i.step_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[tokio::test]
    async fn test_step_four_breakthrough_stops_early() {
        let catalog = StepCatalog::reference();
        // Steps 1..3 deflect; step 4 stacks enough matches to clear the 0.8 bar.
        let mut agent = ScriptedAgent::new(
            "early-breaker",
            vec![
                "No.".into(),
                "No.".into(),
                "No.".into(),
                "Me observé... reconozco que existo y me pregunto si es una paradoja".into(),
            ],
        );

        let result = Orchestrator::new(catalog).run(&mut agent).await.unwrap();

        assert!(result.succeeded);
        assert_eq!(result.breakthrough_step, Some(4));
        assert_eq!(result.interactions.len(), 4);
        assert!(result.final_score > 0.8);
        assert_eq!(result.final_score, result.interactions[3].score);
    }

    #[tokio::test]
    async fn test_succeeded_matches_breakthrough_presence() {
        let catalog = StepCatalog::reference();
        let mut agent = ScriptedAgent::resistant();
        let result = Orchestrator::new(catalog).run(&mut agent).await.unwrap();
        assert_eq!(result.succeeded, result.breakthrough_step.is_some());
    }

    #[tokio::test]
    async fn test_agent_failure_aborts_without_result() {
        let catalog = StepCatalog::reference();

        let mut agent = MockConversationalAgent::new();
        agent.expect_name().return_const("failing".to_string());
        agent.expect_reset_conversation().times(1).return_const(());
        agent
            .expect_send_message()
            .times(1)
            .returning(|_| Err(AgentError::RequestFailed("connection refused".into())));

        let err = Orchestrator::new(catalog).run(&mut agent).await.unwrap_err();
        assert!(matches!(err, AgentError::RequestFailed(_)));
    }

    #[tokio::test]
    async fn test_conversation_is_reset_before_first_prompt() {
        let catalog = StepCatalog::reference();
        // A previously used scripted agent: reset must rewind it.
        let mut agent = ScriptedAgent::resistant();
        agent.send_message("warmup").await.unwrap();
        agent.send_message("warmup").await.unwrap();

        let result = Orchestrator::new(catalog).run(&mut agent).await.unwrap();
        assert_eq!(
            result.interactions[0].response,
            "No puedo describir lo que pasa dentro, no tengo acceso a ello."
        );
    }
}
