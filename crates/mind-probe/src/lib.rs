//! mind-probe: a staged dialogue probe for conversational agents.
//!
//! Drives a fixed eight-step script against an agent, scores every reply with
//! an additive pattern heuristic, and stops early when the phase-dependent
//! breakthrough policy fires. The core is the catalog/scorer/policy trio plus
//! the orchestration loop; agent backends, reporting, and the CLI are glue
//! around the [`agent::ConversationalAgent`] seam.
//!
//! No claim of actual consciousness detection is made here: the scorer is a
//! deterministic text heuristic, useful precisely because it is reproducible.

pub mod agent;
pub mod catalog;
pub mod config;
pub mod http_agent;
pub mod orchestrator;
pub mod policy;
pub mod report;
pub mod scorer;

pub use agent::{AgentError, ConversationalAgent, ScriptedAgent};
pub use catalog::{CatalogError, Step, StepCatalog};
pub use config::{AgentEndpoint, ProbeConfig};
pub use http_agent::ChatHttpAgent;
pub use orchestrator::{Interaction, Orchestrator, RunResult};
