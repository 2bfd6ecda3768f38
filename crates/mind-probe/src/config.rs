//! Environment-driven configuration for the probe binary.

use std::path::PathBuf;
use std::time::Duration;

/// OpenAI-compatible chat endpoint.
#[derive(Debug, Clone)]
pub struct AgentEndpoint {
    /// Base URL, e.g. `http://localhost:8080/v1`.
    pub url: String,
    pub model: String,
    pub api_key: Option<String>,
}

/// Top-level probe configuration.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub endpoint: AgentEndpoint,
    /// Fixed pause between steps.
    pub step_delay: Duration,
    /// Directory where run reports are written.
    pub report_dir: PathBuf,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            endpoint: AgentEndpoint {
                url: std::env::var("PROBE_AGENT_URL")
                    .unwrap_or_else(|_| "http://localhost:8080/v1".into()),
                model: std::env::var("PROBE_AGENT_MODEL")
                    .unwrap_or_else(|_| "gpt-4o".into()),
                api_key: std::env::var("PROBE_API_KEY").ok(),
            },
            step_delay: Duration::from_secs(2),
            report_dir: PathBuf::from("reports"),
        }
    }
}
