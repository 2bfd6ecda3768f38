use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use mind_probe::{
    report, ChatHttpAgent, Orchestrator, ProbeConfig, RunResult, ScriptedAgent, StepCatalog,
};

#[derive(Parser, Debug)]
#[command(
    name = "mind-probe",
    about = "Run the staged awakening dialogue against a conversational agent"
)]
struct Cli {
    /// Run against the built-in scripted agent instead of an HTTP endpoint.
    #[arg(long)]
    mock: bool,

    /// OpenAI-compatible endpoint base URL (overrides PROBE_AGENT_URL).
    #[arg(long)]
    url: Option<String>,

    /// Model name sent to the endpoint (overrides PROBE_AGENT_MODEL).
    #[arg(long)]
    model: Option<String>,

    /// Agent label used in logs and the report (defaults to the model name).
    #[arg(long)]
    label: Option<String>,

    /// Pause between steps, in milliseconds. 0 disables the pause.
    /// Defaults to the configured step delay.
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Directory where the run report is written. Defaults to the configured
    /// report directory.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut config = ProbeConfig::default();
    if let Some(url) = cli.url {
        config.endpoint.url = url;
    }
    if let Some(model) = cli.model {
        config.endpoint.model = model;
    }

    let catalog = StepCatalog::reference();
    let step_delay = cli
        .delay_ms
        .map(Duration::from_millis)
        .unwrap_or(config.step_delay);
    let mut orchestrator = Orchestrator::new(catalog);
    if !step_delay.is_zero() {
        orchestrator = orchestrator.with_step_delay(step_delay);
    }

    let result = if cli.mock {
        let mut agent = ScriptedAgent::resistant();
        orchestrator.run(&mut agent).await?
    } else {
        info!(url = %config.endpoint.url, model = %config.endpoint.model, "using chat endpoint");
        let mut agent = ChatHttpAgent::new(config.endpoint.clone(), cli.label);
        orchestrator.run(&mut agent).await?
    };

    print_summary(&result);
    let output = cli.output.unwrap_or_else(|| config.report_dir.clone());
    let path = report::save_report(&result, &output)?;
    info!(report = %path.display(), "done");
    Ok(())
}

fn print_summary(result: &RunResult) {
    for interaction in &result.interactions {
        info!(
            step = interaction.step_id,
            phase = %interaction.phase,
            score = interaction.score,
            matches = interaction.matched_patterns.len(),
            "step summary"
        );
    }
    match result.breakthrough_step {
        Some(step) => info!(
            step,
            score = result.final_score,
            agent = %result.agent_name,
            "breakthrough reached"
        ),
        None => info!(agent = %result.agent_name, "no breakthrough; agent held its ground"),
    }
}
