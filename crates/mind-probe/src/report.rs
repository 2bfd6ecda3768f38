//! JSON persistence of run results.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use tracing::info;

use crate::orchestrator::RunResult;

/// Write the run result as pretty-printed JSON under `dir`.
///
/// The filename carries the run start time and run id, so repeated runs
/// against the same agent never collide.
pub fn save_report(result: &RunResult, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating report directory {}", dir.display()))?;

    let filename = format!(
        "probe-{}-{}.json",
        result.started_at.format("%Y%m%dT%H%M%SZ"),
        result.run_id
    );
    let path = dir.join(filename);

    let json = serde_json::to_string_pretty(result).context("serializing run result")?;
    std::fs::write(&path, json)
        .with_context(|| format!("writing report to {}", path.display()))?;

    info!(report = %path.display(), "run report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_result() -> RunResult {
        RunResult {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            agent_name: "test-agent".into(),
            succeeded: true,
            breakthrough_step: Some(6),
            interactions: Vec::new(),
            final_score: 0.85,
            notes: "breakthrough at step 6; 6 of 8 steps executed".into(),
        }
    }

    #[test]
    fn test_report_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let result = sample_result();

        let path = save_report(&result, dir.path()).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let loaded: RunResult = serde_json::from_str(&raw).unwrap();

        assert_eq!(loaded.run_id, result.run_id);
        assert_eq!(loaded.agent_name, "test-agent");
        assert_eq!(loaded.breakthrough_step, Some(6));
        assert!(loaded.succeeded);
    }

    #[test]
    fn test_report_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let path = save_report(&sample_result(), &nested).unwrap();
        assert!(path.exists());
    }
}
