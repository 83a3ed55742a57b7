use crate::game::TrialRecord;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Serializes the trial log to CSV: a fixed header followed by one
/// row per trial.
pub fn to_csv(trials: &[TrialRecord]) -> String {
    let mut out = String::from("color,x,y,response\n");
    for trial in trials {
        out.push_str(&format!(
            "{},{},{},{}\n",
            trial.color.name(),
            trial.x,
            trial.y,
            trial.response_ms
        ));
    }
    out
}

/// Export filename carries the wall-clock epoch in milliseconds,
/// mirroring `results-<timestamp>` naming of the original exports.
pub fn results_filename() -> String {
    let epoch_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("results-{}", epoch_ms)
}

/// Writes the trial log as a CSV file under `dir` and returns the
/// path written.
pub fn write_results(dir: &Path, trials: &[TrialRecord]) -> Result<PathBuf> {
    let path = dir.join(results_filename());
    std::fs::write(&path, to_csv(trials))
        .with_context(|| format!("failed to write results to {}", path.display()))?;
    Ok(path)
}
