//! Append-only record of training runs.
//!
//! Each run is one JSON line. Recording never fails the caller: I/O and
//! serialization problems are logged and swallowed.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRun {
    pub experiment: String,
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    /// number of postings the model was fitted on
    pub corpus_size: usize,
    pub max_features: usize,
    pub vocab_size: usize,
    pub model_artifact: PathBuf,
}

impl ExperimentRun {
    pub fn new(
        experiment: &str,
        started_at: DateTime<Utc>,
        corpus_size: usize,
        max_features: usize,
        vocab_size: usize,
        model_artifact: &Path,
    ) -> Self {
        Self {
            experiment: experiment.to_string(),
            run_id: format!("{}-{}", started_at.format("%Y%m%dT%H%M%S%.3f"), std::process::id()),
            started_at,
            corpus_size,
            max_features,
            vocab_size,
            model_artifact: model_artifact.to_path_buf(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExperimentRecorder {
    path: PathBuf,
}

impl ExperimentRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether the run was written
    pub fn record(&self, run: &ExperimentRun) -> bool {
        match self.try_record(run) {
            Ok(()) => {
                info!(run_id = %run.run_id, path = %self.path.display(), "experiment recorded");
                true
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to record experiment");
                false
            }
        }
    }

    fn try_record(&self, run: &ExperimentRun) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut line = serde_json::to_string(run).map_err(std::io::Error::other)?;
        line.push('\n');
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())
    }

    /// All runs in the log, skipping lines that do not parse
    pub fn runs(&self) -> Vec<ExperimentRun> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| serde_json::from_str(l).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run() -> ExperimentRun {
        ExperimentRun::new("jobs", Utc::now(), 120, 5000, 830, Path::new("model.cbor"))
    }

    #[test]
    fn appends_one_line_per_run() {
        let tmp = tempfile::TempDir::new().unwrap();
        let recorder = ExperimentRecorder::new(tmp.path().join("logs/experiments.jsonl"));
        assert!(recorder.record(&run()));
        assert!(recorder.record(&run()));
        let runs = recorder.runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].corpus_size, 120);
        assert_eq!(runs[0].model_artifact, PathBuf::from("model.cbor"));
    }

    #[test]
    fn unwritable_path_is_swallowed() {
        let tmp = tempfile::TempDir::new().unwrap();
        // a directory cannot be opened for appending
        let recorder = ExperimentRecorder::new(tmp.path());
        assert!(!recorder.record(&run()));
        assert!(recorder.runs().is_empty());
    }
}
