//! Offline training: corpus -> fitted vectorizer -> model artifact.
//!
//! The only thing shared with serving is the artifact written to
//! `AppConfig::model_path`.

use std::path::PathBuf;

use chrono::Utc;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::engine::{Recommendation, Snapshot};
use crate::error::Result;
use crate::experiment::{ExperimentRecorder, ExperimentRun};
use crate::store::JobCorpus;
use crate::vectorizer::TFIDFVectorizer;

#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub corpus_size: usize,
    pub vocab_size: usize,
    pub model_path: PathBuf,
    /// whether the experiment log was written
    pub experiment_recorded: bool,
    /// top results for `AppConfig::smoke_query`, if one is configured
    pub smoke_results: Vec<Recommendation>,
}

/// Load the corpus named by `config` and train on it
#[tracing::instrument(level = "info", skip_all, fields(data = %config.data_path.display()))]
pub fn train(config: &AppConfig) -> Result<TrainingReport> {
    config.validate()?;
    let corpus = JobCorpus::load_csv(&config.data_path)?;
    train_on(config, corpus)
}

/// Fit on `corpus`, save the model, record the run
pub fn train_on(config: &AppConfig, corpus: JobCorpus) -> Result<TrainingReport> {
    let started_at = Utc::now();
    info!(rows = corpus.len(), "training data loaded");

    let mut vectorizer = TFIDFVectorizer::new(config.max_features)?;
    let doc_vectors = vectorizer.fit(&corpus.descriptions())?;
    vectorizer.save(&config.model_path)?;

    let corpus_size = corpus.len();
    let vocab_size = vectorizer.vocab_size();

    let experiment_recorded = match &config.experiment_log {
        Some(path) => {
            let run = ExperimentRun::new(
                &config.experiment_name,
                started_at,
                corpus_size,
                config.max_features,
                vocab_size,
                &config.model_path,
            );
            ExperimentRecorder::new(path.clone()).record(&run)
        }
        None => false,
    };

    let smoke_results = match config.smoke_query.as_deref().filter(|q| !q.trim().is_empty()) {
        Some(query) => {
            let snapshot = Snapshot::from_fit(vectorizer, corpus, doc_vectors)?;
            let results = snapshot.recommend(query, config.top_k)?;
            if results.is_empty() {
                warn!(query, "smoke query matched nothing");
            }
            for rec in &results {
                info!(query, title = %rec.title, score = rec.score, "smoke result");
            }
            results
        }
        None => Vec::new(),
    };

    info!(corpus_size, vocab_size, model = %config.model_path.display(), "training finished");
    Ok(TrainingReport {
        corpus_size,
        vocab_size,
        model_path: config.model_path.clone(),
        experiment_recorded,
        smoke_results,
    })
}
