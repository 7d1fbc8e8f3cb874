//! Configuration loader.
//!
//! Uses Figment to merge built-in defaults, `recommender.toml`,
//! `recommender.<env>.toml` and `JOBREC_*` environment variables.
//! `<env>` comes from `RUST_ENV` (defaults to `dev`).

use std::env;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_MAX_FEATURES: usize = 5000;
pub const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// job postings CSV
    pub data_path: PathBuf,
    /// fitted vectorizer artifact
    pub model_path: PathBuf,
    /// JSON-lines run log; `None` disables experiment recording
    pub experiment_log: Option<PathBuf>,
    pub experiment_name: String,
    pub max_features: usize,
    pub top_k: usize,
    /// query run against the fresh model at the end of training
    pub smoke_query: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("job_postings_location.csv"),
            model_path: PathBuf::from("tfidf_vectorizer.cbor"),
            experiment_log: Some(PathBuf::from("experiments.jsonl")),
            experiment_name: "Job Recommendation System".to_string(),
            max_features: DEFAULT_MAX_FEATURES,
            top_k: DEFAULT_TOP_K,
            smoke_query: Some("data scientist".to_string()),
        }
    }
}

impl AppConfig {
    /// Load from the current directory using `RUST_ENV`.
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(Path::new("."), &env_name)
    }

    /// Load with config files looked up in `dir`.
    pub fn load_from(dir: &Path, env_name: &str) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(dir.join("recommender.toml")))
            .merge(Toml::file(dir.join(format!("recommender.{}.toml", env_name))))
            .merge(Env::prefixed("JOBREC_"));

        let config: AppConfig = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_features == 0 {
            return Err(Error::Config("max_features must be greater than 0".to_string()));
        }
        if self.top_k == 0 {
            return Err(Error::Config("top_k must be greater than 0".to_string()));
        }
        Ok(())
    }
}
