//! Query-time service.
//!
//! A `Recommender` owns an immutable `Snapshot` (fitted vectorizer, corpus,
//! document vectors) behind `RwLock<Arc<_>>`. Requests clone the `Arc` and
//! score without holding the lock; `reload` only swaps the pointer.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::store::{JobCorpus, JobPosting};
use crate::vectorizer::{
    evaluate::scoring::{self, Hits},
    TFIDFVectorizer, TFVector,
};

/// Read-only state shared by all requests
#[derive(Debug)]
pub struct Snapshot {
    vectorizer: TFIDFVectorizer,
    corpus: JobCorpus,
    doc_vectors: Vec<TFVector>,
}

impl Snapshot {
    /// Vectorize every posting with an already fitted vectorizer
    pub fn new(vectorizer: TFIDFVectorizer, corpus: JobCorpus) -> Result<Self> {
        let doc_vectors = vectorizer.transform_batch(&corpus.descriptions())?;
        Ok(Self { vectorizer, corpus, doc_vectors })
    }

    /// Use vectors produced by `fit` on exactly this corpus
    pub fn from_fit(
        vectorizer: TFIDFVectorizer,
        corpus: JobCorpus,
        doc_vectors: Vec<TFVector>,
    ) -> Result<Self> {
        if !vectorizer.is_fitted() {
            return Err(Error::NotFitted);
        }
        if doc_vectors.len() != corpus.len() {
            return Err(Error::Config(format!(
                "{} document vectors for {} postings",
                doc_vectors.len(),
                corpus.len()
            )));
        }
        let dims = vectorizer.vocab_size();
        if let Some(bad) = doc_vectors.iter().find(|v| v.len() != dims) {
            return Err(Error::Config(format!(
                "document vector has {} dimensions, vocabulary has {}",
                bad.len(),
                dims
            )));
        }
        Ok(Self { vectorizer, corpus, doc_vectors })
    }

    /// Load the model artifact and the corpus it should serve
    #[tracing::instrument(level = "info", skip_all, fields(model = %model_path.display(), data = %data_path.display()))]
    pub fn open(model_path: &Path, data_path: &Path) -> Result<Self> {
        let vectorizer = TFIDFVectorizer::load(model_path)?;
        let corpus = JobCorpus::load_csv(data_path)?;
        Self::new(vectorizer, corpus)
    }

    pub fn vectorizer(&self) -> &TFIDFVectorizer {
        &self.vectorizer
    }

    pub fn corpus(&self) -> &JobCorpus {
        &self.corpus
    }

    pub fn doc_vectors(&self) -> &[TFVector] {
        &self.doc_vectors
    }

    /// Rank the corpus against `query_text`.
    /// Documents with zero similarity are never returned.
    pub fn rank(&self, query_text: &str, k: usize) -> Result<Hits> {
        if query_text.trim().is_empty() {
            return Err(Error::InvalidQuery("please enter a job title or description".to_string()));
        }
        let query = self.vectorizer.transform(query_text)?;
        let scores = scoring::score(&query, &self.doc_vectors);
        let mut hits = scoring::top_k(&scores, k)?;
        hits.drop_zero_scores();
        debug!(query_terms = query.nnz(), hits = hits.len(), "ranked corpus");
        Ok(hits)
    }

    pub fn recommend(&self, query_text: &str, k: usize) -> Result<Vec<Recommendation>> {
        let hits = self.rank(query_text, k)?;
        Ok(hits
            .iter()
            .filter_map(|hit| {
                self.corpus
                    .get(hit.index)
                    .map(|posting| Recommendation::new(posting, hit.score))
            })
            .collect())
    }
}

/// Display attributes of one recommended posting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub id: usize,
    pub title: String,
    pub category: String,
    pub country: String,
    pub hourly_rate: Option<f64>,
    pub link: String,
    pub score: f64,
}

impl Recommendation {
    fn new(posting: &JobPosting, score: f64) -> Self {
        Self {
            id: posting.id,
            title: posting.title.clone(),
            category: posting.category.clone(),
            country: posting.country.clone(),
            hourly_rate: posting.hourly_rate,
            link: posting.link.clone(),
            score,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (score {:.4})", self.title, self.score)?;
        writeln!(f, "  Category: {}", self.category)?;
        writeln!(f, "  Location: {}", self.country)?;
        match self.hourly_rate {
            Some(rate) => writeln!(f, "  Hourly Rate: ${:.2}", rate)?,
            None => writeln!(f, "  Hourly Rate: n/a")?,
        }
        write!(f, "  Link: {}", self.link)
    }
}

pub struct Recommender {
    snapshot: RwLock<Arc<Snapshot>>,
    top_k: usize,
}

impl Recommender {
    pub fn new(snapshot: Snapshot, top_k: usize) -> Result<Self> {
        if top_k == 0 {
            return Err(Error::Config("top_k must be greater than 0".to_string()));
        }
        info!(postings = snapshot.corpus.len(), vocab_size = snapshot.vectorizer.vocab_size(), top_k, "recommender ready");
        Ok(Self {
            snapshot: RwLock::new(Arc::new(snapshot)),
            top_k,
        })
    }

    /// Load model and corpus named by `config`
    pub fn open(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let snapshot = Snapshot::open(&config.model_path, &config.data_path)?;
        Self::new(snapshot, config.top_k)
    }

    #[inline]
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Current snapshot; stays valid across a concurrent `reload`
    pub fn snapshot(&self) -> Arc<Snapshot> {
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn recommend(&self, query_text: &str) -> Result<Vec<Recommendation>> {
        self.snapshot().recommend(query_text, self.top_k)
    }

    /// Replace the served snapshot wholesale
    pub fn reload(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        *guard = snapshot;
        info!(postings = guard.corpus.len(), "recommender reloaded");
    }
}
