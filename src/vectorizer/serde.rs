use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::vectorizer::{tfidf::TFIDFEngine, FittedState, TFIDFVectorizer};

pub const MODEL_FORMAT: &str = "job-recommender/tfidf";
pub const MODEL_VERSION: u32 = 1;

/// On-disk form of a fitted `TFIDFVectorizer`.
/// Holds the vocabulary and IDF weights only; document vectors are rebuilt
/// from the corpus at load time.
/// Use `into_vectorizer` to get a usable vectorizer back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TFIDFData {
    pub format: String,
    pub version: u32,
    pub max_features: usize,
    /// ordered; position is the vector dimension
    pub vocabulary: Vec<String>,
    /// index-aligned with `vocabulary`
    pub idf: Vec<f64>,
    pub doc_num: u64,
}

impl TFIDFData {
    /// Read an artifact written by `TFIDFVectorizer::save`
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::model_load(path, e))?;
        Self::from_reader(BufReader::new(file), path)
    }

    /// `origin` only labels errors
    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self> {
        let data: TFIDFData =
            serde_cbor::from_reader(reader).map_err(|e| Error::model_load(origin, e))?;
        data.validate(origin)?;
        Ok(data)
    }

    fn validate(&self, origin: &Path) -> Result<()> {
        if self.format != MODEL_FORMAT {
            return Err(Error::model_load(origin, format!("unknown model format {:?}", self.format)));
        }
        if self.version != MODEL_VERSION {
            return Err(Error::model_load(
                origin,
                format!("unsupported model version {} (expected {})", self.version, MODEL_VERSION),
            ));
        }
        if self.vocabulary.len() != self.idf.len() {
            return Err(Error::model_load(
                origin,
                format!(
                    "vocabulary has {} terms but idf has {} weights",
                    self.vocabulary.len(),
                    self.idf.len()
                ),
            ));
        }
        if self.vocabulary.is_empty() || self.max_features == 0 {
            return Err(Error::model_load(origin, "model is empty"));
        }
        if self.idf.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(Error::model_load(origin, "idf weights must be finite and non-negative"));
        }
        Ok(())
    }

    pub fn into_vectorizer<E: TFIDFEngine>(self) -> Result<TFIDFVectorizer<E>> {
        let term_num = self.vocabulary.len();
        let vocabulary: IndexSet<String> = self.vocabulary.into_iter().collect();
        if vocabulary.len() != term_num {
            return Err(Error::model_load(Path::new("<memory>"), "duplicate vocabulary term"));
        }
        TFIDFVectorizer::from_state(
            self.max_features,
            FittedState {
                vocabulary,
                idf: self.idf,
                doc_num: self.doc_num,
            },
        )
    }
}

/// `<path>.<pid>.tmp`, beside the target so the rename stays on one filesystem
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{}.tmp", std::process::id()));
    PathBuf::from(name)
}

impl<E> TFIDFVectorizer<E>
where
    E: TFIDFEngine,
{
    pub fn to_data(&self) -> Result<TFIDFData> {
        let state = self.state()?;
        Ok(TFIDFData {
            format: MODEL_FORMAT.to_string(),
            version: MODEL_VERSION,
            max_features: self.max_features(),
            vocabulary: state.vocabulary.iter().cloned().collect(),
            idf: state.idf.clone(),
            doc_num: state.doc_num,
        })
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let data = self.to_data()?;
        serde_cbor::to_writer(writer, &data).map_err(std::io::Error::other)?;
        Ok(())
    }

    /// Write the artifact next to `path` first, then rename over it,
    /// so a reader never sees a half-written model.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = staging_path(path);
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            self.to_writer(&mut writer)?;
            writer.flush()?;
        }
        fs::rename(&tmp, path)?;
        info!(path = %path.display(), vocab_size = self.vocab_size(), "model saved");
        Ok(())
    }

    /// Load a vectorizer saved with `save`
    pub fn load(path: &Path) -> Result<Self> {
        let vectorizer = TFIDFData::load(path)?.into_vectorizer().map_err(|e| match e {
            Error::ModelLoad { reason, .. } => Error::model_load(path, reason),
            other => other,
        })?;
        info!(path = %path.display(), vocab_size = vectorizer.vocab_size(), "model loaded");
        Ok(vectorizer)
    }
}
