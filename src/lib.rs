//! Job posting recommender built on a TF-IDF vectorizer.

pub mod config;
pub mod engine;
pub mod error;
pub mod experiment;
pub mod market;
pub mod store;
pub mod training;
pub mod utils;
pub mod vectorizer;

/// TF-IDF Vectorizer
/// Learns a bounded vocabulary and IDF weights from a corpus and turns any
/// text into a sparse, L2-normalised TF-IDF vector over that vocabulary.
///
/// `TFIDFVectorizer<E>` is generic over the weighting engine `E`
/// (`DefaultTFIDFEngine` unless stated otherwise).
///
/// Lifecycle:
/// - `new(max_features)` creates an unfitted vectorizer
/// - `fit(documents)` builds vocabulary + IDF and returns document vectors
/// - `transform(text)` vectorizes queries; it fails with `NotFitted` before `fit`
///
/// # Serialization
/// `save` / `load` persist vocabulary and IDF as a CBOR artifact.
/// A loaded vectorizer produces identical vectors to the one that was saved.
pub use vectorizer::TFIDFVectorizer;

/// Sparse vector produced by the vectorizer
pub use vectorizer::TFVector;

/// On-disk model format
/// Serializable form of a fitted vectorizer, without any document vectors.
/// Convert back with `into_vectorizer`.
pub use vectorizer::serde::TFIDFData;

/// Term Frequency structure
/// Counts term occurrences inside a single text. Base data for TF.
pub use vectorizer::term::TermFrequency;

/// Corpus statistics
/// Document count, document frequency and total count per term.
/// Base data for IDF and for the max-feature cutoff.
pub use vectorizer::corpus::Corpus;

/// TF IDF Calculation Engine Trait
/// Plug a different weighting scheme into `TFIDFVectorizer<E>`.
/// `DefaultTFIDFEngine` uses smoothed IDF and L2 normalisation.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Search Hits and Hit Entry structures
/// - `Hits`: ranked results, descending score, ties in corpus order
/// - `HitEntry`: corpus index and cosine score of one result
pub use vectorizer::evaluate::scoring::{HitEntry, Hits};

/// Recommendation service
/// `Recommender` is the long-lived, read-only serving object; `Snapshot` is
/// the state it serves; `Recommendation` is one displayed result.
pub use engine::{Recommendation, Recommender, Snapshot};

pub use config::AppConfig;
pub use error::{Error, Result};
pub use store::{JobCorpus, JobPosting};
