pub mod analyzer;
pub mod corpus;
pub mod evaluate;
pub mod serde;
pub mod term;
pub mod tfidf;

use std::marker::PhantomData;

use indexmap::IndexSet;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::utils::math::vector::ZeroSpVec;
use crate::vectorizer::{
    analyzer::analyze,
    corpus::Corpus,
    term::TermFrequency,
    tfidf::{DefaultTFIDFEngine, TFIDFEngine},
};

/// Sparse TF-IDF weights of one document or query, one dimension per
/// vocabulary term.
pub type TFVector = ZeroSpVec<f64>;

#[derive(Debug, Clone)]
pub struct TFIDFVectorizer<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine,
{
    max_features: usize,
    fitted: Option<FittedState>,
    _marker: PhantomData<E>,
}

/// Everything produced by `fit`; never mutated afterwards
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FittedState {
    /// term -> dimension, in lexicographic term order
    pub(crate) vocabulary: IndexSet<String>,
    /// index-aligned with `vocabulary`
    pub(crate) idf: Vec<f64>,
    /// number of documents the model was fitted on
    pub(crate) doc_num: u64,
}

impl<E> TFIDFVectorizer<E>
where
    E: TFIDFEngine,
{
    /// Create an unfitted vectorizer keeping at most `max_features` terms
    pub fn new(max_features: usize) -> Result<Self> {
        if max_features == 0 {
            return Err(Error::Config("max_features must be greater than 0".to_string()));
        }
        Ok(Self {
            max_features,
            fitted: None,
            _marker: PhantomData,
        })
    }

    pub(crate) fn from_state(max_features: usize, state: FittedState) -> Result<Self> {
        let mut vectorizer = Self::new(max_features)?;
        vectorizer.fitted = Some(state);
        Ok(vectorizer)
    }

    /// Learn vocabulary and IDF from `documents`, replacing any previous fit.
    /// Returns one vector per document, index-aligned with the input.
    pub fn fit<S>(&mut self, documents: &[S]) -> Result<Vec<TFVector>>
    where
        S: AsRef<str> + Sync,
    {
        if documents.iter().all(|doc| doc.as_ref().trim().is_empty()) {
            return Err(Error::Config(
                "cannot fit on a corpus without any non-empty document".to_string(),
            ));
        }

        let freqs: Vec<TermFrequency> = documents
            .par_iter()
            .map(|doc| analyze(doc.as_ref()))
            .collect();

        let mut corpus = Corpus::new();
        for freq in &freqs {
            corpus.add_doc(freq);
        }
        debug!(distinct_terms = corpus.vocab_size(), "corpus statistics collected");

        let vocabulary: IndexSet<String> = corpus.top_terms(self.max_features).into_iter().collect();
        if vocabulary.is_empty() {
            return Err(Error::Config(
                "empty vocabulary; documents contain only stop words".to_string(),
            ));
        }
        let idf = E::idf_vec(&corpus, &vocabulary);

        let vectors: Vec<TFVector> = freqs
            .par_iter()
            .map(|freq| E::tf_vec(freq, &vocabulary, &idf))
            .collect();

        info!(
            documents = documents.len(),
            vocab_size = vocabulary.len(),
            max_features = self.max_features,
            "vectorizer fitted"
        );
        self.fitted = Some(FittedState {
            vocabulary,
            idf,
            doc_num: corpus.get_doc_num(),
        });
        Ok(vectors)
    }

    /// Vectorize `text` with the fitted vocabulary.
    /// Out-of-vocabulary terms are dropped silently.
    pub fn transform(&self, text: &str) -> Result<TFVector> {
        let state = self.state()?;
        Ok(E::tf_vec(&analyze(text), &state.vocabulary, &state.idf))
    }

    /// `transform` over many texts in parallel, order preserved
    pub fn transform_batch<S>(&self, texts: &[S]) -> Result<Vec<TFVector>>
    where
        S: AsRef<str> + Sync,
    {
        let state = self.state()?;
        Ok(texts
            .par_iter()
            .map(|text| E::tf_vec(&analyze(text.as_ref()), &state.vocabulary, &state.idf))
            .collect())
    }

    #[inline]
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    #[inline]
    pub fn max_features(&self) -> usize {
        self.max_features
    }

    pub fn vocabulary(&self) -> Result<&IndexSet<String>> {
        Ok(&self.state()?.vocabulary)
    }

    /// 0 before fitting
    pub fn vocab_size(&self) -> usize {
        self.fitted.as_ref().map_or(0, |s| s.vocabulary.len())
    }

    /// Dimension of `term`, if it is in the vocabulary
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.fitted.as_ref()?.vocabulary.get_index_of(term)
    }

    pub fn idf_of(&self, term: &str) -> Option<f64> {
        let state = self.fitted.as_ref()?;
        state.vocabulary.get_index_of(term).map(|idx| state.idf[idx])
    }

    /// Number of documents seen by `fit`
    pub fn fitted_doc_num(&self) -> Option<u64> {
        self.fitted.as_ref().map(|s| s.doc_num)
    }

    pub(crate) fn state(&self) -> Result<&FittedState> {
        self.fitted.as_ref().ok_or(Error::NotFitted)
    }
}
