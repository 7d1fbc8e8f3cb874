use indexmap::IndexSet;

use crate::{
    utils::math::vector::ZeroSpVec,
    vectorizer::{corpus::Corpus, term::TermFrequency},
};

/// TF-IDF weighting strategy.
/// The vectorizer only talks to weights through this trait, so a different
/// scheme can be plugged into `TFIDFVectorizer<E>`.
pub trait TFIDFEngine {
    /// IDF weight per vocabulary position
    ///
    /// # Arguments
    /// * `corpus` - statistics of the fitted corpus
    /// * `vocabulary` - ordered vocabulary; output is index-aligned with it
    fn idf_vec(corpus: &Corpus, vocabulary: &IndexSet<String>) -> Vec<f64>;

    /// Weighted sparse vector of one analyzed text.
    /// Terms outside `vocabulary` are ignored.
    fn tf_vec(freq: &TermFrequency, vocabulary: &IndexSet<String>, idf: &[f64]) -> ZeroSpVec<f64>;
}

/// Smoothed TF-IDF with L2 normalisation
///
/// - `tf(t, d)` = raw count of t in d
/// - `idf(t)` = ln((1 + n) / (1 + df(t))) + 1
/// - the product vector is scaled to unit length (zero vectors stay zero)
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl TFIDFEngine for DefaultTFIDFEngine {
    fn idf_vec(corpus: &Corpus, vocabulary: &IndexSet<String>) -> Vec<f64> {
        let doc_num = corpus.get_doc_num() as f64;
        vocabulary
            .iter()
            .map(|term| {
                let doc_freq = corpus.get_term_count(term) as f64;
                ((1.0 + doc_num) / (1.0 + doc_freq)).ln() + 1.0
            })
            .collect()
    }

    fn tf_vec(freq: &TermFrequency, vocabulary: &IndexSet<String>, idf: &[f64]) -> ZeroSpVec<f64> {
        let pairs = freq.iter().filter_map(|(term, count)| {
            vocabulary
                .get_index_of(term)
                .map(|idx| (idx, count as f64 * idf[idx]))
        });
        let mut vec = ZeroSpVec::from_pairs(vocabulary.len(), pairs);
        vec.l2_normalize();
        vec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(terms: &[&str]) -> IndexSet<String> {
        terms.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn idf_is_smoothed_and_one_for_ubiquitous_terms() {
        let mut corpus = Corpus::new();
        corpus.add_doc(&TermFrequency::from(&["data", "clerk"][..]));
        corpus.add_doc(&TermFrequency::from(&["data", "scientist"][..]));
        let idf = DefaultTFIDFEngine::idf_vec(&corpus, &vocab(&["clerk", "data", "unseen"]));
        assert!((idf[0] - ((3.0_f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
        assert_eq!(idf[1], 1.0);
        assert!((idf[2] - (3.0_f64.ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn tf_vec_drops_unknown_terms_and_normalises() {
        let v = vocab(&["data", "scientist"]);
        let freq = TermFrequency::from(&["data", "data", "underwater"][..]);
        let vec = DefaultTFIDFEngine::tf_vec(&freq, &v, &[1.0, 2.0]);
        assert_eq!(vec.len(), 2);
        assert_eq!(vec.nnz(), 1);
        assert_eq!(vec.get(0), Some(1.0));
    }

    #[test]
    fn tf_vec_of_unknown_text_is_zero() {
        let v = vocab(&["data"]);
        let freq = TermFrequency::from(&["basket"][..]);
        let vec = DefaultTFIDFEngine::tf_vec(&freq, &v, &[1.0]);
        assert_eq!(vec.nnz(), 0);
    }
}
