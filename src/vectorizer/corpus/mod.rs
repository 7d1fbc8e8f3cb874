use std::cmp::Reverse;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::vectorizer::term::TermFrequency;

/// Corpus-wide term statistics gathered while fitting.
/// It does not keep document text, only:
/// - the number of documents
/// - per term, the number of documents containing it (document frequency)
/// - per term, the total number of occurrences across all documents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    doc_num: u64,
    #[serde(with = "indexmap::map::serde_seq")]
    doc_freq: IndexMap<String, u64>,
    #[serde(with = "indexmap::map::serde_seq")]
    term_total: IndexMap<String, u64>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one document's terms
    pub fn add_doc(&mut self, freq: &TermFrequency) {
        self.doc_num += 1;
        for (term, count) in freq.iter() {
            *self.doc_freq.entry(term.to_string()).or_insert(0) += 1;
            *self.term_total.entry(term.to_string()).or_insert(0) += count;
        }
    }

    #[inline]
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Number of documents containing `term`
    #[inline]
    pub fn get_term_count(&self, term: &str) -> u64 {
        self.doc_freq.get(term).copied().unwrap_or(0)
    }

    /// Number of distinct terms
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.doc_freq.len()
    }

    /// The `limit` most frequent terms by total corpus count,
    /// ties broken by term order, returned in lexicographic order.
    pub fn top_terms(&self, limit: usize) -> Vec<String> {
        let mut ranked: Vec<(&str, u64)> = self
            .term_total
            .iter()
            .map(|(term, &count)| (term.as_str(), count))
            .collect();
        ranked.sort_unstable_by_key(|&(term, count)| (Reverse(count), term));
        ranked.truncate(limit);

        let mut terms: Vec<String> = ranked.into_iter().map(|(t, _)| t.to_string()).collect();
        terms.sort_unstable();
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus_of(docs: &[&[&str]]) -> Corpus {
        let mut corpus = Corpus::new();
        for doc in docs {
            corpus.add_doc(&TermFrequency::from(*doc));
        }
        corpus
    }

    #[test]
    fn doc_freq_counts_documents_not_occurrences() {
        let corpus = corpus_of(&[&["data", "data", "clerk"], &["data", "scientist"]]);
        assert_eq!(corpus.get_doc_num(), 2);
        assert_eq!(corpus.get_term_count("data"), 2);
        assert_eq!(corpus.get_term_count("clerk"), 1);
        assert_eq!(corpus.get_term_count("absent"), 0);
        assert_eq!(corpus.vocab_size(), 3);
    }

    #[test]
    fn top_terms_cuts_by_frequency_then_sorts() {
        let corpus = corpus_of(&[&["zeta", "zeta", "zeta", "beta", "beta", "alpha", "gamma"]]);
        assert_eq!(corpus.top_terms(2), vec!["beta", "zeta"]);
        // alpha and gamma tie on count; alpha wins the last slot
        assert_eq!(corpus.top_terms(3), vec!["alpha", "beta", "zeta"]);
        assert_eq!(corpus.top_terms(100).len(), 4);
    }
}
