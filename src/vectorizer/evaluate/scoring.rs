use std::fmt::{self, Debug};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::vectorizer::TFVector;

/// One ranked document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEntry {
    /// position of the document in the corpus
    pub index: usize,
    /// cosine similarity in [0, 1]
    pub score: f64,
}

/// Ranked search results
#[derive(Clone, PartialEq, Default)]
pub struct Hits {
    pub list: Vec<HitEntry>,
}

impl Hits {
    /// One entry per score, in corpus order
    pub fn from_scores(scores: &[f64]) -> Self {
        Hits {
            list: scores
                .iter()
                .enumerate()
                .map(|(index, &score)| HitEntry { index, score })
                .collect(),
        }
    }

    /// Sort by descending score.
    /// The sort is stable, so equal scores keep corpus order. NaN scores are removed.
    pub fn sort_by_score(&mut self) -> &mut Self {
        self.list.retain(|h| !h.score.is_nan());
        self.list.sort_by(|a, b| b.score.total_cmp(&a.score));
        self
    }

    pub fn truncate(&mut self, k: usize) -> &mut Self {
        self.list.truncate(k);
        self
    }

    /// Remove documents sharing no weighted term with the query
    pub fn drop_zero_scores(&mut self) -> &mut Self {
        self.list.retain(|h| h.score > 0.0);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HitEntry> {
        self.list.iter()
    }
}

impl Debug for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // one hit per line
            writeln!(f, "Hits [")?;
            for hit in &self.list {
                writeln!(f, "    #{}: {:.6}", hit.index, hit.score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list()
                .entries(self.list.iter().map(|h| (h.index, h.score)))
                .finish()
        }
    }
}

/// Cosine similarity of `query` against every document.
/// cosθ = A・B / (|A||B|), 0 when either side has zero magnitude.
/// Output is index-aligned with `documents`.
pub fn score(query: &TFVector, documents: &[TFVector]) -> Vec<f64> {
    documents
        .par_iter()
        // rounding can push identical vectors a hair past 1.0
        .map(|doc| query.cosine(doc).clamp(0.0, 1.0))
        .collect()
}

/// The `k` best scores, descending, ties in corpus order.
/// Returns every document when there are fewer than `k`.
pub fn top_k(scores: &[f64], k: usize) -> Result<Hits> {
    if k == 0 {
        return Err(Error::Config("k must be greater than 0".to_string()));
    }
    let mut hits = Hits::from_scores(scores);
    hits.sort_by_score().truncate(k);
    Ok(hits)
}
