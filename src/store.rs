//! Job posting corpus loaded from CSV.
//!
//! Rows whose description is missing or blank are dropped before anything
//! is fitted or scored. Each kept posting remembers its 0-based data row in
//! the source file as a stable id.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct JobPosting {
    pub id: usize,
    pub description: String,
    pub title: String,
    pub category: String,
    pub country: String,
    pub hourly_rate: Option<f64>,
    pub link: String,
    pub published_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct RawPosting {
    #[serde(rename = "job_description", default)]
    description: Option<String>,
    #[serde(rename = "Cleaned Job Title", default)]
    title: Option<String>,
    #[serde(rename = "Category", default)]
    category: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(
        rename = "average_hourly_rate",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    hourly_rate: Option<f64>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    published_date: Option<String>,
}

impl RawPosting {
    fn into_posting(self, id: usize) -> Option<JobPosting> {
        let description = self.description.filter(|d| !d.trim().is_empty())?;
        Some(JobPosting {
            id,
            description,
            title: self.title.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            hourly_rate: self.hourly_rate.filter(|r| r.is_finite()),
            link: self.link.unwrap_or_default(),
            published_date: self.published_date.as_deref().and_then(parse_date),
        })
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[+offset]` and plain `YYYY-MM-DD`.
/// Time zones are dropped; only the calendar date is kept.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    raw.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

/// Ordered, read-only collection of postings with non-empty descriptions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobCorpus {
    postings: Vec<JobPosting>,
}

impl JobCorpus {
    #[tracing::instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load_csv(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::corpus_load(path, e))?;
        Self::from_reader(file, path)
    }

    /// `origin` only labels errors and logs
    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);

        let mut postings = Vec::new();
        let mut dropped = 0usize;
        for (row, record) in rdr.deserialize::<RawPosting>().enumerate() {
            let raw = record.map_err(|e| Error::corpus_load(origin, format!("row {}: {}", row, e)))?;
            match raw.into_posting(row) {
                Some(posting) => postings.push(posting),
                None => {
                    debug!(row, "dropping posting without description");
                    dropped += 1;
                }
            }
        }
        info!(kept = postings.len(), dropped, "corpus loaded");
        Ok(Self { postings })
    }

    /// Build from in-memory postings; blank descriptions are dropped
    pub fn from_postings(postings: Vec<JobPosting>) -> Self {
        Self {
            postings: postings
                .into_iter()
                .filter(|p| !p.description.trim().is_empty())
                .collect(),
        }
    }

    #[inline]
    pub fn postings(&self) -> &[JobPosting] {
        &self.postings
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&JobPosting> {
        self.postings.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Description texts in corpus order
    pub fn descriptions(&self) -> Vec<&str> {
        self.postings.iter().map(|p| p.description.as_str()).collect()
    }
}
