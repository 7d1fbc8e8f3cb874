//! Job market views over the corpus: filtering, headline numbers, trends
//! and CSV export of a filtered subset.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Write;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::Result;
use crate::store::JobPosting;

/// Empty sets mean "no restriction"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketFilter {
    pub categories: BTreeSet<String>,
    pub countries: BTreeSet<String>,
    /// inclusive on both ends
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl MarketFilter {
    pub fn matches(&self, posting: &JobPosting) -> bool {
        if !self.categories.is_empty() && !self.categories.contains(&posting.category) {
            return false;
        }
        if !self.countries.is_empty() && !self.countries.contains(&posting.country) {
            return false;
        }
        match (self.date_range, posting.published_date) {
            (None, _) => true,
            (Some((from, to)), Some(date)) => from <= date && date <= to,
            (Some(_), None) => false,
        }
    }

    pub fn apply<'a>(&self, postings: &'a [JobPosting]) -> Vec<&'a JobPosting> {
        postings.iter().filter(|p| self.matches(p)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyInsights {
    pub total_postings: usize,
    /// mean over postings that have a rate; 0 when none do
    pub average_hourly_rate: f64,
    pub top_category: Option<String>,
}

impl KeyInsights {
    pub fn from_postings(postings: &[&JobPosting]) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for p in postings {
            *counts.entry(p.category.as_str()).or_insert(0) += 1;
        }
        // highest count, then smallest name
        let top_category = counts
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(name, _)| name.to_string());

        Self {
            total_postings: postings.len(),
            average_hourly_rate: mean_rate(postings.iter().copied()).unwrap_or(0.0),
            top_category,
        }
    }
}

fn mean_rate<'a>(postings: impl Iterator<Item = &'a JobPosting>) -> Option<f64> {
    let (sum, n) = postings
        .filter_map(|p| p.hourly_rate)
        .fold((0.0, 0usize), |(sum, n), r| (sum + r, n + 1));
    (n > 0).then(|| sum / n as f64)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthStats {
    pub year: i32,
    pub month: u32,
    pub postings: usize,
    pub average_hourly_rate: Option<f64>,
}

/// Posting count and mean rate per calendar month, oldest first.
/// Postings without a date are skipped.
pub fn monthly_trends(postings: &[&JobPosting]) -> Vec<MonthStats> {
    let mut by_month: BTreeMap<(i32, u32), Vec<&JobPosting>> = BTreeMap::new();
    for p in postings {
        if let Some(date) = p.published_date {
            by_month.entry((date.year(), date.month())).or_default().push(p);
        }
    }
    by_month
        .into_iter()
        .map(|((year, month), group)| MonthStats {
            year,
            month,
            postings: group.len(),
            average_hourly_rate: mean_rate(group.into_iter()),
        })
        .collect()
}

/// Mean hourly rate per country, by country name.
/// Countries with no rated posting are left out.
pub fn average_rate_by_country(postings: &[&JobPosting]) -> Vec<(String, f64)> {
    let mut by_country: BTreeMap<&str, Vec<&JobPosting>> = BTreeMap::new();
    for p in postings {
        by_country.entry(p.country.as_str()).or_default().push(p);
    }
    by_country
        .into_iter()
        .filter_map(|(country, group)| mean_rate(group.into_iter()).map(|r| (country.to_string(), r)))
        .collect()
}

#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "job_description")]
    description: &'a str,
    #[serde(rename = "Cleaned Job Title")]
    title: &'a str,
    #[serde(rename = "Category")]
    category: &'a str,
    country: &'a str,
    average_hourly_rate: Option<f64>,
    link: &'a str,
    published_date: Option<String>,
}

const EXPORT_HEADER: [&str; 7] = [
    "job_description",
    "Cleaned Job Title",
    "Category",
    "country",
    "average_hourly_rate",
    "link",
    "published_date",
];

/// Write postings as CSV with the same column names the corpus is read from.
/// The header row is written even when `postings` is empty.
pub fn export_csv<W: Write>(postings: &[&JobPosting], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(EXPORT_HEADER)?;
    for p in postings {
        wtr.serialize(ExportRow {
            description: &p.description,
            title: &p.title,
            category: &p.category,
            country: &p.country,
            average_hourly_rate: p.hourly_rate,
            link: &p.link,
            published_date: p.published_date.map(|d| d.format("%Y-%m-%d").to_string()),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JobCorpus;
    use std::path::Path;

    fn posting(id: usize, category: &str, country: &str, rate: Option<f64>, date: Option<(i32, u32, u32)>) -> JobPosting {
        JobPosting {
            id,
            description: format!("job {id}"),
            title: format!("Title {id}"),
            category: category.to_string(),
            country: country.to_string(),
            hourly_rate: rate,
            link: format!("https://x/{id}"),
            published_date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        }
    }

    fn sample() -> Vec<JobPosting> {
        vec![
            posting(0, "IT", "Germany", Some(40.0), Some((2024, 1, 10))),
            posting(1, "IT", "France", Some(20.0), Some((2024, 1, 25))),
            posting(2, "Design", "France", None, Some((2024, 2, 3))),
            posting(3, "Design", "Germany", Some(30.0), None),
        ]
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let postings = sample();
        assert_eq!(MarketFilter::default().apply(&postings).len(), 4);
    }

    #[test]
    fn filters_combine() {
        let postings = sample();
        let filter = MarketFilter {
            categories: set(&["IT"]),
            countries: set(&["France"]),
            date_range: None,
        };
        let ids: Vec<usize> = filter.apply(&postings).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn date_range_excludes_undated() {
        let postings = sample();
        let filter = MarketFilter {
            date_range: Some((
                NaiveDate::from_ymd_opt(2024, 1, 25).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 3).unwrap(),
            )),
            ..MarketFilter::default()
        };
        let ids: Vec<usize> = filter.apply(&postings).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn insights_average_only_rated_postings() {
        let postings = sample();
        let all = MarketFilter::default().apply(&postings);
        let insights = KeyInsights::from_postings(&all);
        assert_eq!(insights.total_postings, 4);
        assert_eq!(insights.average_hourly_rate, 30.0);
        // IT and Design tie at two postings each
        assert_eq!(insights.top_category.as_deref(), Some("Design"));
    }

    #[test]
    fn insights_of_nothing() {
        let insights = KeyInsights::from_postings(&[]);
        assert_eq!(insights.total_postings, 0);
        assert_eq!(insights.average_hourly_rate, 0.0);
        assert_eq!(insights.top_category, None);
    }

    #[test]
    fn monthly_trends_group_by_month() {
        let postings = sample();
        let all = MarketFilter::default().apply(&postings);
        let trends = monthly_trends(&all);
        assert_eq!(trends.len(), 2);
        assert_eq!((trends[0].year, trends[0].month, trends[0].postings), (2024, 1, 2));
        assert_eq!(trends[0].average_hourly_rate, Some(30.0));
        assert_eq!(trends[1].average_hourly_rate, None);
    }

    #[test]
    fn country_rates_are_sorted() {
        let postings = sample();
        let all = MarketFilter::default().apply(&postings);
        assert_eq!(
            average_rate_by_country(&all),
            vec![("France".to_string(), 20.0), ("Germany".to_string(), 35.0)]
        );
    }

    #[test]
    fn exported_csv_reads_back_as_corpus() {
        let postings = sample();
        let all = MarketFilter::default().apply(&postings);
        let mut buf = Vec::new();
        export_csv(&all, &mut buf).unwrap();

        let corpus = JobCorpus::from_reader(buf.as_slice(), Path::new("export.csv")).unwrap();
        assert_eq!(corpus.len(), 4);
        assert_eq!(corpus.postings()[2].category, "Design");
        assert_eq!(corpus.postings()[2].hourly_rate, None);
        assert_eq!(corpus.postings()[0].published_date, postings[0].published_date);
    }

    #[test]
    fn empty_export_still_has_header() {
        let mut buf = Vec::new();
        export_csv(&[], &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, format!("{}\n", EXPORT_HEADER.join(",")));
        let corpus = JobCorpus::from_reader(text.as_bytes(), Path::new("empty.csv")).unwrap();
        assert!(corpus.is_empty());
    }
}
