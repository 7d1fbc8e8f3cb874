use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use job_recommender::{
    market::{self, KeyInsights, MarketFilter},
    training, AppConfig, Error, JobCorpus, Recommender,
};

#[derive(Parser, Debug)]
#[command(name = "job-recommender", version, about = "TF-IDF job posting recommender")]
struct Cli {
    /// Job postings CSV (overrides config)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Model artifact path (overrides config)
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fit the vectorizer on the corpus and save the model
    Train {
        #[arg(long)]
        max_features: Option<usize>,
        /// Skip the experiment log
        #[arg(long)]
        no_experiment: bool,
    },
    /// Recommend postings for a job title or description
    Recommend {
        query: String,
        #[arg(long, short = 'k')]
        top_k: Option<usize>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Key numbers, monthly trends and rates by country
    Insights(FilterArgs),
    /// Write the filtered postings as CSV
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        /// Output file; stdout when omitted
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct FilterArgs {
    #[arg(long = "category")]
    categories: Vec<String>,
    #[arg(long = "country")]
    countries: Vec<String>,
    /// First published date, YYYY-MM-DD
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last published date, YYYY-MM-DD
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl FilterArgs {
    fn into_filter(self) -> anyhow::Result<MarketFilter> {
        let date_range = match (self.from, self.to) {
            (None, None) => None,
            (from, to) => {
                let from = from.unwrap_or(NaiveDate::MIN);
                let to = to.unwrap_or(NaiveDate::MAX);
                if from > to {
                    bail!("--from {} is after --to {}", from, to);
                }
                Some((from, to))
            }
        };
        Ok(MarketFilter {
            categories: self.categories.into_iter().collect::<BTreeSet<_>>(),
            countries: self.countries.into_iter().collect::<BTreeSet<_>>(),
            date_range,
        })
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = AppConfig::load().context("loading configuration")?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    if let Some(model) = cli.model {
        config.model_path = model;
    }

    match cli.command {
        Command::Train { max_features, no_experiment } => {
            if let Some(n) = max_features {
                config.max_features = n;
            }
            if no_experiment {
                config.experiment_log = None;
            }
            let report = training::train(&config)?;
            println!("Data loaded: {} rows.", report.corpus_size);
            println!(
                "TF-IDF model trained and saved to {} ({} terms).",
                report.model_path.display(),
                report.vocab_size
            );
            if !report.smoke_results.is_empty() {
                println!("Top Recommendations:");
                for rec in &report.smoke_results {
                    println!("{rec}");
                }
            }
        }
        Command::Recommend { query, top_k, json } => {
            if let Some(k) = top_k {
                config.top_k = k;
            }
            let recommender = Recommender::open(&config)?;
            match recommender.recommend(&query) {
                Ok(recs) if json => println!("{}", serde_json::to_string_pretty(&recs)?),
                Ok(recs) if recs.is_empty() => println!("No recommendations found."),
                Ok(recs) => {
                    println!("Top Recommendations:");
                    for rec in &recs {
                        println!("{rec}\n---");
                    }
                }
                Err(Error::InvalidQuery(_)) => println!("Please enter a job title or description."),
                Err(err) => return Err(err.into()),
            }
        }
        Command::Insights(filter) => {
            let filter = filter.into_filter()?;
            let corpus = JobCorpus::load_csv(&config.data_path)?;
            let selected = filter.apply(corpus.postings());

            let insights = KeyInsights::from_postings(&selected);
            println!("Total Job Postings: {}", insights.total_postings);
            println!("Average Hourly Rate: ${:.2}", insights.average_hourly_rate);
            println!("Most Popular Category: {}", insights.top_category.as_deref().unwrap_or("N/A"));

            println!("\nTrends Over Time:");
            for m in market::monthly_trends(&selected) {
                let rate = m.average_hourly_rate.map_or("n/a".to_string(), |r| format!("${r:.2}"));
                println!("  {}-{:02}: {} postings, avg {}", m.year, m.month, m.postings, rate);
            }

            println!("\nAverage Hourly Rate by Country:");
            for (country, rate) in market::average_rate_by_country(&selected) {
                println!("  {country}: ${rate:.2}");
            }
        }
        Command::Export { filter, out } => {
            let filter = filter.into_filter()?;
            let corpus = JobCorpus::load_csv(&config.data_path)?;
            let selected = filter.apply(corpus.postings());
            match out {
                Some(path) => {
                    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
                    market::export_csv(&selected, BufWriter::new(file))?;
                    eprintln!("Exported {} postings to {}", selected.len(), path.display());
                }
                None => {
                    let stdout = io::stdout();
                    let mut lock = stdout.lock();
                    market::export_csv(&selected, &mut lock)?;
                    lock.flush()?;
                }
            }
        }
    }
    Ok(())
}
