//! `movie-tags` -- top tags of the best-rated movies.
//!
//! Aggregates ratings in PostgreSQL, looks up the tags of the top-rated
//! movies in MongoDB and ranks those tags across the whole tag collection.
//! Connection settings come from the environment (see `domain::config`);
//! a `.env` file in the working directory is loaded first.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use domain::{MongoConfig, PostgresConfig, TableMode, TagCount, Thresholds};
use pipeline::TagReportPipeline;
use sources::{MongoTagStore, PostgresRatingStore};
use std::time::Instant;
use tracing::info;

/// Movie tag report - popular tags of top-rated movies
#[derive(Parser, Debug)]
#[command(name = "movie-tags")]
#[command(about = "Join Postgres ratings with MongoDB tags and rank the most popular tags", long_about = None)]
struct Cli {
    /// Name of the derived ratings table
    #[arg(long)]
    table: Option<String>,

    /// Keep movies averaging strictly more than this in the derived table
    #[arg(long)]
    min_avg_rating: Option<f64>,

    /// Fail instead of replacing an existing derived table
    #[arg(long)]
    fail_if_exists: bool,

    /// Rows of the derived table to log
    #[arg(long)]
    sample_rows: Option<usize>,

    /// Top-rated movies need strictly more ratings than this
    #[arg(long)]
    top_min_count: Option<f64>,

    /// Top-rated movies need a strictly higher average than this
    #[arg(long)]
    top_min_avg: Option<f64>,

    /// Number of top-rated movies whose tags are looked up
    #[arg(long)]
    top_limit: Option<usize>,

    /// Number of top-rated movies to log
    #[arg(long)]
    preview: Option<usize>,

    /// Rows in the final tag ranking
    #[arg(long)]
    tags_limit: Option<usize>,
}

impl Cli {
    /// Command-line overrides on top of the default thresholds
    fn thresholds(&self) -> Thresholds {
        let defaults = Thresholds::default();

        Thresholds {
            table: self.table.clone().unwrap_or(defaults.table),
            table_mode: if self.fail_if_exists {
                TableMode::FailIfExists
            } else {
                TableMode::Replace
            },
            min_avg_rating: self.min_avg_rating.unwrap_or(defaults.min_avg_rating),
            sample_rows: self.sample_rows.unwrap_or(defaults.sample_rows),
            top_min_count: self.top_min_count.unwrap_or(defaults.top_min_count),
            top_min_avg: self.top_min_avg.unwrap_or(defaults.top_min_avg),
            top_limit: self.top_limit.unwrap_or(defaults.top_limit),
            preview: self.preview.unwrap_or(defaults.preview),
            tags_limit: self.tags_limit.unwrap_or(defaults.tags_limit),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let thresholds = cli.thresholds();

    let postgres = PostgresConfig::from_env().context("Invalid Postgres settings")?;
    let mongo = MongoConfig::from_env().context("Invalid MongoDB settings")?;

    let start = Instant::now();
    let ratings = PostgresRatingStore::connect(&postgres)
        .await
        .context("Failed to connect to Postgres")?;
    let tags = MongoTagStore::connect(&mongo).context("Failed to set up MongoDB client")?;

    let mut pipeline = TagReportPipeline::new(ratings, tags, thresholds);
    let report = pipeline.run().await?;

    print_ranking(&report.top_tags);
    println!("{} Report done in {:?}", "✓".green(), start.elapsed());
    info!("All steps completed");

    Ok(())
}

/// Print the ranking as a two-column table
fn print_ranking(ranking: &[TagCount]) {
    println!("{}", "Most popular tags of top-rated movies:".bold().blue());
    println!("{:<4} {:<24} {:>8}", "", "tags".bold(), "count".bold());

    if ranking.is_empty() {
        println!("{}", "  (no tags found)".yellow());
        return;
    }

    for (rank, row) in ranking.iter().enumerate() {
        println!(
            "{:<4} {:<24} {:>8}",
            (rank + 1).to_string().green(),
            row.tag,
            row.count
        );
    }
}
