//! # Tag Report Orchestrator
//!
//! Runs the report from start to finish:
//! 1. Aggregate ratings into the derived table
//! 2. Log a sample of the derived table
//! 3. Select the top-rated movies
//! 4. Look up their tags in the document store
//! 5. Count those tags among themselves
//! 6. Rank them across the whole tag collection
//!
//! Each step waits for the previous one. Nothing is retried: the first
//! failing step ends the run with its context attached.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};

use domain::{MovieTop, TagCount, TagDocument, Thresholds};
use sources::{RatingStore, TagStore};

use crate::ranking;
use crate::selection::{movie_id_keys, tag_names};

/// Documents shown in the tag lookup log line
const LOGGED_DOCUMENTS: usize = 5;

/// Everything one report run produced
#[derive(Debug, Clone, PartialEq)]
pub struct TagReport {
    /// Rows written to the derived table
    pub movies_top_rows: u64,
    /// Leading rows of the derived table
    pub sample: Vec<MovieTop>,
    /// Top-rated movies, highest average first
    pub top_rated: Vec<MovieTop>,
    /// Tag documents of the top-rated movies
    pub tag_documents: Vec<TagDocument>,
    /// Tag frequencies among the top-rated movies only
    pub top_movie_tag_counts: Vec<TagCount>,
    /// Tags of the top-rated movies ranked across the whole collection
    pub top_tags: Vec<TagCount>,
}

/// Coordinates a rating store and a tag store through one report run
pub struct TagReportPipeline<R, T> {
    ratings: R,
    tags: T,
    thresholds: Thresholds,
}

impl<R: RatingStore, T: TagStore> TagReportPipeline<R, T> {
    pub fn new(ratings: R, tags: T, thresholds: Thresholds) -> Self {
        Self {
            ratings,
            tags,
            thresholds,
        }
    }

    pub fn ratings(&self) -> &R {
        &self.ratings
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Run every step in order and collect the results
    pub async fn run(&mut self) -> Result<TagReport> {
        let start_time = Instant::now();

        let movies_top_rows = self.build_movies_top().await?;
        let sample = self.sample_movies_top().await?;
        let top_rated = self.select_top_rated().await?;
        let tag_documents = self.lookup_tags(&top_rated).await?;
        let top_movie_tag_counts = self.count_top_movie_tags(&tag_documents)?;
        let top_tags = self.rank_tags(&tag_documents).await?;

        info!("Report finished in {:.2?}", start_time.elapsed());

        Ok(TagReport {
            movies_top_rows,
            sample,
            top_rated,
            tag_documents,
            top_movie_tag_counts,
            top_tags,
        })
    }

    async fn build_movies_top(&mut self) -> Result<u64> {
        let table = &self.thresholds.table;
        info!(
            "Building {} from ratings (avg > {}, {:?})",
            table, self.thresholds.min_avg_rating, self.thresholds.table_mode
        );

        let written = self
            .ratings
            .materialize_top(table, self.thresholds.min_avg_rating, self.thresholds.table_mode)
            .await
            .with_context(|| format!("Failed to build table {}", table))?;

        info!("Wrote {} rows to {}", written, table);
        Ok(written)
    }

    async fn sample_movies_top(&self) -> Result<Vec<MovieTop>> {
        let table = &self.thresholds.table;
        let sample = self
            .ratings
            .sample(table, self.thresholds.sample_rows)
            .await
            .with_context(|| format!("Failed to read table {}", table))?;

        info!(
            "Rows of {} (movieid, ratings_num, ratings_avg):\n{}",
            table,
            format_rows(&sample)
        );
        Ok(sample)
    }

    async fn select_top_rated(&self) -> Result<Vec<MovieTop>> {
        let query = self.thresholds.top_rated_query();
        let top_rated = self
            .ratings
            .top_rated(&self.thresholds.table, &query)
            .await
            .context("Failed to select top-rated movies")?;

        if top_rated.is_empty() {
            warn!(
                "No movie has more than {} ratings averaging above {}",
                query.min_count, query.min_avg
            );
        }

        let preview = &top_rated[..top_rated.len().min(self.thresholds.preview)];
        info!("Top-rated movies:\n{}", format_rows(preview));
        Ok(top_rated)
    }

    async fn lookup_tags(&self, top_rated: &[MovieTop]) -> Result<Vec<TagDocument>> {
        let keys = movie_id_keys(top_rated);
        info!("Looking up tags for movies {:?}", keys);

        let documents = self
            .tags
            .find_by_movie_ids(&keys)
            .await
            .context("Failed to look up tags of top-rated movies")?;

        if documents.is_empty() && !keys.is_empty() {
            warn!("None of the top-rated movies has tags");
        }

        info!(
            "Tag documents ({} total): {:?}",
            documents.len(),
            &documents[..documents.len().min(LOGGED_DOCUMENTS)]
        );
        info!("Tags of popular movies: {:?}", tag_names(&documents));
        Ok(documents)
    }

    fn count_top_movie_tags(&self, documents: &[TagDocument]) -> Result<Vec<TagCount>> {
        let counts = ranking::tag_counts(documents).context("Failed to count tags")?;

        info!("Tag counts among top-rated movies:\n{}", format_counts(&counts));
        Ok(counts)
    }

    async fn rank_tags(&self, documents: &[TagDocument]) -> Result<Vec<TagCount>> {
        let corpus = self
            .tags
            .find_all()
            .await
            .context("Failed to read the tag collection")?;
        info!("Read {} tag documents for ranking", corpus.len());

        let ranked = ranking::top_tags(documents, &corpus, self.thresholds.tags_limit)
            .context("Failed to rank tags")?;

        info!(
            "Top {} tags:\n{}",
            self.thresholds.tags_limit,
            format_counts(&ranked)
        );
        Ok(ranked)
    }
}

fn format_rows(rows: &[MovieTop]) -> String {
    rows.iter()
        .map(|row| format!("  {}", row))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_counts(counts: &[TagCount]) -> String {
    counts
        .iter()
        .map(|row| format!("  {:<20} {}", row.tag, row.count))
        .collect::<Vec<_>>()
        .join("\n")
}
