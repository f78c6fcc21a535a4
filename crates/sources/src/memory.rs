//! In-memory stores.
//!
//! Same semantics as the PostgreSQL and MongoDB stores over plain vectors.
//! Used by tests and for running the report against fixtures.

use crate::error::{Result, SourceError};
use crate::sql::{validate_identifier, validate_threshold};
use crate::traits::{RatingStore, TagStore};
use domain::{MovieId, MovieTop, Rating, TableMode, TagDocument, TopRatedQuery};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Ratings plus the derived tables built from them
#[derive(Debug, Default)]
pub struct InMemoryRatingStore {
    ratings: Vec<Rating>,
    tables: HashMap<String, Vec<MovieTop>>,
}

impl InMemoryRatingStore {
    pub fn new(ratings: Vec<Rating>) -> Self {
        Self {
            ratings,
            tables: HashMap::new(),
        }
    }

    /// Rows of a derived table, if it has been built
    pub fn table(&self, name: &str) -> Option<&[MovieTop]> {
        self.tables.get(name).map(|rows| rows.as_slice())
    }

    fn rows(&self, table: &str) -> Result<&[MovieTop]> {
        self.table(validate_identifier(table)?)
            .ok_or_else(|| SourceError::MissingTable {
                table: table.to_string(),
            })
    }
}

/// Group ratings by movie and keep movies averaging more than `min_avg_rating`.
///
/// Rows come back ordered by movie id.
pub fn aggregate_ratings(ratings: &[Rating], min_avg_rating: f64) -> Vec<MovieTop> {
    let mut by_movie: HashMap<MovieId, Vec<f64>> = HashMap::new();
    for rating in ratings {
        by_movie
            .entry(rating.movie_id)
            .or_insert_with(Vec::new)
            .push(rating.rating);
    }

    let mut rows: Vec<MovieTop> = by_movie
        .par_iter()
        .map(|(&movie_id, values)| {
            let rating_num = values.len() as f64;
            let rating_avg = values.iter().sum::<f64>() / rating_num;
            MovieTop::new(movie_id, rating_num, rating_avg)
        })
        .filter(|row| row.rating_avg > min_avg_rating)
        .collect();

    rows.sort_by_key(|row| row.movie_id);
    rows
}

/// Apply a top-rated query to derived rows
pub fn select_top_rated(rows: &[MovieTop], query: &TopRatedQuery) -> Vec<MovieTop> {
    let mut selected: Vec<MovieTop> = rows.iter().filter(|row| query.matches(row)).copied().collect();

    selected.sort_by(|a, b| {
        b.rating_avg
            .total_cmp(&a.rating_avg)
            .then_with(|| a.movie_id.cmp(&b.movie_id))
    });
    selected.truncate(query.limit);
    selected
}

impl RatingStore for InMemoryRatingStore {
    async fn materialize_top(
        &mut self,
        table: &str,
        min_avg_rating: f64,
        mode: TableMode,
    ) -> Result<u64> {
        let table = validate_identifier(table)?;
        let min_avg_rating = validate_threshold(min_avg_rating)?;

        if mode == TableMode::FailIfExists && self.tables.contains_key(table) {
            return Err(SourceError::TableExists {
                table: table.to_string(),
            });
        }

        let rows = aggregate_ratings(&self.ratings, min_avg_rating);
        let written = rows.len() as u64;
        debug!("Built {} with {} rows", table, written);

        self.tables.insert(table.to_string(), rows);
        Ok(written)
    }

    async fn sample(&self, table: &str, limit: usize) -> Result<Vec<MovieTop>> {
        Ok(self.rows(table)?.iter().take(limit).copied().collect())
    }

    async fn top_rated(&self, table: &str, query: &TopRatedQuery) -> Result<Vec<MovieTop>> {
        Ok(select_top_rated(self.rows(table)?, query))
    }
}

/// A tag collection held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryTagStore {
    documents: Vec<TagDocument>,
}

impl InMemoryTagStore {
    pub fn new(documents: Vec<TagDocument>) -> Self {
        Self { documents }
    }
}

impl TagStore for InMemoryTagStore {
    async fn find_by_movie_ids(&self, movie_ids: &[String]) -> Result<Vec<TagDocument>> {
        let keys: HashSet<&str> = movie_ids.iter().map(String::as_str).collect();

        Ok(self
            .documents
            .iter()
            .filter(|doc| keys.contains(doc.movie_id.as_str()))
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<TagDocument>> {
        Ok(self.documents.clone())
    }
}
