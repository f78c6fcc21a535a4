//! Store seams for the report.
//!
//! The pipeline only talks to these traits, so the same run works against
//! PostgreSQL/MongoDB or against the in-memory stores in `memory`.

use crate::error::Result;
use domain::{MovieTop, TableMode, TagDocument, TopRatedQuery};
use std::future::Future;

/// Relational side: ratings and the derived table built from them.
pub trait RatingStore: Send {
    /// Build `table` from the ratings, keeping movies whose average is
    /// strictly greater than `min_avg_rating`.
    ///
    /// # Returns
    /// * `Ok(n)` - Number of rows written to the derived table
    /// * `Err(SourceError::TableExists)` - `mode` is `FailIfExists` and the table is there
    fn materialize_top(
        &mut self,
        table: &str,
        min_avg_rating: f64,
        mode: TableMode,
    ) -> impl Future<Output = Result<u64>> + Send;

    /// The first `limit` rows of `table`, in storage order
    fn sample(&self, table: &str, limit: usize) -> impl Future<Output = Result<Vec<MovieTop>>> + Send;

    /// Rows of `table` passing `query`, highest average first
    fn top_rated(
        &self,
        table: &str,
        query: &TopRatedQuery,
    ) -> impl Future<Output = Result<Vec<MovieTop>>> + Send;
}

/// Document side: the tag collection.
pub trait TagStore: Send + Sync {
    /// Documents whose `movieId` is one of `movie_ids`
    fn find_by_movie_ids(
        &self,
        movie_ids: &[String],
    ) -> impl Future<Output = Result<Vec<TagDocument>>> + Send;

    /// Every document in the collection
    fn find_all(&self) -> impl Future<Output = Result<Vec<TagDocument>>> + Send;
}
