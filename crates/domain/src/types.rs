//! Core domain types for the movie tag report.
//!
//! Ratings live in the relational store, tags in the document store. The
//! types here are what crosses between the two:
//! - `MovieTop` rows of the derived table
//! - `TagDocument` records of the tag collection
//! - `TagCount` rows of the final ranking

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of a movie in the `ratings` table (`movieid integer`)
pub type MovieId = i32;

/// Identifier of the user who rated a movie
pub type UserId = i32;

// =============================================================================
// Relational Types
// =============================================================================

/// A single row of the `ratings` table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: f64,
}

/// A row of the derived `movies_top` table.
///
/// `rating_num` is numeric in the table, so it is carried as `f64` rather
/// than an integer count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovieTop {
    pub movie_id: MovieId,
    pub rating_num: f64,
    pub rating_avg: f64,
}

impl MovieTop {
    pub fn new(movie_id: MovieId, rating_num: f64, rating_avg: f64) -> Self {
        Self {
            movie_id,
            rating_num,
            rating_avg,
        }
    }
}

impl fmt::Display for MovieTop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(movieid={}, rating_num={}, rating_avg={})",
            self.movie_id, self.rating_num, self.rating_avg
        )
    }
}

/// What happens when the derived table already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableMode {
    /// Drop the old table and build it again
    #[default]
    Replace,
    /// Refuse to touch an existing table
    FailIfExists,
}

/// Filter and ordering applied to the derived table.
///
/// Selects rows with `rating_num > min_count` and `rating_avg > min_avg`,
/// ordered by `rating_avg` descending (ties by ascending movie id), and keeps
/// the first `limit` rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopRatedQuery {
    pub min_count: f64,
    pub min_avg: f64,
    pub limit: usize,
}

impl TopRatedQuery {
    /// Whether a row passes both thresholds
    pub fn matches(&self, row: &MovieTop) -> bool {
        row.rating_num > self.min_count && row.rating_avg > self.min_avg
    }
}

// =============================================================================
// Document Types
// =============================================================================

/// A document of the `tags` collection.
///
/// `movieId` is stored as a string, unlike the integer id on the relational
/// side. The store's own `_id` is ignored on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDocument {
    pub id: i64,
    pub name: String,
    #[serde(rename = "movieId")]
    pub movie_id: String,
}

impl TagDocument {
    pub fn new(id: i64, name: impl Into<String>, movie_id: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            movie_id: movie_id.into(),
        }
    }
}

// =============================================================================
// Ranking Types
// =============================================================================

/// One row of a tag frequency table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: u64,
}

impl TagCount {
    pub fn new(tag: impl Into<String>, count: u64) -> Self {
        Self {
            tag: tag.into(),
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_document_reads_store_field_names() {
        let raw = r#"{"_id": "5c225c179301aa010ecab560", "id": 612, "name": "hotel", "movieId": "318"}"#;
        let doc: TagDocument = serde_json::from_str(raw).unwrap();

        assert_eq!(doc, TagDocument::new(612, "hotel", "318"));
    }

    #[test]
    fn test_movie_top_display() {
        let row = MovieTop::new(5468, 6.0, 3.75);
        assert_eq!(row.to_string(), "(movieid=5468, rating_num=6, rating_avg=3.75)");
    }

    #[test]
    fn test_default_table_mode_replaces() {
        assert_eq!(TableMode::default(), TableMode::Replace);
    }
}
