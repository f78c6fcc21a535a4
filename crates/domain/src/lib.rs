//! # Domain Crate
//!
//! Shared types for the movie tag report.
//!
//! ## Main Components
//!
//! - **types**: Ratings, derived `movies_top` rows, tag documents and tag counts
//! - **config**: Connection settings read from the environment, plus run thresholds
//! - **error**: Configuration errors
//!
//! ## Example Usage
//!
//! ```ignore
//! use domain::{MongoConfig, PostgresConfig, Thresholds};
//!
//! let postgres = PostgresConfig::from_env()?;
//! let mongo = MongoConfig::from_env()?;
//! let thresholds = Thresholds::default();
//!
//! println!("aggregating into {} (avg > {})", thresholds.table, thresholds.min_avg_rating);
//! ```

pub mod config;
pub mod error;
pub mod types;

pub use config::{MongoConfig, PostgresConfig, Thresholds};
pub use error::{ConfigError, Result};
pub use types::{
    // Type aliases
    MovieId,
    UserId,
    // Core types
    MovieTop,
    Rating,
    TagCount,
    TagDocument,
    TopRatedQuery,
    // Enums
    TableMode,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_rated_query_from_thresholds() {
        let thresholds = Thresholds::default();
        let query = thresholds.top_rated_query();

        assert_eq!(query.min_count, 15.0);
        assert_eq!(query.min_avg, 3.5);
        assert_eq!(query.limit, 5);
    }

    #[test]
    fn test_movie_top_matches_query() {
        let query = TopRatedQuery {
            min_count: 15.0,
            min_avg: 3.5,
            limit: 5,
        };

        let popular = MovieTop::new(2937, 32.0, 4.46875);
        let too_few = MovieTop::new(69906, 1.0, 5.0);
        let on_the_edge = MovieTop::new(1, 15.0, 3.5);

        assert!(query.matches(&popular));
        assert!(!query.matches(&too_few));
        // Both bounds are strict
        assert!(!query.matches(&on_the_edge));
    }
}
