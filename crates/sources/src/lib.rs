//! # Sources Crate
//!
//! The two data stores the tag report reads from.
//!
//! ## Components
//!
//! ### Rating stores (relational)
//! Aggregate `ratings` into the derived `movies_top` table and query it:
//! - `PostgresRatingStore`: sqlx over a single pooled connection
//! - `InMemoryRatingStore`: the same semantics over a `Vec<Rating>`
//!
//! ### Tag stores (documents)
//! Look up tag documents by string movie id:
//! - `MongoTagStore`: the `tags` collection in MongoDB
//! - `InMemoryTagStore`: a `Vec<TagDocument>`
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{MongoTagStore, PostgresRatingStore, RatingStore, TagStore};
//! use domain::{MongoConfig, PostgresConfig, TableMode, Thresholds};
//!
//! let mut ratings = PostgresRatingStore::connect(&PostgresConfig::from_env()?).await?;
//! let tags = MongoTagStore::connect(&MongoConfig::from_env()?)?;
//!
//! let thresholds = Thresholds::default();
//! ratings.materialize_top("movies_top", 3.0, TableMode::Replace).await?;
//! let top = ratings.top_rated("movies_top", &thresholds.top_rated_query()).await?;
//!
//! let keys: Vec<String> = top.iter().map(|row| row.movie_id.to_string()).collect();
//! let docs = tags.find_by_movie_ids(&keys).await?;
//! ```

// Public modules
pub mod error;
pub mod memory;
pub mod mongo;
pub mod postgres;
pub mod sql;
pub mod traits;

// Re-export commonly used types
pub use error::{Result, SourceError};
pub use memory::{InMemoryRatingStore, InMemoryTagStore};
pub use mongo::MongoTagStore;
pub use postgres::PostgresRatingStore;
pub use traits::{RatingStore, TagStore};
