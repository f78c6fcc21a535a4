//! Pipeline for the movie tag report.
//!
//! This crate provides:
//! - Selection helpers that turn `movies_top` rows into tag-collection keys
//! - Tag frequency ranking on polars frames
//! - TagReportPipeline for running every step against a pair of stores
//!
//! ## Architecture
//! The report processes data in stages:
//! 1. The rating store aggregates ratings into the derived table
//! 2. The top-rated rows become string keys for the tag store
//! 3. Matching tags are ranked against the whole tag collection
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::TagReportPipeline;
//! use sources::{MongoTagStore, PostgresRatingStore};
//!
//! let mut pipeline = TagReportPipeline::new(ratings, tags, Thresholds::default());
//! let report = pipeline.run().await?;
//!
//! for row in &report.top_tags {
//!     println!("{} {}", row.tag, row.count);
//! }
//! ```

pub mod orchestrator;
pub mod ranking;
pub mod selection;

// Re-export main types
pub use orchestrator::{TagReport, TagReportPipeline};
pub use ranking::{tag_counts, top_tags};
pub use selection::movie_id_keys;
