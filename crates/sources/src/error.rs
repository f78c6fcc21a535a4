//! Error types for the store layer.

use thiserror::Error;

/// Errors raised by rating and tag stores
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Postgres error: {0}")]
    Postgres(#[from] sqlx::Error),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// The derived table exists and the run was told not to replace it
    #[error("Table {table} already exists")]
    TableExists { table: String },

    /// The derived table was read before it was built
    #[error("Table {table} does not exist")]
    MissingTable { table: String },

    /// Table names are interpolated into DDL, so only plain identifiers pass
    #[error("Invalid table name: {name:?}")]
    InvalidIdentifier { name: String },

    #[error("Invalid rating threshold: {value}")]
    InvalidThreshold { value: f64 },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, SourceError>;
