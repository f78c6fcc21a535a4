//! Run configuration.
//!
//! Connection settings come from the environment; thresholds default to the
//! values the report has always used and can be overridden on the command line.
//!
//! | Env Var                | Required | Default    |
//! |------------------------|----------|------------|
//! | `APP_POSTGRES_HOST`    | yes      | --         |
//! | `APP_POSTGRES_PORT`    | yes      | --         |
//! | `APP_POSTGRES_USER`    | no       | `postgres` |
//! | `APP_POSTGRES_PASSWORD`| no       | --         |
//! | `APP_POSTGRES_DB`      | no       | --         |
//! | `APP_MONGO_HOST`       | yes      | --         |
//! | `APP_MONGO_PORT`       | yes      | --         |
//! | `APP_MONGO_DB`         | no       | `movie`    |
//! | `APP_MONGO_COLLECTION` | no       | `tags`     |

use crate::error::{ConfigError, Result};
use crate::types::{TableMode, TopRatedQuery};

/// Connection settings for the relational store
#[derive(Debug, Clone, PartialEq)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl PostgresConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            host: required(&lookup, "APP_POSTGRES_HOST")?,
            port: port(&lookup, "APP_POSTGRES_PORT")?,
            user: lookup("APP_POSTGRES_USER").unwrap_or_else(|| "postgres".to_string()),
            password: lookup("APP_POSTGRES_PASSWORD"),
            database: lookup("APP_POSTGRES_DB"),
        })
    }
}

/// Connection settings for the document store
#[derive(Debug, Clone, PartialEq)]
pub struct MongoConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub collection: String,
}

impl MongoConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            host: required(&lookup, "APP_MONGO_HOST")?,
            port: port(&lookup, "APP_MONGO_PORT")?,
            database: lookup("APP_MONGO_DB").unwrap_or_else(|| "movie".to_string()),
            collection: lookup("APP_MONGO_COLLECTION").unwrap_or_else(|| "tags".to_string()),
        })
    }
}

/// Thresholds and sizes used by one report run
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    /// Name of the derived table
    pub table: String,
    /// What to do when the derived table already exists
    pub table_mode: TableMode,
    /// Movies must average strictly more than this to enter the derived table
    pub min_avg_rating: f64,
    /// Rows of the derived table to log after building it
    pub sample_rows: usize,
    /// Top-rated movies need strictly more ratings than this
    pub top_min_count: f64,
    /// Top-rated movies need a strictly higher average than this
    pub top_min_avg: f64,
    /// How many top-rated movies feed the tag lookup
    pub top_limit: usize,
    /// How many top-rated rows to log
    pub preview: usize,
    /// Rows in the final tag ranking
    pub tags_limit: usize,
}

impl Thresholds {
    pub fn top_rated_query(&self) -> TopRatedQuery {
        TopRatedQuery {
            min_count: self.top_min_count,
            min_avg: self.top_min_avg,
            limit: self.top_limit,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            table: "movies_top".to_string(),
            table_mode: TableMode::Replace,
            min_avg_rating: 3.0,
            sample_rows: 10,
            top_min_count: 15.0,
            top_min_avg: 3.5,
            top_limit: 5,
            preview: 4,
            tags_limit: 5,
        }
    }
}

fn required<F>(lookup: &F, var: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing {
            var: var.to_string(),
        }),
    }
}

fn port<F>(lookup: &F, var: &str) -> Result<u16>
where
    F: Fn(&str) -> Option<String>,
{
    let value = required(lookup, var)?;
    value.trim().parse().map_err(|e| ConfigError::Invalid {
        var: var.to_string(),
        value: value.clone(),
        reason: format!("{}", e),
    })
}
