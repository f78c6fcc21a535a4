//! PostgreSQL rating store.
//!
//! One pooled connection, no explicit transactions: every statement commits
//! on its own.

use crate::error::{Result, SourceError};
use crate::sql;
use crate::traits::RatingStore;
use domain::{MovieId, MovieTop, PostgresConfig, TableMode, TopRatedQuery};
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::{debug, info, instrument};

/// Rating store backed by a PostgreSQL `ratings` table
#[derive(Clone)]
pub struct PostgresRatingStore {
    pool: PgPool,
}

impl PostgresRatingStore {
    /// Connect using settings read from the environment.
    pub async fn connect(config: &PostgresConfig) -> Result<Self> {
        info!(
            "Connecting to Postgres at {}:{} as {}",
            config.host, config.port, config.user
        );

        let mut options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user);
        if let Some(password) = &config.password {
            options = options.password(password);
        }
        if let Some(database) = &config.database {
            options = options.database(database);
        }

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn table_exists(&self, table: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
            .bind(table)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

impl RatingStore for PostgresRatingStore {
    #[instrument(skip(self))]
    async fn materialize_top(
        &mut self,
        table: &str,
        min_avg_rating: f64,
        mode: TableMode,
    ) -> Result<u64> {
        let create = sql::create_top_table(table, min_avg_rating)?;

        match mode {
            TableMode::Replace => {
                debug!("Dropping {} if present", table);
                sqlx::query(&sql::drop_table(table)?)
                    .execute(&self.pool)
                    .await?;
            }
            TableMode::FailIfExists => {
                if self.table_exists(table).await? {
                    return Err(SourceError::TableExists {
                        table: table.to_string(),
                    });
                }
            }
        }

        let written = sqlx::query(&create)
            .execute(&self.pool)
            .await?
            .rows_affected();
        sqlx::query(&sql::add_primary_key(table)?)
            .execute(&self.pool)
            .await?;

        debug!("Created {} with {} rows", table, written);
        Ok(written)
    }

    #[instrument(skip(self))]
    async fn sample(&self, table: &str, limit: usize) -> Result<Vec<MovieTop>> {
        let rows: Vec<(MovieId, f64, f64)> = sqlx::query_as(&sql::sample_rows(table)?)
            .bind(to_limit(limit))
            .fetch_all(&self.pool)
            .await?;

        Ok(into_movie_tops(rows))
    }

    #[instrument(skip(self))]
    async fn top_rated(&self, table: &str, query: &TopRatedQuery) -> Result<Vec<MovieTop>> {
        let rows: Vec<(MovieId, f64, f64)> = sqlx::query_as(&sql::top_rated(table)?)
            .bind(query.min_count)
            .bind(query.min_avg)
            .bind(to_limit(query.limit))
            .fetch_all(&self.pool)
            .await?;

        Ok(into_movie_tops(rows))
    }
}

fn to_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn into_movie_tops(rows: Vec<(MovieId, f64, f64)>) -> Vec<MovieTop> {
    rows.into_iter()
        .map(|(movie_id, rating_num, rating_avg)| MovieTop::new(movie_id, rating_num, rating_avg))
        .collect()
}
