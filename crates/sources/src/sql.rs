//! SQL statements for the derived table.
//!
//! `CREATE TABLE ... AS` can't take bind parameters, so the table name and
//! threshold are formatted into the statement. Both are validated first.

use crate::error::{Result, SourceError};

/// Source table holding one row per user rating
pub const RATINGS_TABLE: &str = "ratings";

/// Columns of the derived table, in order
pub const TOP_COLUMNS: &str = "movieid, rating_num, rating_avg";

/// Accept `[A-Za-z_][A-Za-z0-9_]*` and nothing else
pub fn validate_identifier(name: &str) -> Result<&str> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(name)
    } else {
        Err(SourceError::InvalidIdentifier {
            name: name.to_string(),
        })
    }
}

pub fn validate_threshold(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SourceError::InvalidThreshold { value })
    }
}

/// Aggregate ratings per movie into `table`, keeping averages above `min_avg_rating`
pub fn create_top_table(table: &str, min_avg_rating: f64) -> Result<String> {
    let table = validate_identifier(table)?;
    let min_avg_rating = validate_threshold(min_avg_rating)?;

    Ok(format!(
        "CREATE TABLE {table} AS \
         SELECT movieid::integer AS movieid, \
                count({RATINGS_TABLE}.rating)::double precision AS rating_num, \
                avg({RATINGS_TABLE}.rating)::double precision AS rating_avg \
         FROM {RATINGS_TABLE} \
         GROUP BY movieid \
         HAVING avg({RATINGS_TABLE}.rating) > {min_avg_rating}"
    ))
}

pub fn add_primary_key(table: &str) -> Result<String> {
    let table = validate_identifier(table)?;
    Ok(format!("ALTER TABLE {table} ADD PRIMARY KEY (movieid)"))
}

pub fn drop_table(table: &str) -> Result<String> {
    let table = validate_identifier(table)?;
    Ok(format!("DROP TABLE IF EXISTS {table}"))
}

/// `$1` is the row limit
pub fn sample_rows(table: &str) -> Result<String> {
    let table = validate_identifier(table)?;
    Ok(format!("SELECT {TOP_COLUMNS} FROM {table} LIMIT $1"))
}

/// `$1` minimum count, `$2` minimum average, `$3` row limit
pub fn top_rated(table: &str) -> Result<String> {
    let table = validate_identifier(table)?;
    Ok(format!(
        "SELECT {TOP_COLUMNS} FROM {table} \
         WHERE rating_num > $1 AND rating_avg > $2 \
         ORDER BY rating_avg DESC, movieid ASC \
         LIMIT $3"
    ))
}
