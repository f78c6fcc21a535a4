//! Turning relational rows into document-store keys.
//!
//! Movie ids are integers in `movies_top` but strings in the tag
//! collection, so the join key is the decimal form of the id.

use domain::{MovieTop, TagDocument};

/// Ids of `rows` as tag-collection keys, in row order
pub fn movie_id_keys(rows: &[MovieTop]) -> Vec<String> {
    rows.iter().map(|row| row.movie_id.to_string()).collect()
}

/// Tag text of every document, in document order
pub fn tag_names(documents: &[TagDocument]) -> Vec<&str> {
    documents.iter().map(|doc| doc.name.as_str()).collect()
}
