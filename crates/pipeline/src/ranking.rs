//! Tag frequency ranking.
//!
//! Two frames are built from tag documents:
//! - `tags(id, tags)` for the tags of the top-rated movies
//! - `corpus(tags, movieId)` for the whole collection
//!
//! The ranking left-joins the first onto the second by tag text, so a tag
//! scores one row for every corpus document carrying the same text. Ties
//! are ordered by tag text.

use domain::{TagCount, TagDocument};
use polars::prelude::*;

/// `id, tags` frame of the given documents
pub fn tags_frame(documents: &[TagDocument]) -> PolarsResult<DataFrame> {
    let ids: Vec<i64> = documents.iter().map(|doc| doc.id).collect();
    let tags: Vec<&str> = documents.iter().map(|doc| doc.name.as_str()).collect();

    df!(
        "id" => ids,
        "tags" => tags
    )
}

/// `tags, movieId` frame of the given documents
pub fn corpus_frame(documents: &[TagDocument]) -> PolarsResult<DataFrame> {
    let tags: Vec<&str> = documents.iter().map(|doc| doc.name.as_str()).collect();
    let movie_ids: Vec<&str> = documents.iter().map(|doc| doc.movie_id.as_str()).collect();

    df!(
        "tags" => tags,
        "movieId" => movie_ids
    )
}

/// How often each tag occurs among `documents`, most frequent first
pub fn tag_counts(documents: &[TagDocument]) -> PolarsResult<Vec<TagCount>> {
    let counted = count_by_tag(tags_frame(documents)?.lazy(), None)?;
    to_tag_counts(&counted)
}

/// The `limit` most popular tags of `top_documents` across `all_documents`.
///
/// Counts are the row counts of the left join on tag text, so a tag that
/// never appears in `all_documents` still counts its own row.
pub fn top_tags(
    top_documents: &[TagDocument],
    all_documents: &[TagDocument],
    limit: usize,
) -> PolarsResult<Vec<TagCount>> {
    let joined = tags_frame(top_documents)?
        .lazy()
        .left_join(corpus_frame(all_documents)?.lazy(), col("tags"), col("tags"));

    let ranked = count_by_tag(joined, Some(limit))?;
    to_tag_counts(&ranked)
}

/// Group by `tags`, count non-null `id`, sort by count descending then tag
fn count_by_tag(frame: LazyFrame, limit: Option<usize>) -> PolarsResult<DataFrame> {
    let sorted = frame
        .group_by([col("tags")])
        .agg([col("id").count().alias("count")])
        .sort(
            ["count", "tags"],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        );

    match limit {
        Some(limit) => sorted
            .limit(IdxSize::try_from(limit).unwrap_or(IdxSize::MAX))
            .collect(),
        None => sorted.collect(),
    }
}

fn to_tag_counts(frame: &DataFrame) -> PolarsResult<Vec<TagCount>> {
    let tags = frame.column("tags")?.str()?;
    let counts = frame.column("count")?.cast(&DataType::UInt64)?;
    let counts = counts.u64()?;

    Ok(tags
        .into_no_null_iter()
        .zip(counts.into_no_null_iter())
        .map(|(tag, count)| TagCount::new(tag, count))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: i64, name: &str, movie_id: &str) -> TagDocument {
        TagDocument::new(id, name, movie_id)
    }

    /// Tags of two top movies plus a corpus where some of them recur
    fn create_test_documents() -> (Vec<TagDocument>, Vec<TagDocument>) {
        let top = vec![
            doc(612, "hotel", "318"),
            doc(2246, "confidence", "318"),
            doc(6054, "friendship", "318"),
            doc(14964, "drug", "2330"),
            doc(444, "taxi", "2330"),
            doc(12670, "los angeles", "2330"),
            doc(15090, "police officer", "2330"),
        ];

        let mut all = top.clone();
        let extra = [
            ("friendship", 6),
            ("drug", 5),
            ("los angeles", 3),
            ("hotel", 2),
            ("police officer", 1),
            ("unrelated", 50),
        ];
        let mut next_id = 100_000;
        for (name, times) in extra {
            for movie in 0..times {
                all.push(doc(next_id, name, &format!("{}", 9000 + movie)));
                next_id += 1;
            }
        }

        (top, all)
    }

    #[test]
    fn test_top_tags_sorted_and_limited() {
        let (top, all) = create_test_documents();

        let ranking = top_tags(&top, &all, 5).unwrap();

        assert_eq!(
            ranking,
            vec![
                TagCount::new("friendship", 7),
                TagCount::new("drug", 6),
                TagCount::new("los angeles", 4),
                TagCount::new("hotel", 3),
                TagCount::new("police officer", 2),
            ]
        );
        assert!(ranking.windows(2).all(|pair| pair[0].count >= pair[1].count));
    }

    #[test]
    fn test_top_tags_ignores_tags_outside_top_movies() {
        let (top, all) = create_test_documents();

        let ranking = top_tags(&top, &all, 10).unwrap();

        assert_eq!(ranking.len(), top.len());
        assert!(ranking.iter().all(|row| row.tag != "unrelated"));
    }

    #[test]
    fn test_top_tags_ties_ordered_by_text() {
        let top = vec![doc(1, "taxi", "1"), doc(2, "book", "1"), doc(3, "junkie", "1")];

        let ranking = top_tags(&top, &top, 5).unwrap();
        let names: Vec<&str> = ranking.iter().map(|row| row.tag.as_str()).collect();

        assert_eq!(names, vec!["book", "junkie", "taxi"]);
        assert!(ranking.iter().all(|row| row.count == 1));
    }

    #[test]
    fn test_top_tags_counts_unmatched_rows() {
        let top = vec![doc(1, "orphan", "1")];

        let ranking = top_tags(&top, &[], 5).unwrap();

        assert_eq!(ranking, vec![TagCount::new("orphan", 1)]);
    }

    #[test]
    fn test_top_tags_empty_input() {
        let (_, all) = create_test_documents();
        assert!(top_tags(&[], &all, 5).unwrap().is_empty());
    }

    #[test]
    fn test_tag_counts_within_top_movies() {
        let docs = vec![
            doc(1, "book", "318"),
            doc(2, "hotel", "318"),
            doc(3, "book", "2330"),
        ];

        let counts = tag_counts(&docs).unwrap();

        assert_eq!(
            counts,
            vec![TagCount::new("book", 2), TagCount::new("hotel", 1)]
        );
    }
}
