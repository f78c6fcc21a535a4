//! Integration tests for the report pipeline.
//!
//! These run the whole report against in-memory stores seeded with a small
//! ratings table and tag collection.

use domain::{MovieId, Rating, TableMode, TagCount, TagDocument, Thresholds};
use pipeline::TagReportPipeline;
use sources::{InMemoryRatingStore, InMemoryTagStore, SourceError};

fn ratings_for(movie_id: MovieId, values: &[f64]) -> Vec<Rating> {
    values
        .iter()
        .enumerate()
        .map(|(user, &rating)| Rating {
            user_id: user as i32,
            movie_id,
            rating,
        })
        .collect()
}

fn create_test_ratings() -> Vec<Rating> {
    let mut ratings = Vec::new();

    // 318: 20 ratings, avg 4.5
    ratings.extend(ratings_for(318, &[4.5; 20]));
    // 2330: 16 ratings, avg 4.25
    ratings.extend(ratings_for(2330, &[4.0, 4.5].repeat(8)));
    // 2937: 32 ratings, avg 4.75
    ratings.extend(ratings_for(2937, &[5.0, 4.5].repeat(16)));
    // 69906: one perfect rating, too few to be top rated
    ratings.extend(ratings_for(69906, &[5.0]));
    // 790: passes the table threshold but not the top-rated one
    ratings.extend(ratings_for(790, &[3.0, 3.5].repeat(10)));
    // 12: exactly 3.0, never in the derived table
    ratings.extend(ratings_for(12, &[3.0; 40]));
    // 13: poorly rated
    ratings.extend(ratings_for(13, &[1.0, 2.0].repeat(20)));

    ratings
}

fn create_test_tags() -> Vec<TagDocument> {
    let mut tags = vec![
        TagDocument::new(612, "hotel", "318"),
        TagDocument::new(2246, "confidence", "318"),
        TagDocument::new(6054, "friendship", "318"),
        TagDocument::new(14964, "drug", "2330"),
        TagDocument::new(444, "taxi", "2330"),
        TagDocument::new(12670, "los angeles", "2330"),
        TagDocument::new(15090, "police officer", "2330"),
        TagDocument::new(7000, "remake", "790"),
    ];

    // Other movies reusing some of the same tags
    let mut next_id = 20_000;
    for (tag, times) in [("friendship", 4), ("drug", 3), ("los angeles", 2), ("remake", 9)] {
        for i in 0..times {
            tags.push(TagDocument::new(next_id, tag, format!("{}", 50_000 + i)));
            next_id += 1;
        }
    }

    tags
}

fn create_pipeline(thresholds: Thresholds) -> TagReportPipeline<InMemoryRatingStore, InMemoryTagStore> {
    TagReportPipeline::new(
        InMemoryRatingStore::new(create_test_ratings()),
        InMemoryTagStore::new(create_test_tags()),
        thresholds,
    )
}

#[tokio::test]
async fn test_full_report_realistic() {
    let mut pipeline = create_pipeline(Thresholds::default());

    let report = pipeline.run().await.unwrap();

    // 12 and 13 are at or below 3.0
    assert_eq!(report.movies_top_rows, 5);
    assert!(report.sample.iter().all(|row| row.rating_avg > 3.0));

    let top_ids: Vec<MovieId> = report.top_rated.iter().map(|row| row.movie_id).collect();
    assert_eq!(top_ids, vec![2937, 318, 2330]);

    // 2937 has no tags
    assert_eq!(report.tag_documents.len(), 7);
    assert!(
        report
            .tag_documents
            .iter()
            .all(|doc| doc.movie_id == "318" || doc.movie_id == "2330")
    );

    assert!(report.top_movie_tag_counts.iter().all(|row| row.count == 1));

    assert_eq!(
        report.top_tags,
        vec![
            TagCount::new("friendship", 5),
            TagCount::new("drug", 4),
            TagCount::new("los angeles", 3),
            TagCount::new("confidence", 1),
            TagCount::new("hotel", 1),
        ]
    );
}

#[tokio::test]
async fn test_report_respects_thresholds() {
    let thresholds = Thresholds {
        top_limit: 1,
        tags_limit: 3,
        ..Thresholds::default()
    };
    let mut pipeline = create_pipeline(thresholds);

    let report = pipeline.run().await.unwrap();

    // Only 2937 is selected, and it has no tags
    assert_eq!(report.top_rated.len(), 1);
    assert!(report.tag_documents.is_empty());
    assert!(report.top_tags.is_empty());
}

#[tokio::test]
async fn test_derived_table_never_holds_low_averages() {
    for min_avg_rating in [0.0, 3.0, 3.25, 4.5, 5.0] {
        let thresholds = Thresholds {
            min_avg_rating,
            ..Thresholds::default()
        };
        let mut pipeline = create_pipeline(thresholds);
        pipeline.run().await.unwrap();

        let table = pipeline.ratings().table("movies_top").unwrap();
        assert!(
            table.iter().all(|row| row.rating_avg > min_avg_rating),
            "movies_top holds an average at or below {}",
            min_avg_rating
        );
    }
}

#[tokio::test]
async fn test_top_rated_is_non_increasing() {
    let thresholds = Thresholds {
        top_min_count: 0.0,
        top_min_avg: 0.0,
        top_limit: 100,
        ..Thresholds::default()
    };
    let mut pipeline = create_pipeline(thresholds);

    let report = pipeline.run().await.unwrap();

    assert_eq!(report.top_rated.len(), 5);
    assert!(
        report
            .top_rated
            .windows(2)
            .all(|pair| pair[0].rating_avg >= pair[1].rating_avg)
    );
}

#[tokio::test]
async fn test_rerun_replaces_table() {
    let mut pipeline = create_pipeline(Thresholds::default());

    let first = pipeline.run().await.unwrap();
    let second = pipeline.run().await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_rerun_without_replace_fails() {
    let thresholds = Thresholds {
        table_mode: TableMode::FailIfExists,
        ..Thresholds::default()
    };
    let mut pipeline = create_pipeline(thresholds);

    pipeline.run().await.unwrap();
    let err = pipeline.run().await.unwrap_err();

    let source = err.downcast_ref::<SourceError>().unwrap();
    assert!(matches!(source, SourceError::TableExists { table } if table == "movies_top"));
}
