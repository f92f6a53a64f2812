//! Seeding tags from CSV files.

mod common;

use common::app;
use moodmap::prelude::*;
use moodmap::seed::{self, SeedReport};
use std::io::Write;
use tempfile::NamedTempFile;

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    file
}

#[tokio::test]
async fn test_seed_is_get_or_create() {
    let test = app().await;
    let emotions = csv_file("emotion_id,name\n1,정겨움\n2,편안함\n, \n");
    let locations = csv_file("location_id,name\n1,청파동\n,효창동\n");

    let report = seed::seed_all(
        test.app.storage().as_ref(),
        Some(emotions.path()),
        Some(locations.path()),
    )
    .await
    .expect("Seeding should succeed");
    assert_eq!(
        report,
        SeedReport {
            created: 4,
            existing: 0,
            skipped: 1,
        }
    );

    let again = seed::seed_all(
        test.app.storage().as_ref(),
        Some(emotions.path()),
        Some(locations.path()),
    )
    .await
    .unwrap();
    assert_eq!(again.created, 0);
    assert_eq!(again.existing, 4);

    let locations = test
        .app
        .community()
        .list_tags(TagKind::Location)
        .await
        .unwrap();
    let names: Vec<&str> = locations.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["청파동", "효창동"]);
    assert_eq!(locations[1].id, "2");
}

#[tokio::test]
async fn test_seed_skips_taken_ids() {
    let test = app().await;
    test.app
        .community()
        .create_tag(TagKind::Emotion, "활기참")
        .await
        .unwrap();

    let report = seed::seed_tags(
        test.app.storage().as_ref(),
        TagKind::Emotion,
        "emotion_id,name\n1,조용함\n".as_bytes(),
    )
    .await
    .unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.created, 0);
}

#[tokio::test]
async fn test_missing_seed_file_is_an_error() {
    let test = app().await;
    let err = seed::seed_all(
        test.app.storage().as_ref(),
        Some(std::path::Path::new("/definitely/not/here.csv")),
        None,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, MoodmapError::Seed(_)));
}
