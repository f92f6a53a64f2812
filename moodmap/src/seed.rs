//! Loading the initial emotion and location tags from CSV files.
//!
//! Files carry a header row, `emotion_id,name` or `location_id,name`. The id
//! column may be left empty to get the next numeric id. Seeding is
//! get-or-create: rows whose name already exists are left alone.

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use crate::models::TagKind;
use crate::storage::{StorageError, TagStore};
use crate::{MoodmapError, Result};

#[derive(Debug, Deserialize)]
struct TagRow {
    #[serde(alias = "emotion_id", alias = "location_id", default)]
    id: Option<String>,
    name: String,
}

/// What a seeding run did.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub existing: usize,
    pub skipped: usize,
}

impl SeedReport {
    fn merge(&mut self, other: SeedReport) {
        self.created += other.created;
        self.existing += other.existing;
        self.skipped += other.skipped;
    }
}

/// Seed tags of one kind from a CSV file.
pub async fn seed_tags_from_path<S>(store: &S, kind: TagKind, path: &Path) -> Result<SeedReport>
where
    S: TagStore + ?Sized,
{
    let file = std::fs::File::open(path)
        .map_err(|e| MoodmapError::Seed(format!("{}: {}", path.display(), e)))?;
    tracing::info!("Seeding {} tags from {}", kind, path.display());
    seed_tags(store, kind, file).await
}

/// Seed tags of one kind from CSV data.
pub async fn seed_tags<S, R>(store: &S, kind: TagKind, reader: R) -> Result<SeedReport>
where
    S: TagStore + ?Sized,
    R: Read,
{
    let rows = read_rows(reader)?;
    let mut report = SeedReport::default();

    for row in rows {
        let name = row.name.trim();
        if name.is_empty() {
            report.skipped += 1;
            continue;
        }

        if store.find_tag_by_name(kind, name).await?.is_some() {
            report.existing += 1;
            continue;
        }

        let id = row.id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty());
        match store.create_tag(kind, id.clone(), name).await {
            Ok(_) => report.created += 1,
            Err(StorageError::AlreadyExists(reason)) => {
                tracing::warn!(name, id = ?id, "Skipping {} row: {}", kind, reason);
                report.skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(
        created = report.created,
        existing = report.existing,
        skipped = report.skipped,
        "Seeded {} tags",
        kind
    );
    Ok(report)
}

/// Seed both tag kinds from the given files.
pub async fn seed_all<S>(
    store: &S,
    emotions: Option<&Path>,
    locations: Option<&Path>,
) -> Result<SeedReport>
where
    S: TagStore + ?Sized,
{
    let mut report = SeedReport::default();
    if let Some(path) = emotions {
        report.merge(seed_tags_from_path(store, TagKind::Emotion, path).await?);
    }
    if let Some(path) = locations {
        report.merge(seed_tags_from_path(store, TagKind::Location, path).await?);
    }
    Ok(report)
}

fn read_rows<R: Read>(reader: R) -> Result<Vec<TagRow>> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    csv.deserialize()
        .enumerate()
        .map(|(line, row)| {
            row.map_err(|e| MoodmapError::Seed(format!("row {}: {}", line + 1, e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_both_header_styles() {
        let rows = read_rows("emotion_id,name\n1,정겨움\n2,편안함\n".as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id.as_deref(), Some("1"));
        assert_eq!(rows[1].name, "편안함");

        let rows = read_rows("location_id,name\n,청파동\n".as_bytes()).unwrap();
        assert_eq!(rows[0].name, "청파동");
    }

    #[test]
    fn missing_name_column_is_an_error() {
        let err = read_rows("emotion_id,label\n1,x\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MoodmapError::Seed(_)));
    }
}
