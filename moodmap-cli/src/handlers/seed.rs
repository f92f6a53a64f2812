//! Tag seeding and listing

use crate::args::{SeedArgs, TagsArgs};
use crate::context::MoodmapCliContext;
use crate::output::*;
use moodmap::models::{Tag, TagKind};
use moodmap::seed::{self, SeedReport};
use moodmap::MoodmapError;

/// Seed tags from the given CSV files, or from the configured ones when no
/// file is given.
pub async fn handle_seed_command(
    args: SeedArgs,
    ctx: &MoodmapCliContext,
    output_format: &str,
) -> moodmap::Result<SeedReport> {
    let configured = &ctx.moodmap.config().seed;
    let (emotions, locations) = if args.emotions.is_none() && args.locations.is_none() {
        (
            configured.emotions_csv.clone(),
            configured.locations_csv.clone(),
        )
    } else {
        (args.emotions, args.locations)
    };

    if emotions.is_none() && locations.is_none() {
        return Err(MoodmapError::Validation(
            "no seed files given and none configured".to_string(),
        ));
    }

    let report = seed::seed_all(
        ctx.moodmap.storage().as_ref(),
        emotions.as_deref(),
        locations.as_deref(),
    )
    .await?;

    if is_json(output_format) {
        print_json(&report);
    } else {
        print_seed_report(&report);
    }

    Ok(report)
}

/// List tags, one kind or both.
pub async fn handle_tags_command(
    args: TagsArgs,
    ctx: &MoodmapCliContext,
    output_format: &str,
) -> moodmap::Result<Vec<(TagKind, Vec<Tag>)>> {
    let kinds = match args.kind.as_deref() {
        Some("emotion") => vec![TagKind::Emotion],
        Some("location") => vec![TagKind::Location],
        Some(other) => {
            return Err(MoodmapError::Validation(format!(
                "unknown tag kind '{}'",
                other
            )));
        }
        None => vec![TagKind::Emotion, TagKind::Location],
    };

    let mut listed = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let tags = ctx.moodmap.community().list_tags(kind).await?;
        listed.push((kind, tags));
    }

    if is_json(output_format) {
        let value: serde_json::Map<String, serde_json::Value> = listed
            .iter()
            .map(|(kind, tags)| {
                (
                    format!("{}s", kind),
                    serde_json::to_value(tags).unwrap_or_default(),
                )
            })
            .collect();
        print_json(&value);
    } else {
        for (i, (kind, tags)) in listed.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print_tag_list(*kind, tags);
        }
    }

    Ok(listed)
}
