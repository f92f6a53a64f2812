use crate::context::MoodmapCliContext;
use moodmap::MoodmapError;
use moodmap::models::TagKind;

/// Resolve tag ids or names to ids. Ids win over names.
pub async fn resolve_tag_ids(
    ctx: &MoodmapCliContext,
    kind: TagKind,
    values: &[String],
) -> moodmap::Result<Vec<String>> {
    let tags = ctx.moodmap.community().list_tags(kind).await?;

    values
        .iter()
        .map(|value| {
            let value = value.trim();
            tags.iter()
                .find(|t| t.id == value)
                .or_else(|| tags.iter().find(|t| t.name == value))
                .map(|t| t.id.clone())
                .ok_or_else(|| MoodmapError::Validation(format!("unknown {} '{}'", kind, value)))
        })
        .collect()
}
