//! Storage and provider diagnostics

use crate::context::MoodmapCliContext;
use crate::output::*;
use moodmap::storage::BaseStore;
use serde_json::{Value, json};

/// Report storage health, record counts and configured providers.
pub async fn handle_diagnose_command(
    ctx: &MoodmapCliContext,
    output_format: &str,
) -> moodmap::Result<Value> {
    let storage = ctx.moodmap.storage();
    let healthy = storage.health_check().await?;
    let metadata = storage.get_metadata().await?;
    let cache = ctx.moodmap.cache().stats().await;

    let report = json!({
        "storage": {
            "healthy": healthy,
            "metadata": metadata,
        },
        "providers": {
            "places": ctx.moodmap.places_configured(),
            "llm": ctx.moodmap.llm_configured(),
        },
        "cache": cache,
    });

    if is_json(output_format) {
        print_json(&report);
    } else {
        print_diagnostics(&report);
    }

    Ok(report)
}
