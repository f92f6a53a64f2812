//! Recommendation command handlers

use crate::args::{InferArgs, SearchArgs, SimilarArgs};
use crate::context::MoodmapCliContext;
use crate::output::*;
use crate::utils::resolve_tag_ids;
use moodmap::core::{InferenceRequest, SimilarRequest};
use moodmap::models::{InferenceOutcome, RecommendedPlace, StoreCard, TagKind};

pub async fn handle_similar_command(
    args: SimilarArgs,
    ctx: &MoodmapCliContext,
    output_format: &str,
) -> moodmap::Result<Vec<RecommendedPlace>> {
    let places = ctx
        .moodmap
        .recommender()
        .similar_places(SimilarRequest {
            name: args.name,
            address: args.address,
            emotions: args.emotions,
        })
        .await?;

    if is_json(output_format) {
        print_json(&places);
    } else {
        print_recommended_places(&places);
    }

    Ok(places)
}

/// Run an anonymous inference session. Sessions started from the CLI are
/// not attached to any user.
pub async fn handle_infer_command(
    args: InferArgs,
    ctx: &MoodmapCliContext,
    output_format: &str,
) -> moodmap::Result<InferenceOutcome> {
    let location_ids = resolve_tag_ids(ctx, TagKind::Location, &args.locations).await?;
    let emotion_ids = resolve_tag_ids(ctx, TagKind::Emotion, &args.emotions).await?;

    tracing::debug!(?location_ids, ?emotion_ids, "Resolved inference selection");

    let outcome = ctx
        .moodmap
        .recommender()
        .run_inference(
            None,
            InferenceRequest {
                location_ids,
                emotion_ids,
            },
        )
        .await?;

    if is_json(output_format) {
        print_json(&outcome);
    } else {
        print_inference(&outcome);
    }

    Ok(outcome)
}

pub async fn handle_search_command(
    args: SearchArgs,
    ctx: &MoodmapCliContext,
    output_format: &str,
) -> moodmap::Result<StoreCard> {
    let card = ctx.moodmap.recommender().search_store(&args.query).await?;

    if is_json(output_format) {
        print_json(&card);
    } else {
        print_store_card(&card);
    }

    Ok(card)
}
