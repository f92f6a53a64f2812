//! Command argument structures

use std::path::PathBuf;

use clap::Args;

#[derive(Args)]
pub struct SeedArgs {
    /// CSV with `emotion_id,name` rows
    #[arg(long, value_name = "FILE")]
    pub emotions: Option<PathBuf>,

    /// CSV with `location_id,name` rows
    #[arg(long, value_name = "FILE")]
    pub locations: Option<PathBuf>,
}

#[derive(Args)]
pub struct TagsArgs {
    /// Only list one kind (emotion or location)
    #[arg(long, short, value_parser = ["emotion", "location"])]
    pub kind: Option<String>,
}

#[derive(Args)]
pub struct SimilarArgs {
    /// Name of the closed store
    #[arg(long)]
    pub name: String,

    /// Address of the closed store
    #[arg(long)]
    pub address: String,

    /// Emotion names to tag the results with
    #[arg(long = "emotion", short = 'e')]
    pub emotions: Vec<String>,
}

#[derive(Args)]
pub struct InferArgs {
    /// Location id or name (repeatable)
    #[arg(long = "location", short = 'l', required = true)]
    pub locations: Vec<String>,

    /// Emotion id or name (repeatable, at most 3)
    #[arg(long = "emotion", short = 'e', required = true)]
    pub emotions: Vec<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Free text, e.g. a store name with its neighbourhood
    pub query: String,
}
