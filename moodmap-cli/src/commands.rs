//! Command enum definitions

use crate::args::*;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Display version information
    Version,

    /// Check storage health and show record counts
    Diagnose,

    /// Load emotion and location tags from CSV files
    #[command(long_about = r#"
Load emotion and location tags from CSV files. Each file has a header row
followed by `id,name` rows (`emotion_id,name` or `location_id,name`).

Rows whose name already exists are left alone, so seeding twice is safe.
An empty id lets the store pick one.

When neither file is given, the files named in the [seed] section of the
configuration are used.

EXAMPLES:
  moodmap-cli seed --emotions data/emotions.csv --locations data/locations.csv
  moodmap-cli --data-dir ./data seed --emotions emotions.csv
"#)]
    Seed(SeedArgs),

    /// List emotion and location tags
    Tags(TagsArgs),

    /// Find operating places similar to a closed store
    #[command(long_about = r#"
Search the places provider around the closed store's neighbourhood and
return operating places, each with an AI summary. Needs a places API key.

EXAMPLES:
  moodmap-cli similar --name "한남분식" --address "서울 용산구 이태원동 22" -e 정겨움
"#)]
    Similar(SimilarArgs),

    /// Run a recommendation session for locations and emotions
    #[command(long_about = r#"
Run the full recommendation pipeline: search every selected location, keep
well-rated places, enrich them with details, summaries and emotion tags,
then rank them. Locations and emotions may be given by id or by name.

EXAMPLES:
  moodmap-cli infer --location 이태원동 --emotion 정겨움 --emotion 편안함
  moodmap-cli --output json infer -l 1 -e 2
"#)]
    Infer(InferArgs),

    /// Show the summary card of a single store
    Search(SearchArgs),
}
