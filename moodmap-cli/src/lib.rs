pub mod args;
pub mod commands;
pub mod context;
pub mod handlers;
pub mod output;
pub mod utils;

pub use context::MoodmapCliContext;
pub use output::{
    CliColors, format_error, format_info, format_success, format_warning, output_error_json,
    print_inference, print_json, print_recommended_places, print_seed_report, print_store_card,
    print_tag_list,
};
pub use utils::resolve_tag_ids;
