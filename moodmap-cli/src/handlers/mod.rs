//! Command handlers for the moodmap CLI

pub mod diagnose;
pub mod recommend;
pub mod seed;

pub use diagnose::handle_diagnose_command;
pub use recommend::{handle_infer_command, handle_search_command, handle_similar_command};
pub use seed::{handle_seed_command, handle_tags_command};
