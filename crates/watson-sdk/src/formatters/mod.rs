//! Human and machine readable output for the `watson` CLI.

mod json;
mod markdown;

pub use json::{compact_analysis, compact_collection, compact_message, compact_workspace};
pub use markdown::{
    format_analysis_markdown, format_collections_markdown, format_message_markdown,
    format_workspaces_markdown,
};
