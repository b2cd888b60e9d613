//! Markdown output formatting.

use crate::conversation::{MessageResponse, RuntimeResponseGeneric, Workspace};
use crate::visual_recognition::{AnalyzeResponse, Collection};

/// Format a list of workspaces as Markdown.
#[must_use]
pub fn format_workspaces_markdown(workspaces: &[Workspace]) -> String {
    if workspaces.is_empty() {
        return "No workspaces found.".to_string();
    }

    let mut output = format!("# Workspaces ({})\n\n", workspaces.len());

    for workspace in workspaces {
        output.push_str(&format!(
            "- **{}** (`{}`, {})",
            workspace.name.as_deref().unwrap_or("Untitled"),
            workspace.workspace_id.as_deref().unwrap_or("?"),
            workspace.language.as_deref().unwrap_or("unknown language"),
        ));
        if let Some(description) = &workspace.description {
            output.push_str(&format!(": {description}"));
        }
        output.push('\n');
    }

    output
}

/// Format a message reply as Markdown.
#[must_use]
pub fn format_message_markdown(response: &MessageResponse) -> String {
    let mut output = String::new();

    if let Some(input) = response.input_text() {
        output.push_str(&format!("> {input}\n\n"));
    }

    for line in response.text() {
        output.push_str(&format!("{line}\n"));
    }

    for generic in &response.output.generic {
        match generic {
            RuntimeResponseGeneric::Text(_) => {}
            RuntimeResponseGeneric::Option(opt) => {
                output.push_str(&format!("\n**{}**\n", opt.title));
                for element in &opt.options {
                    output.push_str(&format!("- {}\n", element.label));
                }
            }
            RuntimeResponseGeneric::Image(image) => {
                let title = image.title.as_deref().unwrap_or("image");
                output.push_str(&format!("\n![{title}]({})\n", image.source));
            }
            RuntimeResponseGeneric::ConnectToAgent(_) => {
                output.push_str("\n_Transfer to a human agent requested._\n");
            }
            other => {
                if let Some(kind) = other.response_type() {
                    output.push_str(&format!("\n_({kind} response)_\n"));
                }
            }
        }
    }

    let mut meta = Vec::new();
    if let Some(intent) = response.top_intent() {
        meta.push(format!("**Intent**: #{} ({:.2})", intent.intent, intent.confidence));
    }
    if !response.entities.is_empty() {
        let entities: Vec<_> =
            response.entities.iter().map(|e| format!("@{}:{}", e.entity, e.value)).collect();
        meta.push(format!("**Entities**: {}", entities.join(", ")));
    }
    if !meta.is_empty() {
        output.push_str(&format!("\n{}\n", meta.join(" | ")));
    }

    output
}

/// Format a list of collections as Markdown.
#[must_use]
pub fn format_collections_markdown(collections: &[Collection]) -> String {
    if collections.is_empty() {
        return "No collections found.".to_string();
    }

    let mut output = format!("# Collections ({})\n\n", collections.len());

    for collection in collections {
        let status = if collection.is_ready() { "trained" } else { "not trained" };
        output.push_str(&format!(
            "- **{}** (`{}`): {} images, {status}\n",
            collection.name.as_deref().unwrap_or("Untitled"),
            collection.collection_id.as_deref().unwrap_or("?"),
            collection.image_count.unwrap_or(0),
        ));
    }

    output
}

/// Format detection results as Markdown.
#[must_use]
pub fn format_analysis_markdown(response: &AnalyzeResponse) -> String {
    if response.images.is_empty() {
        return "No images analyzed.".to_string();
    }

    let mut output = String::new();

    for (i, image) in response.images.iter().enumerate() {
        let source = image
            .source
            .as_ref()
            .and_then(|s| s.source_url.as_deref().or(s.filename.as_deref()))
            .unwrap_or("image");
        output.push_str(&format!("## {}. {source}\n\n", i + 1));

        let mut found = false;
        for detail in image.detections() {
            found = true;
            output.push_str(&format!(
                "- {} ({:.2})",
                detail.object.as_deref().unwrap_or("?"),
                detail.score.unwrap_or_default()
            ));
            if let Some(loc) = detail.location {
                output.push_str(&format!(" at {}x{}+{}+{}", loc.width, loc.height, loc.left, loc.top));
            }
            output.push('\n');
        }
        if !found {
            output.push_str("No objects detected.\n");
        }

        for error in &image.errors {
            output.push_str(&format!(
                "\n**Error**: {}\n",
                error.message.as_deref().unwrap_or("unknown error")
            ));
        }
        output.push('\n');
    }

    for warning in &response.warnings {
        if let Some(message) = &warning.message {
            output.push_str(&format!("> **Warning**: {message}\n"));
        }
    }

    output
}
