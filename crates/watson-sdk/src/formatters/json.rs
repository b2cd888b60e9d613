//! Compact JSON views of service responses.

use serde_json::{Value, json};

use crate::conversation::{MessageResponse, RuntimeResponseGeneric, Workspace};
use crate::visual_recognition::{AnalyzeResponse, Collection};

/// Compact workspace representation.
#[must_use]
pub fn compact_workspace(workspace: &Workspace) -> Value {
    let mut obj = json!({
        "id": workspace.workspace_id,
        "name": workspace.name,
        "language": workspace.language,
    });

    if let Some(description) = &workspace.description {
        obj["description"] = json!(description);
    }

    if let Some(updated) = workspace.updated_at() {
        obj["updated"] = json!(updated.to_rfc3339());
    }

    obj
}

/// Compact message reply: the text, top intent, entities and the
/// conversation id needed to continue.
#[must_use]
pub fn compact_message(response: &MessageResponse) -> Value {
    let mut obj = json!({
        "text": response.text(),
        "conversation_id": response.context.conversation_id,
    });

    if let Some(intent) = response.top_intent() {
        obj["intent"] = json!({ "name": intent.intent, "confidence": intent.confidence });
    }

    if !response.entities.is_empty() {
        obj["entities"] = json!(
            response
                .entities
                .iter()
                .map(|e| json!({ "entity": e.entity, "value": e.value }))
                .collect::<Vec<_>>()
        );
    }

    // Non-text generic responses are reported by type only
    let other: Vec<_> = response
        .output
        .generic
        .iter()
        .filter(|g| !matches!(g, RuntimeResponseGeneric::Text(_)))
        .filter_map(RuntimeResponseGeneric::response_type)
        .collect();
    if !other.is_empty() {
        obj["generic"] = json!(other);
    }

    obj
}

/// Compact collection representation.
#[must_use]
pub fn compact_collection(collection: &Collection) -> Value {
    let mut obj = json!({
        "id": collection.collection_id,
        "name": collection.name,
        "images": collection.image_count.unwrap_or(0),
        "ready": collection.is_ready(),
    });

    if let Some(description) = &collection.description {
        obj["description"] = json!(description);
    }

    obj
}

/// Detections per analyzed image.
#[must_use]
pub fn compact_analysis(response: &AnalyzeResponse) -> Value {
    let images: Vec<Value> = response
        .images
        .iter()
        .map(|image| {
            let source = image
                .source
                .as_ref()
                .and_then(|s| s.source_url.clone().or_else(|| s.filename.clone()));
            let mut obj = json!({
                "source": source,
                "objects": image
                    .detections()
                    .map(|d| json!({ "object": d.object, "score": d.score, "location": d.location }))
                    .collect::<Vec<_>>(),
            });
            if !image.errors.is_empty() {
                obj["errors"] =
                    json!(image.errors.iter().filter_map(|e| e.message.as_ref()).collect::<Vec<_>>());
            }
            obj
        })
        .collect();

    let mut obj = json!({ "images": images });
    if !response.warnings.is_empty() {
        obj["warnings"] =
            json!(response.warnings.iter().filter_map(|w| w.message.as_ref()).collect::<Vec<_>>());
    }
    obj
}
