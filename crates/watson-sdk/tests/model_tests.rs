//! Response model and dynamic model tests.
//!
//! Parses recorded payloads and checks the leniency rules: missing fields
//! default, unknown fields are ignored or kept, drifted shapes degrade to `None`.

use serde_json::json;

use watson_sdk::conversation::*;
use watson_sdk::models::DynamicModel;
use watson_sdk::visual_recognition::{AnalyzeResponse, ImageDetailsList, TrainingEvents};

fn fixture(name: &str) -> serde_json::Value {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// =============================================================================
// Conversation Models
// =============================================================================

#[test]
fn test_workspace_export_fixture() {
    let workspace: WorkspaceExport = serde_json::from_value(fixture("workspace_export.json")).unwrap();

    assert_eq!(workspace.name.as_deref(), Some("Car Dashboard"));
    assert!(workspace.created_at().is_some());
    assert_eq!(workspace.counterexamples[0].text.as_deref(), Some("turn on the fan please"));

    let values = &workspace.entities[0].values;
    assert_eq!(values[0].value_type, Some(ValueType::Synonyms));
    assert_eq!(values[0].synonyms, vec!["lamp", "light"]);
    assert_eq!(values[1].value_type, Some(ValueType::Patterns));
    // Unknown enum value degrades to None
    assert_eq!(values[2].value_type, None);
    assert_eq!(values[2].value.as_deref(), Some("radio"));

    let node = &workspace.dialog_nodes[0];
    assert_eq!(node.node_type, Some(DialogNodeType::Standard));
    let next = node.next_step.as_ref().unwrap();
    assert_eq!(next.behavior, Some(NextStepBehavior::JumpTo));
    assert_eq!(next.selector, Some(NextStepSelector::Body));
    assert_eq!(workspace.dialog_nodes[1].event_name, None);
}

#[test]
fn test_missing_fields_default() {
    let workspace: Workspace = serde_json::from_value(json!({})).unwrap();
    assert_eq!(workspace, Workspace::default());

    let collection: EntityCollection = serde_json::from_value(json!({"entities": [{}]})).unwrap();
    assert!(collection.entities[0].values.is_empty());
    assert!(collection.pagination.next_cursor.is_none());
}

#[test]
fn test_unknown_fields_ignored_on_typed_models() {
    let intent: Intent =
        serde_json::from_value(json!({"intent": "hello", "brand_new_field": [1, 2, 3]})).unwrap();
    assert_eq!(intent.intent.as_deref(), Some("hello"));
}

#[test]
fn test_workspace_roundtrip() {
    let workspace: WorkspaceExport = serde_json::from_value(fixture("workspace_export.json")).unwrap();
    let json = serde_json::to_value(&workspace).unwrap();
    let back: WorkspaceExport = serde_json::from_value(json).unwrap();
    assert_eq!(back, workspace);
}

// =============================================================================
// Message and Dynamic Models
// =============================================================================

#[test]
fn test_message_response_fixture() {
    let response: MessageResponse = serde_json::from_value(fixture("message_response.json")).unwrap();

    assert_eq!(response.intents.len(), 2);
    assert_eq!(response.entities[0].location, vec![12, 18]);
    assert_eq!(response.text_concatenated(" "), "Hi. It looks like a nice drive today. What would you like me to do?");
    assert_eq!(response.output.nodes_visited, vec!["node_1_1467221909631"]);

    let system = response.context.system.as_ref().unwrap();
    assert_eq!(system.dialog_stack().map(|s| s.len()), Some(1));
    assert_eq!(system.dialog_request_counter(), Some(2));
    assert_eq!(system.branch_exited(), Some(true));
}

#[test]
fn test_generic_responses_by_type() {
    let response: MessageResponse = serde_json::from_value(fixture("message_response.json")).unwrap();
    let generic = &response.output.generic;

    match &generic[0] {
        RuntimeResponseGeneric::Text(text) => assert!(text.text.starts_with("Hi.")),
        other => panic!("Expected text, got {other:?}"),
    }
    match &generic[1] {
        RuntimeResponseGeneric::Pause(pause) => {
            assert_eq!(pause.time, Some(500));
            assert_eq!(pause.typing, Some(true));
        }
        other => panic!("Expected pause, got {other:?}"),
    }
    match &generic[2] {
        RuntimeResponseGeneric::Option(opt) => {
            assert_eq!(opt.options.len(), 2);
            assert_eq!(opt.options[1].label, "Music");
        }
        other => panic!("Expected option, got {other:?}"),
    }
    assert_eq!(generic[3].response_type(), Some("carousel"));
}

#[test]
fn test_generic_known_type_with_bad_payload_is_kept() {
    let generic: RuntimeResponseGeneric =
        serde_json::from_value(json!({"response_type": "image", "source": 42})).unwrap();

    match &generic {
        RuntimeResponseGeneric::Other(map) => assert_eq!(map.get("source"), Some(&json!(42))),
        other => panic!("Expected Other, got {other:?}"),
    }
    assert_eq!(generic.response_type(), Some("image"));

    let json = serde_json::to_value(&generic).unwrap();
    assert_eq!(json, json!({"response_type": "image", "source": 42}));
}

#[test]
fn test_dynamic_accessors_tolerate_wrong_shapes() {
    let context: Context = serde_json::from_value(json!({
        "conversation_id": 12345,
        "system": {"dialog_turn_counter": "two", "dialog_stack": {"not": "a list"}},
        "user_name": "Ada"
    }))
    .unwrap();

    assert_eq!(context.conversation_id, None);
    assert_eq!(context.get("conversation_id"), Some(&json!(12345)));
    let system = context.system.as_ref().unwrap();
    assert_eq!(system.dialog_turn_counter(), None);
    assert_eq!(system.dialog_stack(), None);
    assert_eq!(context.get_as::<String>("user_name").as_deref(), Some("Ada"));
    assert_eq!(context.get_as::<i64>("user_name"), None);
}

#[test]
fn test_dynamic_builder_and_serialization() {
    let mut context = Context::with_conversation_id("c1").add("step", 2);
    context.put("flag", true);
    assert_eq!(context.remove("step"), Some(json!(2)));

    let json = serde_json::to_value(&context).unwrap();
    assert_eq!(json, json!({"conversation_id": "c1", "flag": true}));

    let input = InputData::from_text("hi").add("language", "en");
    let json = serde_json::to_value(&input).unwrap();
    assert_eq!(json, json!({"text": "hi", "language": "en"}));

    let back: InputData = serde_json::from_value(json).unwrap();
    assert_eq!(back, input);
    assert_eq!(back.property_names(), vec!["language"]);
}

#[test]
fn test_message_response_tolerates_drifted_members() {
    let response: MessageResponse = serde_json::from_value(json!({
        "intents": [{"intent": "greet", "confidence": "high"}, "not-an-intent"],
        "entities": [{"entity": "appliance", "value": 5, "location": [1, 2]}],
        "context": "opaque",
        "output": {"text": ["hi"], "log_messages": [{"level": 3, "msg": "slow node"}]}
    }))
    .unwrap();

    assert_eq!(response.intents.len(), 1);
    assert_eq!(response.intents[0].intent, "greet");
    assert_eq!(response.intents[0].confidence, 0.0);
    assert_eq!(response.entities[0].entity, "appliance");
    assert_eq!(response.entities[0].value, "");
    assert_eq!(response.context, Context::default());
    assert_eq!(response.text(), ["hi"]);
    assert_eq!(response.output.log_messages[0].level, "");
    assert_eq!(response.output.log_messages[0].msg, "slow node");
}

#[test]
fn test_runtime_intent_string_confidence() {
    let intent: RuntimeIntent =
        serde_json::from_value(json!({"intent": "greet", "confidence": "0.9"})).unwrap();
    assert_eq!(intent.intent, "greet");
    assert_eq!(intent.confidence, 0.0);
}

#[test]
fn test_context_keeps_untyped_system_for_next_turn() {
    let raw = json!({"conversation_id": "a", "system": "opaque", "step": 1});
    let context: Context = serde_json::from_value(raw.clone()).unwrap();

    assert_eq!(context.conversation_id.as_deref(), Some("a"));
    assert!(context.system.is_none());
    assert_eq!(context.get("system"), Some(&json!("opaque")));
    assert_eq!(serde_json::to_value(&context).unwrap(), raw);
}

// =============================================================================
// Round Trips
// =============================================================================

#[test]
fn test_message_response_roundtrip() {
    let response: MessageResponse = serde_json::from_value(fixture("message_response.json")).unwrap();
    let json = serde_json::to_value(&response).unwrap();
    let back: MessageResponse = serde_json::from_value(json).unwrap();
    assert_eq!(back, response);
}

#[test]
fn test_analyze_response_roundtrip() {
    let response: AnalyzeResponse = serde_json::from_value(fixture("analyze_response.json")).unwrap();
    let json = serde_json::to_value(&response).unwrap();
    let back: AnalyzeResponse = serde_json::from_value(json).unwrap();
    assert_eq!(back, response);
}

#[test]
fn test_log_collection_roundtrip() {
    let logs: LogCollection = serde_json::from_value(json!({
        "logs": [{
            "request": {"input": {"text": "hi"}, "alternate_intents": true},
            "response": {
                "intents": [{"intent": "greet", "confidence": 0.75}],
                "output": {"text": ["hello"]},
                "context": {"conversation_id": "c1", "system": {"dialog_turn_counter": 1}}
            },
            "log_id": "l1",
            "request_timestamp": "2017-05-26T08:30:00Z",
            "workspace_id": "ws"
        }],
        "pagination": {"next_url": "/v1/logs?cursor=x", "matched": 1}
    }))
    .unwrap();

    assert!(logs.logs[0].requested_at().is_some());
    assert!(logs.pagination.has_more());

    let json = serde_json::to_value(&logs).unwrap();
    let back: LogCollection = serde_json::from_value(json).unwrap();
    assert_eq!(back, logs);
}

// =============================================================================
// Visual Recognition Models
// =============================================================================

#[test]
fn test_analyze_response_fixture() {
    let response: AnalyzeResponse = serde_json::from_value(fixture("analyze_response.json")).unwrap();
    let image = &response.images[0];

    assert_eq!(image.dimensions.and_then(|d| d.height), Some(6));
    assert_eq!(image.detections().count(), 1);
    assert_eq!(image.errors[0].code.as_deref(), Some("invalid_field"));
}

#[test]
fn test_image_details_fixture() {
    let list: ImageDetailsList = serde_json::from_value(fixture("image_details_list.json")).unwrap();
    let training = list.images[0].training_data.as_ref().unwrap();
    assert_eq!(training.objects[0].object.as_deref(), Some("object"));
    assert_eq!(training.objects[0].location.map(|l| l.left), Some(4));
}

#[test]
fn test_training_events_fixture() {
    let events: TrainingEvents = serde_json::from_value(fixture("training_events.json")).unwrap();
    assert_eq!(events.events[0].event_type.as_deref(), Some("objects"));
    assert_eq!(events.events[0].image_count, Some(10));
}
