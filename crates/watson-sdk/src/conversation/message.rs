//! Message exchange types.
//!
//! Most of these are dynamic models: the service adds fields to context and
//! output over time, so anything not typed here is kept in `properties` and
//! sent back untouched on the next turn.

use serde::de::{DeserializeOwned, Error as _};
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::models::{DynamicModel, dynamic_model, lenient, lenient_default, lenient_vec};

/// Body of a `message` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageRequest {
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub input: Option<InputData>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub alternate_intents: Option<bool>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
    #[serde(deserialize_with = "lenient_vec", skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<RuntimeEntity>,
    #[serde(deserialize_with = "lenient_vec", skip_serializing_if = "Vec::is_empty")]
    pub intents: Vec<RuntimeIntent>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputData>,
}

/// Reply to a `message` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageResponse {
    #[serde(deserialize_with = "lenient")]
    pub input: Option<InputData>,
    #[serde(deserialize_with = "lenient_vec")]
    pub intents: Vec<RuntimeIntent>,
    #[serde(deserialize_with = "lenient_vec")]
    pub entities: Vec<RuntimeEntity>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub alternate_intents: Option<bool>,
    #[serde(deserialize_with = "lenient_default")]
    pub context: Context,
    #[serde(deserialize_with = "lenient_default")]
    pub output: OutputData,
}

impl MessageResponse {
    /// Text the user sent, if echoed back.
    #[must_use]
    pub fn input_text(&self) -> Option<&str> {
        self.input.as_ref()?.text.as_deref()
    }

    /// Response lines from the dialog.
    #[must_use]
    pub fn text(&self) -> &[String] {
        &self.output.text
    }

    /// Response lines joined with `separator`.
    #[must_use]
    pub fn text_concatenated(&self, separator: &str) -> String {
        self.output.text.join(separator)
    }

    /// Highest-confidence intent.
    #[must_use]
    pub fn top_intent(&self) -> Option<&RuntimeIntent> {
        self.intents.iter().max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }

    /// Context to send with the next turn.
    #[must_use]
    pub fn next_context(&self) -> Context {
        self.context.clone()
    }
}

/// User input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputData {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl InputData {
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), properties: Map::new() }
    }
}

/// Conversation state carried between turns.
///
/// A `conversation_id` or `system` the SDK cannot type is kept verbatim in
/// `properties`, so it still goes back to the service on the next turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Context {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemResponse>,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl Context {
    #[must_use]
    pub fn with_conversation_id(conversation_id: impl Into<String>) -> Self {
        Self { conversation_id: Some(conversation_id.into()), ..Self::default() }
    }
}

impl<'de> Deserialize<'de> for Context {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut properties = Map::<String, Value>::deserialize(deserializer)?;
        let conversation_id = take_typed(&mut properties, "conversation_id");
        let system = take_typed(&mut properties, "system");
        Ok(Self { conversation_id, system, properties })
    }
}

/// Remove `key` from `properties` as a `T`, leaving it in place if it has another shape.
fn take_typed<T: DeserializeOwned>(properties: &mut Map<String, Value>, key: &str) -> Option<T> {
    let value = properties.remove(key)?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(typed) => Some(typed),
        Err(err) => {
            tracing::debug!(key, error = %err, "Keeping context property untyped");
            properties.insert(key.to_string(), value);
            None
        }
    }
}

/// Dialog bookkeeping the service keeps inside the context.
///
/// Entirely untyped on the wire; the accessors below read the well-known keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemResponse {
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl SystemResponse {
    /// Stack of dialog nodes being processed.
    #[must_use]
    pub fn dialog_stack(&self) -> Option<Vec<Value>> {
        self.get_as("dialog_stack")
    }

    #[must_use]
    pub fn dialog_turn_counter(&self) -> Option<i64> {
        self.get_as("dialog_turn_counter")
    }

    #[must_use]
    pub fn dialog_request_counter(&self) -> Option<i64> {
        self.get_as("dialog_request_counter")
    }

    /// Whether the last turn left a dialog branch.
    #[must_use]
    pub fn branch_exited(&self) -> Option<bool> {
        self.get_as("branch_exited")
    }

    /// Why the branch was exited (`completed` or `fallback`).
    #[must_use]
    pub fn branch_exited_reason(&self) -> Option<String> {
        self.get_as("branch_exited_reason")
    }
}

/// Output of the dialog for one turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputData {
    #[serde(default, deserialize_with = "lenient_vec", skip_serializing_if = "Vec::is_empty")]
    pub log_messages: Vec<LogMessage>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub text: Vec<String>,
    #[serde(default, deserialize_with = "lenient_vec", skip_serializing_if = "Vec::is_empty")]
    pub nodes_visited: Vec<String>,
    #[serde(default, deserialize_with = "lenient_vec", skip_serializing_if = "Vec::is_empty")]
    pub nodes_visited_details: Vec<DialogNodeVisitedDetails>,
    #[serde(default, deserialize_with = "lenient_vec", skip_serializing_if = "Vec::is_empty")]
    pub generic: Vec<RuntimeResponseGeneric>,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl OutputData {
    #[must_use]
    pub fn with_text(text: Vec<String>) -> Self {
        Self { text, ..Self::default() }
    }
}

/// Intent recognized in the user input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeIntent {
    #[serde(default, deserialize_with = "lenient_default")]
    pub intent: String,
    #[serde(default, deserialize_with = "lenient_default")]
    pub confidence: f64,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl RuntimeIntent {
    #[must_use]
    pub fn new(intent: impl Into<String>, confidence: f64) -> Self {
        Self { intent: intent.into(), confidence, properties: Map::new() }
    }
}

/// Entity recognized in the user input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeEntity {
    #[serde(default, deserialize_with = "lenient_default")]
    pub entity: String,
    /// Character offsets `[start, end)` of the mention.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub location: Vec<i64>,
    #[serde(default, deserialize_with = "lenient_default")]
    pub value: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default, deserialize_with = "lenient_vec", skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<CaptureGroup>,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl RuntimeEntity {
    #[must_use]
    pub fn new(entity: impl Into<String>, value: impl Into<String>, location: [i64; 2]) -> Self {
        Self {
            entity: entity.into(),
            value: value.into(),
            location: location.to_vec(),
            ..Self::default()
        }
    }
}

/// Pattern capture group of an entity match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureGroup {
    #[serde(deserialize_with = "lenient_default")]
    pub group: String,
    #[serde(deserialize_with = "lenient_vec", skip_serializing_if = "Vec::is_empty")]
    pub location: Vec<i64>,
}

/// Log line produced while processing a turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogMessage {
    #[serde(default, deserialize_with = "lenient_default")]
    pub level: String,
    #[serde(default, deserialize_with = "lenient_default")]
    pub msg: String,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// Node visited while processing a turn, when details were requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogNodeVisitedDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialog_node: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
}

dynamic_model!(InputData, Context, SystemResponse, OutputData, RuntimeIntent, RuntimeEntity, LogMessage);

// =============================================================================
// Generic runtime responses
// =============================================================================

/// One element of `output.generic`, keyed by `response_type`.
///
/// Types this SDK does not know, and known types whose payload does not
/// match, are kept verbatim in [`RuntimeResponseGeneric::Other`].
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeResponseGeneric {
    Text(TextResponse),
    Pause(PauseResponse),
    Image(ImageResponse),
    Option(OptionResponse),
    ConnectToAgent(ConnectToAgentResponse),
    Suggestion(SuggestionResponse),
    Other(Map<String, Value>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextResponse {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PauseResponse {
    /// Milliseconds to wait.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typing: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResponse {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionResponse {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `dropdown` or `button`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preference: Option<String>,
    pub options: Vec<OptionElement>,
}

/// A choice offered to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionElement {
    pub label: String,
    pub value: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectToAgentResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_to_human_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub title: String,
    pub suggestions: Vec<Value>,
}

impl RuntimeResponseGeneric {
    /// The `response_type` tag.
    #[must_use]
    pub fn response_type(&self) -> Option<&str> {
        match self {
            Self::Text(_) => Some("text"),
            Self::Pause(_) => Some("pause"),
            Self::Image(_) => Some("image"),
            Self::Option(_) => Some("option"),
            Self::ConnectToAgent(_) => Some("connect_to_agent"),
            Self::Suggestion(_) => Some("suggestion"),
            Self::Other(map) => map.get("response_type").and_then(Value::as_str),
        }
    }

    fn from_map(map: Map<String, Value>) -> Self {
        let kind = map.get("response_type").and_then(Value::as_str).map(str::to_owned);
        let value = Value::Object(map);
        let parsed = match kind.as_deref() {
            Some("text") => serde_json::from_value(value.clone()).map(Self::Text),
            Some("pause") => serde_json::from_value(value.clone()).map(Self::Pause),
            Some("image") => serde_json::from_value(value.clone()).map(Self::Image),
            Some("option") => serde_json::from_value(value.clone()).map(Self::Option),
            Some("connect_to_agent") => {
                serde_json::from_value(value.clone()).map(Self::ConnectToAgent)
            }
            Some("suggestion") => serde_json::from_value(value.clone()).map(Self::Suggestion),
            _ => return Self::other(value),
        };
        parsed.unwrap_or_else(|err| {
            tracing::debug!(response_type = ?kind, error = %err, "Keeping generic response untyped");
            Self::other(value)
        })
    }

    fn other(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Other(map),
            _ => Self::Other(Map::new()),
        }
    }
}

impl<'de> Deserialize<'de> for RuntimeResponseGeneric {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(D::Error::custom(format!("expected a generic response object, got {other}"))),
        }
    }
}

impl Serialize for RuntimeResponseGeneric {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let payload = match self {
            Self::Text(inner) => serde_json::to_value(inner),
            Self::Pause(inner) => serde_json::to_value(inner),
            Self::Image(inner) => serde_json::to_value(inner),
            Self::Option(inner) => serde_json::to_value(inner),
            Self::ConnectToAgent(inner) => serde_json::to_value(inner),
            Self::Suggestion(inner) => serde_json::to_value(inner),
            Self::Other(map) => return map.serialize(serializer),
        };
        let mut payload = payload.map_err(S::Error::custom)?;
        if let (Value::Object(obj), Some(kind)) = (&mut payload, self.response_type()) {
            obj.insert("response_type".to_string(), Value::String(kind.to_string()));
        }
        payload.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_context_keeps_unknown_properties() {
        let context: Context = serde_json::from_value(json!({
            "conversation_id": "abc",
            "system": {"dialog_turn_counter": 2, "dialog_stack": [{"dialog_node": "root"}]},
            "user_name": "Ada"
        }))
        .unwrap();

        assert_eq!(context.conversation_id.as_deref(), Some("abc"));
        assert_eq!(context.get("user_name"), Some(&json!("Ada")));
        let system = context.system.as_ref().unwrap();
        assert_eq!(system.dialog_turn_counter(), Some(2));
        assert_eq!(system.dialog_stack().map(|s| s.len()), Some(1));
        assert_eq!(system.branch_exited(), None);
    }

    #[test]
    fn test_system_accessor_wrong_shape_is_none() {
        let system: SystemResponse =
            serde_json::from_value(json!({"dialog_stack": "root", "branch_exited": "yes"})).unwrap();
        assert_eq!(system.dialog_stack(), None);
        assert_eq!(system.branch_exited(), None);
        assert_eq!(system.get("dialog_stack"), Some(&json!("root")));
    }

    #[test]
    fn test_generic_dispatch() {
        let output: OutputData = serde_json::from_value(json!({
            "text": ["Hi"],
            "generic": [
                {"response_type": "text", "text": "Hi"},
                {"response_type": "pause", "time": 500, "typing": true},
                {"response_type": "image"},
                {"response_type": "carousel", "items": []}
            ]
        }))
        .unwrap();

        assert!(matches!(&output.generic[0], RuntimeResponseGeneric::Text(t) if t.text == "Hi"));
        assert!(matches!(output.generic[1], RuntimeResponseGeneric::Pause(PauseResponse { time: Some(500), .. })));
        assert!(matches!(output.generic[2], RuntimeResponseGeneric::Other(_)));
        assert_eq!(output.generic[3].response_type(), Some("carousel"));
    }

    #[test]
    fn test_generic_serializes_tag() {
        let generic = RuntimeResponseGeneric::Text(TextResponse { text: "Hello".into() });
        let json = serde_json::to_value(&generic).unwrap();
        assert_eq!(json, json!({"response_type": "text", "text": "Hello"}));
        let back: RuntimeResponseGeneric = serde_json::from_value(json).unwrap();
        assert_eq!(back, generic);
    }

    #[test]
    fn test_output_text_wrong_shape_is_empty() {
        let output: OutputData =
            serde_json::from_value(json!({"text": "single string", "custom": 1})).unwrap();
        assert!(output.text.is_empty());
        assert_eq!(output.get_as::<i64>("custom"), Some(1));
    }

    #[test]
    fn test_add_property_builder() {
        let input = InputData::from_text("hello").add("spelling_suggestions", true);
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json, json!({"text": "hello", "spelling_suggestions": true}));
    }
}
