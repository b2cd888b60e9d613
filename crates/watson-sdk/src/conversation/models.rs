//! Conversation v1 workspace resources.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::message::{MessageRequest, MessageResponse};
use crate::models::{lenient, parse_timestamp, timestamps};

// =============================================================================
// Pagination
// =============================================================================

/// Paging information returned with list responses.
///
/// Cursors are opaque: pass `next_cursor` back as the `cursor` option to
/// fetch the following page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub refresh_url: Option<String>,
    pub next_url: Option<String>,
    pub total: Option<i64>,
    pub matched: Option<i64>,
    pub refresh_cursor: Option<String>,
    pub next_cursor: Option<String>,
}

impl Pagination {
    /// Whether the server reported another page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some() || self.next_url.is_some()
    }
}

/// Paging information returned with log listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogPagination {
    pub next_url: Option<String>,
    pub matched: Option<i64>,
    pub next_cursor: Option<String>,
}

impl LogPagination {
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some() || self.next_url.is_some()
    }
}

// =============================================================================
// Enumerations
// =============================================================================

/// How a value is matched: by synonyms or by regular expression patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Synonyms,
    Patterns,
}

/// Kind of dialog node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogNodeType {
    Standard,
    EventHandler,
    Frame,
    Slot,
    ResponseCondition,
}

/// Event an `event_handler` node reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventName {
    Focus,
    Input,
    Filled,
    Validate,
    FilledMultiple,
    Generic,
    Nomatch,
    NomatchResponsesDepleted,
}

/// What happens after a dialog node runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStepBehavior {
    GetUserInput,
    SkipUserInput,
    JumpTo,
}

/// Which part of the target node a `jump_to` enters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStepSelector {
    Condition,
    Client,
    UserInput,
    Body,
}

/// Where a dialog node action is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogNodeActionType {
    Client,
    Server,
}

// =============================================================================
// Workspaces
// =============================================================================

/// Workspace summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Workspace {
    pub name: Option<String>,
    pub language: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub workspace_id: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<Value>,
    pub learning_opt_out: Option<bool>,
}

/// Workspace with its content, as returned by `get_workspace`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceExport {
    pub name: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub metadata: Option<Value>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub workspace_id: Option<String>,
    /// Training state, e.g. `Available` or `Training`.
    pub status: Option<String>,
    pub learning_opt_out: Option<bool>,
    pub intents: Vec<IntentExport>,
    pub entities: Vec<EntityExport>,
    pub counterexamples: Vec<Counterexample>,
    pub dialog_nodes: Vec<DialogNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceCollection {
    pub workspaces: Vec<Workspace>,
    pub pagination: Pagination,
}

// =============================================================================
// Intents and examples
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Intent {
    pub intent: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub description: Option<String>,
}

/// Intent with its examples.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentExport {
    pub intent: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub description: Option<String>,
    pub examples: Vec<Example>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentCollection {
    pub intents: Vec<IntentExport>,
    pub pagination: Pagination,
}

/// User input example for an intent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Example {
    pub text: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExampleCollection {
    pub examples: Vec<Example>,
    pub pagination: Pagination,
}

// =============================================================================
// Entities, values and synonyms
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entity {
    pub entity: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<Value>,
    pub fuzzy_match: Option<bool>,
}

/// Entity with its values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityExport {
    pub entity: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<Value>,
    pub fuzzy_match: Option<bool>,
    pub values: Vec<ValueExport>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityCollection {
    pub entities: Vec<EntityExport>,
    pub pagination: Pagination,
}

/// Entity value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityValue {
    pub value: Option<String>,
    pub metadata: Option<Value>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub synonyms: Vec<String>,
    pub patterns: Vec<String>,
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub value_type: Option<ValueType>,
}

/// Entity value as listed or exported; same shape as [`EntityValue`].
pub type ValueExport = EntityValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueCollection {
    pub values: Vec<ValueExport>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Synonym {
    pub synonym: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynonymCollection {
    pub synonyms: Vec<Synonym>,
    pub pagination: Pagination,
}

// =============================================================================
// Counterexamples
// =============================================================================

/// Input the workspace should not match to any intent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Counterexample {
    pub text: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterexampleCollection {
    pub counterexamples: Vec<Counterexample>,
    pub pagination: Pagination,
}

// =============================================================================
// Dialog nodes
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogNode {
    pub dialog_node: Option<String>,
    pub description: Option<String>,
    pub conditions: Option<String>,
    pub parent: Option<String>,
    pub previous_sibling: Option<String>,
    pub output: Option<Value>,
    pub context: Option<Value>,
    pub metadata: Option<Value>,
    pub next_step: Option<DialogNodeNextStep>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub actions: Vec<DialogNodeAction>,
    pub title: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub node_type: Option<DialogNodeType>,
    #[serde(deserialize_with = "lenient")]
    pub event_name: Option<EventName>,
    pub variable: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogNodeCollection {
    pub dialog_nodes: Vec<DialogNode>,
    pub pagination: Pagination,
}

/// Where the conversation goes after a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogNodeNextStep {
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub behavior: Option<NextStepBehavior>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialog_node: Option<String>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub selector: Option<NextStepSelector>,
}

impl DialogNodeNextStep {
    /// Jump to another node.
    #[must_use]
    pub fn jump_to(dialog_node: impl Into<String>, selector: NextStepSelector) -> Self {
        Self {
            behavior: Some(NextStepBehavior::JumpTo),
            dialog_node: Some(dialog_node.into()),
            selector: Some(selector),
        }
    }
}

/// Action invoked by a dialog node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogNodeAction {
    pub name: String,
    #[serde(
        rename = "type",
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub action_type: Option<DialogNodeActionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    pub result_variable: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,
}

// =============================================================================
// Logs
// =============================================================================

/// One logged message exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogExport {
    pub request: MessageRequest,
    pub response: MessageResponse,
    pub log_id: Option<String>,
    pub request_timestamp: Option<String>,
    pub response_timestamp: Option<String>,
    pub workspace_id: Option<String>,
    pub language: Option<String>,
}

impl LogExport {
    /// Time the request was received.
    #[must_use]
    pub fn requested_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.request_timestamp.as_deref().and_then(parse_timestamp)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogCollection {
    pub logs: Vec<LogExport>,
    pub pagination: LogPagination,
}

timestamps!(
    Workspace,
    WorkspaceExport,
    Intent,
    IntentExport,
    Example,
    Entity,
    EntityExport,
    EntityValue,
    Synonym,
    Counterexample,
    DialogNode,
);
