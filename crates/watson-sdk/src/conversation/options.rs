//! Request options for Conversation v1.
//!
//! Update options name their replacement fields `new_*`; the service
//! receives them under the plain field name.

use serde_json::Value;

use super::message::{Context, InputData, OutputData, RuntimeEntity, RuntimeIntent};
use super::models::{DialogNodeAction, DialogNodeNextStep, DialogNodeType, EventName, ValueType};
use crate::options::options;

// =============================================================================
// Workspace content
// =============================================================================

options! {
    /// Intent definition inside a workspace or intent update.
    CreateIntent => CreateIntentBuilder {
        required {
            /// Intent name. Letters, digits, `_`, `-` and `.`; may not start with `sys-`.
            intent: String,
        }
        optional {
            description: String,
            examples: Vec<CreateExample>,
        }
    }
}

options! {
    /// User input example.
    CreateExample => CreateExampleBuilder {
        required {
            text: String,
        }
        optional {}
    }
}

options! {
    /// Entity definition inside a workspace or entity update.
    CreateEntity => CreateEntityBuilder {
        required {
            entity: String,
        }
        optional {
            description: String,
            metadata: Value,
            values: Vec<CreateValue>,
            fuzzy_match: bool,
        }
    }
}

options! {
    /// Entity value definition.
    CreateValue => CreateValueBuilder {
        required {
            value: String,
        }
        optional {
            metadata: Value,
            synonyms: Vec<String>,
            patterns: Vec<String>,
            value_type as "type": ValueType,
        }
    }
}

options! {
    /// Counterexample definition.
    CreateCounterexample => CreateCounterexampleBuilder {
        required {
            text: String,
        }
        optional {}
    }
}

options! {
    /// Dialog node definition inside a workspace.
    CreateDialogNode => CreateDialogNodeBuilder {
        required {
            dialog_node: String,
        }
        optional {
            description: String,
            conditions: String,
            parent: String,
            previous_sibling: String,
            output: Value,
            context: Value,
            metadata: Value,
            next_step: DialogNodeNextStep,
            actions: Vec<DialogNodeAction>,
            title: String,
            node_type as "type": DialogNodeType,
            event_name: EventName,
            variable: String,
        }
    }
}

impl CreateIntentBuilder {
    #[must_use]
    pub fn new(intent: impl Into<String>) -> Self {
        Self::default().intent(intent)
    }

    #[must_use]
    pub fn add_example(mut self, example: CreateExample) -> Self {
        self.examples.get_or_insert_with(Vec::new).push(example);
        self
    }
}

impl CreateExample {
    /// Example with just its text; never fails for non-empty text.
    pub fn new(text: impl Into<String>) -> Result<Self, crate::error::ValidationError> {
        Self::builder().text(text).build()
    }
}

impl CreateEntityBuilder {
    #[must_use]
    pub fn new(entity: impl Into<String>) -> Self {
        Self::default().entity(entity)
    }

    #[must_use]
    pub fn add_value(mut self, value: CreateValue) -> Self {
        self.values.get_or_insert_with(Vec::new).push(value);
        self
    }
}

impl CreateValueBuilder {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self::default().value(value)
    }

    #[must_use]
    pub fn add_synonym(mut self, synonym: impl Into<String>) -> Self {
        self.synonyms.get_or_insert_with(Vec::new).push(synonym.into());
        self
    }

    #[must_use]
    pub fn add_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.get_or_insert_with(Vec::new).push(pattern.into());
        self
    }
}

impl CreateCounterexample {
    pub fn new(text: impl Into<String>) -> Result<Self, crate::error::ValidationError> {
        Self::builder().text(text).build()
    }
}

impl CreateDialogNodeBuilder {
    #[must_use]
    pub fn new(dialog_node: impl Into<String>) -> Self {
        Self::default().dialog_node(dialog_node)
    }

    #[must_use]
    pub fn add_action(mut self, action: DialogNodeAction) -> Self {
        self.actions.get_or_insert_with(Vec::new).push(action);
        self
    }
}

// =============================================================================
// Workspaces
// =============================================================================

options! {
    /// Options for `create_workspace`.
    CreateWorkspaceOptions => CreateWorkspaceOptionsBuilder {
        required {}
        optional {
            name: String,
            description: String,
            /// Language code, e.g. `en`.
            language: String,
            intents: Vec<CreateIntent>,
            entities: Vec<CreateEntity>,
            dialog_nodes: Vec<CreateDialogNode>,
            counterexamples: Vec<CreateCounterexample>,
            metadata: Value,
            /// Opt out of IBM using workspace data for general service improvements.
            learning_opt_out: bool,
        }
    }
}

options! {
    /// Options for `delete_workspace`.
    DeleteWorkspaceOptions => DeleteWorkspaceOptionsBuilder {
        required {
            workspace_id: String,
        }
        optional {}
    }
}

options! {
    /// Options for `get_workspace`.
    GetWorkspaceOptions => GetWorkspaceOptionsBuilder {
        required {
            workspace_id: String,
        }
        optional {
            /// Include all workspace content, not just metadata.
            export: bool,
        }
    }
}

options! {
    /// Options for `list_workspaces`.
    ListWorkspacesOptions => ListWorkspacesOptionsBuilder {
        required {}
        optional {
            page_limit: i64,
            include_count: bool,
            /// Attribute to sort by; prefix with `-` for descending.
            sort: String,
            /// Opaque token from `Pagination::next_cursor`.
            cursor: String,
        }
    }
}

options! {
    /// Options for `update_workspace`.
    UpdateWorkspaceOptions => UpdateWorkspaceOptionsBuilder {
        required {
            workspace_id: String,
        }
        optional {
            name: String,
            description: String,
            language: String,
            intents: Vec<CreateIntent>,
            entities: Vec<CreateEntity>,
            dialog_nodes: Vec<CreateDialogNode>,
            counterexamples: Vec<CreateCounterexample>,
            metadata: Value,
            learning_opt_out: bool,
            /// Merge the given content into the workspace instead of replacing it.
            append: bool,
        }
    }
}

macro_rules! workspace_content_helpers {
    ($($builder:ident),+) => {
        $(
            impl $builder {
                #[must_use]
                pub fn add_intent(mut self, intent: CreateIntent) -> Self {
                    self.intents.get_or_insert_with(Vec::new).push(intent);
                    self
                }

                #[must_use]
                pub fn add_entity(mut self, entity: CreateEntity) -> Self {
                    self.entities.get_or_insert_with(Vec::new).push(entity);
                    self
                }

                #[must_use]
                pub fn add_dialog_node(mut self, dialog_node: CreateDialogNode) -> Self {
                    self.dialog_nodes.get_or_insert_with(Vec::new).push(dialog_node);
                    self
                }

                #[must_use]
                pub fn add_counterexample(mut self, counterexample: CreateCounterexample) -> Self {
                    self.counterexamples.get_or_insert_with(Vec::new).push(counterexample);
                    self
                }
            }
        )+
    };
}

workspace_content_helpers!(CreateWorkspaceOptionsBuilder, UpdateWorkspaceOptionsBuilder);

impl UpdateWorkspaceOptionsBuilder {
    #[must_use]
    pub fn new(workspace_id: impl Into<String>) -> Self {
        Self::default().workspace_id(workspace_id)
    }
}

// =============================================================================
// Message
// =============================================================================

options! {
    /// Options for `message`.
    MessageOptions => MessageOptionsBuilder {
        required {
            workspace_id: String,
        }
        optional {
            input: InputData,
            /// Return every matching intent instead of only the top one.
            alternate_intents: bool,
            /// Context from the previous response.
            context: Context,
            entities: Vec<RuntimeEntity>,
            intents: Vec<RuntimeIntent>,
            output: OutputData,
            /// Include `nodes_visited_details` in the output.
            nodes_visited_details: bool,
        }
    }
}

impl MessageOptionsBuilder {
    #[must_use]
    pub fn new(workspace_id: impl Into<String>) -> Self {
        Self::default().workspace_id(workspace_id)
    }

    /// Shorthand for an input with only text.
    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.input(InputData::from_text(text))
    }

    #[must_use]
    pub fn add_entity(mut self, entity: RuntimeEntity) -> Self {
        self.entities.get_or_insert_with(Vec::new).push(entity);
        self
    }

    #[must_use]
    pub fn add_intent(mut self, intent: RuntimeIntent) -> Self {
        self.intents.get_or_insert_with(Vec::new).push(intent);
        self
    }
}

// =============================================================================
// Intents
// =============================================================================

options! {
    /// Options for `create_intent`.
    CreateIntentOptions => CreateIntentOptionsBuilder {
        required {
            workspace_id: String,
            intent: String,
        }
        optional {
            description: String,
            examples: Vec<CreateExample>,
        }
    }
}

options! {
    /// Options for `delete_intent`.
    DeleteIntentOptions => DeleteIntentOptionsBuilder {
        required {
            workspace_id: String,
            intent: String,
        }
        optional {}
    }
}

options! {
    /// Options for `get_intent`.
    GetIntentOptions => GetIntentOptionsBuilder {
        required {
            workspace_id: String,
            intent: String,
        }
        optional {
            /// Include examples.
            export: bool,
        }
    }
}

options! {
    /// Options for `list_intents`.
    ListIntentsOptions => ListIntentsOptionsBuilder {
        required {
            workspace_id: String,
        }
        optional {
            export: bool,
            page_limit: i64,
            include_count: bool,
            sort: String,
            cursor: String,
        }
    }
}

options! {
    /// Options for `update_intent`.
    UpdateIntentOptions => UpdateIntentOptionsBuilder {
        required {
            workspace_id: String,
            intent: String,
        }
        optional {
            new_intent: String,
            new_description: String,
            /// Replaces all existing examples.
            new_examples: Vec<CreateExample>,
        }
    }
}

impl CreateIntentOptionsBuilder {
    #[must_use]
    pub fn new(workspace_id: impl Into<String>, intent: impl Into<String>) -> Self {
        Self::default().workspace_id(workspace_id).intent(intent)
    }

    #[must_use]
    pub fn add_example(mut self, example: CreateExample) -> Self {
        self.examples.get_or_insert_with(Vec::new).push(example);
        self
    }
}

// =============================================================================
// Examples
// =============================================================================

options! {
    /// Options for `create_example`.
    CreateExampleOptions => CreateExampleOptionsBuilder {
        required {
            workspace_id: String,
            intent: String,
            text: String,
        }
        optional {}
    }
}

options! {
    /// Options for `delete_example`.
    DeleteExampleOptions => DeleteExampleOptionsBuilder {
        required {
            workspace_id: String,
            intent: String,
            text: String,
        }
        optional {}
    }
}

options! {
    /// Options for `get_example`.
    GetExampleOptions => GetExampleOptionsBuilder {
        required {
            workspace_id: String,
            intent: String,
            text: String,
        }
        optional {}
    }
}

options! {
    /// Options for `list_examples`.
    ListExamplesOptions => ListExamplesOptionsBuilder {
        required {
            workspace_id: String,
            intent: String,
        }
        optional {
            page_limit: i64,
            include_count: bool,
            sort: String,
            cursor: String,
        }
    }
}

options! {
    /// Options for `update_example`.
    UpdateExampleOptions => UpdateExampleOptionsBuilder {
        required {
            workspace_id: String,
            intent: String,
            text: String,
        }
        optional {
            new_text: String,
        }
    }
}

// =============================================================================
// Entities
// =============================================================================

options! {
    /// Options for `create_entity`.
    CreateEntityOptions => CreateEntityOptionsBuilder {
        required {
            workspace_id: String,
            entity: String,
        }
        optional {
            description: String,
            metadata: Value,
            values: Vec<CreateValue>,
            fuzzy_match: bool,
        }
    }
}

options! {
    /// Options for `delete_entity`.
    DeleteEntityOptions => DeleteEntityOptionsBuilder {
        required {
            workspace_id: String,
            entity: String,
        }
        optional {}
    }
}

options! {
    /// Options for `get_entity`.
    GetEntityOptions => GetEntityOptionsBuilder {
        required {
            workspace_id: String,
            entity: String,
        }
        optional {
            /// Include values.
            export: bool,
        }
    }
}

options! {
    /// Options for `list_entities`.
    ListEntitiesOptions => ListEntitiesOptionsBuilder {
        required {
            workspace_id: String,
        }
        optional {
            export: bool,
            page_limit: i64,
            include_count: bool,
            sort: String,
            cursor: String,
        }
    }
}

options! {
    /// Options for `update_entity`.
    UpdateEntityOptions => UpdateEntityOptionsBuilder {
        required {
            workspace_id: String,
            entity: String,
        }
        optional {
            new_entity: String,
            new_description: String,
            new_metadata: Value,
            new_fuzzy_match: bool,
            /// Replaces all existing values.
            new_values: Vec<CreateValue>,
        }
    }
}

impl CreateEntityOptionsBuilder {
    #[must_use]
    pub fn new(workspace_id: impl Into<String>, entity: impl Into<String>) -> Self {
        Self::default().workspace_id(workspace_id).entity(entity)
    }

    #[must_use]
    pub fn add_value(mut self, value: CreateValue) -> Self {
        self.values.get_or_insert_with(Vec::new).push(value);
        self
    }
}

// =============================================================================
// Values
// =============================================================================

options! {
    /// Options for `create_value`.
    CreateValueOptions => CreateValueOptionsBuilder {
        required {
            workspace_id: String,
            entity: String,
            value: String,
        }
        optional {
            metadata: Value,
            synonyms: Vec<String>,
            patterns: Vec<String>,
            value_type as "type": ValueType,
        }
    }
}

options! {
    /// Options for `delete_value`.
    DeleteValueOptions => DeleteValueOptionsBuilder {
        required {
            workspace_id: String,
            entity: String,
            value: String,
        }
        optional {}
    }
}

options! {
    /// Options for `get_value`.
    GetValueOptions => GetValueOptionsBuilder {
        required {
            workspace_id: String,
            entity: String,
            value: String,
        }
        optional {
            export: bool,
        }
    }
}

options! {
    /// Options for `list_values`.
    ListValuesOptions => ListValuesOptionsBuilder {
        required {
            workspace_id: String,
            entity: String,
        }
        optional {
            export: bool,
            page_limit: i64,
            include_count: bool,
            sort: String,
            cursor: String,
        }
    }
}

options! {
    /// Options for `update_value`.
    UpdateValueOptions => UpdateValueOptionsBuilder {
        required {
            workspace_id: String,
            entity: String,
            value: String,
        }
        optional {
            new_value: String,
            new_metadata: Value,
            new_type: ValueType,
            new_synonyms: Vec<String>,
            new_patterns: Vec<String>,
        }
    }
}

impl CreateValueOptionsBuilder {
    #[must_use]
    pub fn new(
        workspace_id: impl Into<String>,
        entity: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::default().workspace_id(workspace_id).entity(entity).value(value)
    }

    #[must_use]
    pub fn add_synonym(mut self, synonym: impl Into<String>) -> Self {
        self.synonyms.get_or_insert_with(Vec::new).push(synonym.into());
        self
    }

    #[must_use]
    pub fn add_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.get_or_insert_with(Vec::new).push(pattern.into());
        self
    }
}

impl UpdateValueOptionsBuilder {
    #[must_use]
    pub fn add_synonym(mut self, synonym: impl Into<String>) -> Self {
        self.new_synonyms.get_or_insert_with(Vec::new).push(synonym.into());
        self
    }

    #[must_use]
    pub fn add_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.new_patterns.get_or_insert_with(Vec::new).push(pattern.into());
        self
    }
}

// =============================================================================
// Synonyms
// =============================================================================

options! {
    /// Options for `create_synonym`.
    CreateSynonymOptions => CreateSynonymOptionsBuilder {
        required {
            workspace_id: String,
            entity: String,
            value: String,
            synonym: String,
        }
        optional {}
    }
}

options! {
    /// Options for `delete_synonym`.
    DeleteSynonymOptions => DeleteSynonymOptionsBuilder {
        required {
            workspace_id: String,
            entity: String,
            value: String,
            synonym: String,
        }
        optional {}
    }
}

options! {
    /// Options for `get_synonym`.
    GetSynonymOptions => GetSynonymOptionsBuilder {
        required {
            workspace_id: String,
            entity: String,
            value: String,
            synonym: String,
        }
        optional {}
    }
}

options! {
    /// Options for `list_synonyms`.
    ListSynonymsOptions => ListSynonymsOptionsBuilder {
        required {
            workspace_id: String,
            entity: String,
            value: String,
        }
        optional {
            page_limit: i64,
            include_count: bool,
            sort: String,
            cursor: String,
        }
    }
}

options! {
    /// Options for `update_synonym`.
    UpdateSynonymOptions => UpdateSynonymOptionsBuilder {
        required {
            workspace_id: String,
            entity: String,
            value: String,
            synonym: String,
        }
        optional {
            new_synonym: String,
        }
    }
}

// =============================================================================
// Dialog nodes
// =============================================================================

options! {
    /// Options for `create_dialog_node`.
    CreateDialogNodeOptions => CreateDialogNodeOptionsBuilder {
        required {
            workspace_id: String,
            dialog_node: String,
        }
        optional {
            description: String,
            /// Condition expression that triggers the node.
            conditions: String,
            parent: String,
            previous_sibling: String,
            output: Value,
            context: Value,
            metadata: Value,
            next_step: DialogNodeNextStep,
            actions: Vec<DialogNodeAction>,
            title: String,
            node_type as "type": DialogNodeType,
            event_name: EventName,
            variable: String,
        }
    }
}

options! {
    /// Options for `delete_dialog_node`.
    DeleteDialogNodeOptions => DeleteDialogNodeOptionsBuilder {
        required {
            workspace_id: String,
            dialog_node: String,
        }
        optional {}
    }
}

options! {
    /// Options for `get_dialog_node`.
    GetDialogNodeOptions => GetDialogNodeOptionsBuilder {
        required {
            workspace_id: String,
            dialog_node: String,
        }
        optional {}
    }
}

options! {
    /// Options for `list_dialog_nodes`.
    ListDialogNodesOptions => ListDialogNodesOptionsBuilder {
        required {
            workspace_id: String,
        }
        optional {
            page_limit: i64,
            include_count: bool,
            sort: String,
            cursor: String,
        }
    }
}

options! {
    /// Options for `update_dialog_node`.
    UpdateDialogNodeOptions => UpdateDialogNodeOptionsBuilder {
        required {
            workspace_id: String,
            dialog_node: String,
        }
        optional {
            new_dialog_node: String,
            new_description: String,
            new_conditions: String,
            new_parent: String,
            new_previous_sibling: String,
            new_output: Value,
            new_context: Value,
            new_metadata: Value,
            new_next_step: DialogNodeNextStep,
            new_title: String,
            new_type: DialogNodeType,
            new_event_name: EventName,
            new_variable: String,
            new_actions: Vec<DialogNodeAction>,
        }
    }
}

impl CreateDialogNodeOptionsBuilder {
    #[must_use]
    pub fn new(workspace_id: impl Into<String>, dialog_node: impl Into<String>) -> Self {
        Self::default().workspace_id(workspace_id).dialog_node(dialog_node)
    }

    #[must_use]
    pub fn add_action(mut self, action: DialogNodeAction) -> Self {
        self.actions.get_or_insert_with(Vec::new).push(action);
        self
    }
}

// =============================================================================
// Counterexamples
// =============================================================================

options! {
    /// Options for `create_counterexample`.
    CreateCounterexampleOptions => CreateCounterexampleOptionsBuilder {
        required {
            workspace_id: String,
            text: String,
        }
        optional {}
    }
}

options! {
    /// Options for `delete_counterexample`.
    DeleteCounterexampleOptions => DeleteCounterexampleOptionsBuilder {
        required {
            workspace_id: String,
            text: String,
        }
        optional {}
    }
}

options! {
    /// Options for `get_counterexample`.
    GetCounterexampleOptions => GetCounterexampleOptionsBuilder {
        required {
            workspace_id: String,
            text: String,
        }
        optional {}
    }
}

options! {
    /// Options for `list_counterexamples`.
    ListCounterexamplesOptions => ListCounterexamplesOptionsBuilder {
        required {
            workspace_id: String,
        }
        optional {
            page_limit: i64,
            include_count: bool,
            sort: String,
            cursor: String,
        }
    }
}

options! {
    /// Options for `update_counterexample`.
    UpdateCounterexampleOptions => UpdateCounterexampleOptionsBuilder {
        required {
            workspace_id: String,
            text: String,
        }
        optional {
            new_text: String,
        }
    }
}

// =============================================================================
// Logs
// =============================================================================

options! {
    /// Options for `list_logs`.
    ListLogsOptions => ListLogsOptionsBuilder {
        required {
            workspace_id: String,
        }
        optional {
            /// Attribute to sort by, e.g. `-request_timestamp`.
            sort: String,
            /// Filter expression, e.g. `response_timestamp>2017-05-01`.
            filter: String,
            page_limit: i64,
            cursor: String,
        }
    }
}

options! {
    /// Options for `list_all_logs`.
    ListAllLogsOptions => ListAllLogsOptionsBuilder {
        required {
            /// Must include a `language::` or `workspace_id::` term.
            filter: String,
        }
        optional {
            sort: String,
            page_limit: i64,
            cursor: String,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn test_create_value_options_without_synonyms() {
        let opts = CreateValueOptionsBuilder::new("ws1", "fruit", "apple").build().unwrap();
        assert_eq!(opts.workspace_id(), "ws1");
        assert_eq!(opts.entity(), "fruit");
        assert_eq!(opts.value(), "apple");
        assert!(opts.synonyms().is_none());
    }

    #[test]
    fn test_create_value_options_missing_value() {
        let err = CreateValueOptions::builder()
            .workspace_id("ws1")
            .entity("fruit")
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "value" });
        assert!(err.to_string().contains("value cannot be null"));
    }

    #[test]
    fn test_add_helpers_accumulate() {
        let opts = CreateValueOptionsBuilder::new("ws1", "fruit", "apple")
            .add_synonym("pink lady")
            .add_synonym("fuji")
            .build()
            .unwrap();
        assert_eq!(opts.synonyms().map(Vec::len), Some(2));
    }

    #[test]
    fn test_wire_name_of_value_type() {
        let value = CreateValueBuilder::new("zip")
            .value_type(ValueType::Patterns)
            .add_pattern(r"\d{5}")
            .build()
            .unwrap();
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, json!({"value": "zip", "patterns": ["\\d{5}"], "type": "patterns"}));
    }

    #[test]
    fn test_workspace_content_roundtrip() {
        let opts = CreateWorkspaceOptions::builder()
            .name("Pizza bot")
            .language("en")
            .add_intent(
                CreateIntentBuilder::new("order")
                    .add_example(CreateExample::new("I want a pizza").unwrap())
                    .build()
                    .unwrap(),
            )
            .add_counterexample(CreateCounterexample::new("pizza is round").unwrap())
            .build()
            .unwrap();

        let json = serde_json::to_string(&opts).unwrap();
        let back: CreateWorkspaceOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, opts);
        assert_eq!(opts.to_builder().build().unwrap(), opts);
    }

    #[test]
    fn test_nested_required_field_checked_on_deserialize() {
        let result = serde_json::from_value::<CreateWorkspaceOptions>(json!({
            "intents": [{"description": "no name"}]
        }));
        assert!(result.unwrap_err().to_string().contains("intent cannot be null"));
    }

    #[test]
    fn test_list_all_logs_requires_filter() {
        let err = ListAllLogsOptions::builder().filter("").build().unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "filter" });
    }
}
