//! Watson Conversation v1.
//!
//! Build workspaces of intents, entities and dialog nodes, then send user
//! input through [`Conversation::message`].
//!
//! ```no_run
//! use watson_sdk::conversation::{Conversation, MessageOptionsBuilder, VERSION_DATE_2017_05_26};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let service = Conversation::from_env(VERSION_DATE_2017_05_26)?;
//! let options = MessageOptionsBuilder::new("my-workspace").text("Hello").build()?;
//! let response = service.message(&options).await?;
//! println!("{}", response.text_concatenated(" "));
//! # Ok(())
//! # }
//! ```

mod message;
mod models;
mod options;

pub use message::*;
pub use models::*;
pub use options::*;

use crate::client::{JsonBody, Query, WatsonClient};
use crate::config::Config;
use crate::error::ClientResult;

/// Service name used for environment lookup.
pub const SERVICE_NAME: &str = "conversation";

/// Default service endpoint.
pub const DEFAULT_SERVICE_URL: &str = "https://gateway.watsonplatform.net/conversation/api";

pub const VERSION_DATE_2017_05_26: &str = "2017-05-26";
pub const VERSION_DATE_2017_04_21: &str = "2017-04-21";
pub const VERSION_DATE_2017_02_03: &str = "2017-02-03";
pub const VERSION_DATE_2016_09_20: &str = "2016-09-20";
pub const VERSION_DATE_2016_07_11: &str = "2016-07-11";

/// Conversation v1 client.
#[derive(Debug, Clone)]
pub struct Conversation {
    client: WatsonClient,
}

impl Conversation {
    /// Create a client from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        Ok(Self { client: WatsonClient::new(config)? })
    }

    /// Create a client from `CONVERSATION_*` environment variables.
    pub fn from_env(version: &str) -> anyhow::Result<Self> {
        Self::new(Config::from_env(SERVICE_NAME, DEFAULT_SERVICE_URL, version)?)
    }

    /// Wrap an existing client.
    #[must_use]
    pub const fn with_client(client: WatsonClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub const fn client(&self) -> &WatsonClient {
        &self.client
    }

    // =========================================================================
    // Message
    // =========================================================================

    /// Send user input to a workspace and get the dialog response.
    pub async fn message(&self, options: &MessageOptions) -> ClientResult<MessageResponse> {
        let url = self.client.endpoint(&["v1", "workspaces", options.workspace_id(), "message"])?;
        let query = Query::new().push_opt("nodes_visited_details", options.nodes_visited_details());

        let request = MessageRequest {
            input: options.input().cloned(),
            alternate_intents: options.alternate_intents().copied(),
            context: options.context().cloned(),
            entities: options.entities().cloned().unwrap_or_default(),
            intents: options.intents().cloned().unwrap_or_default(),
            output: options.output().cloned(),
        };

        tracing::debug!(workspace_id = %options.workspace_id(), "Sending message");
        self.client.post(url, &query, &serde_json::to_value(&request)?).await
    }

    // =========================================================================
    // Workspaces
    // =========================================================================

    pub async fn create_workspace(&self, options: &CreateWorkspaceOptions) -> ClientResult<Workspace> {
        let url = self.client.endpoint(&["v1", "workspaces"])?;
        let body = JsonBody::new()
            .set_opt("name", options.name())?
            .set_opt("description", options.description())?
            .set_opt("language", options.language())?
            .set_opt("intents", options.intents())?
            .set_opt("entities", options.entities())?
            .set_opt("dialog_nodes", options.dialog_nodes())?
            .set_opt("counterexamples", options.counterexamples())?
            .set_opt("metadata", options.metadata())?
            .set_opt("learning_opt_out", options.learning_opt_out())?;
        self.client.post(url, &Query::new(), &body.into_value()).await
    }

    pub async fn delete_workspace(&self, options: &DeleteWorkspaceOptions) -> ClientResult<()> {
        let url = self.client.endpoint(&["v1", "workspaces", options.workspace_id()])?;
        self.client.delete(url, &Query::new()).await
    }

    /// Get a workspace; with `export` set, including all of its content.
    pub async fn get_workspace(&self, options: &GetWorkspaceOptions) -> ClientResult<WorkspaceExport> {
        let url = self.client.endpoint(&["v1", "workspaces", options.workspace_id()])?;
        let query = Query::new().push_opt("export", options.export());
        self.client.get(url, &query).await
    }

    pub async fn list_workspaces(
        &self,
        options: &ListWorkspacesOptions,
    ) -> ClientResult<WorkspaceCollection> {
        let url = self.client.endpoint(&["v1", "workspaces"])?;
        let query = Query::new()
            .push_opt("page_limit", options.page_limit())
            .push_opt("include_count", options.include_count())
            .push_opt("sort", options.sort())
            .push_opt("cursor", options.cursor());
        self.client.get(url, &query).await
    }

    /// Update a workspace. Content lists replace the existing ones unless
    /// `append` is set.
    pub async fn update_workspace(&self, options: &UpdateWorkspaceOptions) -> ClientResult<Workspace> {
        let url = self.client.endpoint(&["v1", "workspaces", options.workspace_id()])?;
        let query = Query::new().push_opt("append", options.append());
        let body = JsonBody::new()
            .set_opt("name", options.name())?
            .set_opt("description", options.description())?
            .set_opt("language", options.language())?
            .set_opt("intents", options.intents())?
            .set_opt("entities", options.entities())?
            .set_opt("dialog_nodes", options.dialog_nodes())?
            .set_opt("counterexamples", options.counterexamples())?
            .set_opt("metadata", options.metadata())?
            .set_opt("learning_opt_out", options.learning_opt_out())?;
        self.client.post(url, &query, &body.into_value()).await
    }

    // =========================================================================
    // Intents
    // =========================================================================

    pub async fn create_intent(&self, options: &CreateIntentOptions) -> ClientResult<Intent> {
        let url = self.client.endpoint(&["v1", "workspaces", options.workspace_id(), "intents"])?;
        let body = JsonBody::new()
            .set("intent", options.intent())?
            .set_opt("description", options.description())?
            .set_opt("examples", options.examples())?;
        self.client.post(url, &Query::new(), &body.into_value()).await
    }

    pub async fn delete_intent(&self, options: &DeleteIntentOptions) -> ClientResult<()> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "intents",
            options.intent(),
        ])?;
        self.client.delete(url, &Query::new()).await
    }

    pub async fn get_intent(&self, options: &GetIntentOptions) -> ClientResult<IntentExport> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "intents",
            options.intent(),
        ])?;
        let query = Query::new().push_opt("export", options.export());
        self.client.get(url, &query).await
    }

    pub async fn list_intents(&self, options: &ListIntentsOptions) -> ClientResult<IntentCollection> {
        let url = self.client.endpoint(&["v1", "workspaces", options.workspace_id(), "intents"])?;
        let query = Query::new()
            .push_opt("export", options.export())
            .push_opt("page_limit", options.page_limit())
            .push_opt("include_count", options.include_count())
            .push_opt("sort", options.sort())
            .push_opt("cursor", options.cursor());
        self.client.get(url, &query).await
    }

    pub async fn update_intent(&self, options: &UpdateIntentOptions) -> ClientResult<Intent> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "intents",
            options.intent(),
        ])?;
        let body = JsonBody::new()
            .set_opt("intent", options.new_intent())?
            .set_opt("description", options.new_description())?
            .set_opt("examples", options.new_examples())?;
        self.client.post(url, &Query::new(), &body.into_value()).await
    }

    // =========================================================================
    // Examples
    // =========================================================================

    pub async fn create_example(&self, options: &CreateExampleOptions) -> ClientResult<Example> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "intents",
            options.intent(),
            "examples",
        ])?;
        let body = JsonBody::new().set("text", options.text())?;
        self.client.post(url, &Query::new(), &body.into_value()).await
    }

    pub async fn delete_example(&self, options: &DeleteExampleOptions) -> ClientResult<()> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "intents",
            options.intent(),
            "examples",
            options.text(),
        ])?;
        self.client.delete(url, &Query::new()).await
    }

    pub async fn get_example(&self, options: &GetExampleOptions) -> ClientResult<Example> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "intents",
            options.intent(),
            "examples",
            options.text(),
        ])?;
        self.client.get(url, &Query::new()).await
    }

    pub async fn list_examples(&self, options: &ListExamplesOptions) -> ClientResult<ExampleCollection> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "intents",
            options.intent(),
            "examples",
        ])?;
        let query = Query::new()
            .push_opt("page_limit", options.page_limit())
            .push_opt("include_count", options.include_count())
            .push_opt("sort", options.sort())
            .push_opt("cursor", options.cursor());
        self.client.get(url, &query).await
    }

    pub async fn update_example(&self, options: &UpdateExampleOptions) -> ClientResult<Example> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "intents",
            options.intent(),
            "examples",
            options.text(),
        ])?;
        let body = JsonBody::new().set_opt("text", options.new_text())?;
        self.client.post(url, &Query::new(), &body.into_value()).await
    }

    // =========================================================================
    // Entities
    // =========================================================================

    pub async fn create_entity(&self, options: &CreateEntityOptions) -> ClientResult<Entity> {
        let url = self.client.endpoint(&["v1", "workspaces", options.workspace_id(), "entities"])?;
        let body = JsonBody::new()
            .set("entity", options.entity())?
            .set_opt("description", options.description())?
            .set_opt("metadata", options.metadata())?
            .set_opt("values", options.values())?
            .set_opt("fuzzy_match", options.fuzzy_match())?;
        self.client.post(url, &Query::new(), &body.into_value()).await
    }

    pub async fn delete_entity(&self, options: &DeleteEntityOptions) -> ClientResult<()> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "entities",
            options.entity(),
        ])?;
        self.client.delete(url, &Query::new()).await
    }

    pub async fn get_entity(&self, options: &GetEntityOptions) -> ClientResult<EntityExport> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "entities",
            options.entity(),
        ])?;
        let query = Query::new().push_opt("export", options.export());
        self.client.get(url, &query).await
    }

    pub async fn list_entities(&self, options: &ListEntitiesOptions) -> ClientResult<EntityCollection> {
        let url = self.client.endpoint(&["v1", "workspaces", options.workspace_id(), "entities"])?;
        let query = Query::new()
            .push_opt("export", options.export())
            .push_opt("page_limit", options.page_limit())
            .push_opt("include_count", options.include_count())
            .push_opt("sort", options.sort())
            .push_opt("cursor", options.cursor());
        self.client.get(url, &query).await
    }

    pub async fn update_entity(&self, options: &UpdateEntityOptions) -> ClientResult<Entity> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "entities",
            options.entity(),
        ])?;
        let body = JsonBody::new()
            .set_opt("entity", options.new_entity())?
            .set_opt("description", options.new_description())?
            .set_opt("metadata", options.new_metadata())?
            .set_opt("fuzzy_match", options.new_fuzzy_match())?
            .set_opt("values", options.new_values())?;
        self.client.post(url, &Query::new(), &body.into_value()).await
    }

    // =========================================================================
    // Values
    // =========================================================================

    pub async fn create_value(&self, options: &CreateValueOptions) -> ClientResult<EntityValue> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "entities",
            options.entity(),
            "values",
        ])?;
        let body = JsonBody::new()
            .set("value", options.value())?
            .set_opt("metadata", options.metadata())?
            .set_opt("synonyms", options.synonyms())?
            .set_opt("patterns", options.patterns())?
            .set_opt("type", options.value_type())?;
        self.client.post(url, &Query::new(), &body.into_value()).await
    }

    pub async fn delete_value(&self, options: &DeleteValueOptions) -> ClientResult<()> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "entities",
            options.entity(),
            "values",
            options.value(),
        ])?;
        self.client.delete(url, &Query::new()).await
    }

    pub async fn get_value(&self, options: &GetValueOptions) -> ClientResult<ValueExport> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "entities",
            options.entity(),
            "values",
            options.value(),
        ])?;
        let query = Query::new().push_opt("export", options.export());
        self.client.get(url, &query).await
    }

    pub async fn list_values(&self, options: &ListValuesOptions) -> ClientResult<ValueCollection> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "entities",
            options.entity(),
            "values",
        ])?;
        let query = Query::new()
            .push_opt("export", options.export())
            .push_opt("page_limit", options.page_limit())
            .push_opt("include_count", options.include_count())
            .push_opt("sort", options.sort())
            .push_opt("cursor", options.cursor());
        self.client.get(url, &query).await
    }

    pub async fn update_value(&self, options: &UpdateValueOptions) -> ClientResult<EntityValue> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "entities",
            options.entity(),
            "values",
            options.value(),
        ])?;
        let body = JsonBody::new()
            .set_opt("value", options.new_value())?
            .set_opt("metadata", options.new_metadata())?
            .set_opt("type", options.new_type())?
            .set_opt("synonyms", options.new_synonyms())?
            .set_opt("patterns", options.new_patterns())?;
        self.client.post(url, &Query::new(), &body.into_value()).await
    }

    // =========================================================================
    // Synonyms
    // =========================================================================

    pub async fn create_synonym(&self, options: &CreateSynonymOptions) -> ClientResult<Synonym> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "entities",
            options.entity(),
            "values",
            options.value(),
            "synonyms",
        ])?;
        let body = JsonBody::new().set("synonym", options.synonym())?;
        self.client.post(url, &Query::new(), &body.into_value()).await
    }

    pub async fn delete_synonym(&self, options: &DeleteSynonymOptions) -> ClientResult<()> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "entities",
            options.entity(),
            "values",
            options.value(),
            "synonyms",
            options.synonym(),
        ])?;
        self.client.delete(url, &Query::new()).await
    }

    pub async fn get_synonym(&self, options: &GetSynonymOptions) -> ClientResult<Synonym> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "entities",
            options.entity(),
            "values",
            options.value(),
            "synonyms",
            options.synonym(),
        ])?;
        self.client.get(url, &Query::new()).await
    }

    pub async fn list_synonyms(&self, options: &ListSynonymsOptions) -> ClientResult<SynonymCollection> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "entities",
            options.entity(),
            "values",
            options.value(),
            "synonyms",
        ])?;
        let query = Query::new()
            .push_opt("page_limit", options.page_limit())
            .push_opt("include_count", options.include_count())
            .push_opt("sort", options.sort())
            .push_opt("cursor", options.cursor());
        self.client.get(url, &query).await
    }

    pub async fn update_synonym(&self, options: &UpdateSynonymOptions) -> ClientResult<Synonym> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "entities",
            options.entity(),
            "values",
            options.value(),
            "synonyms",
            options.synonym(),
        ])?;
        let body = JsonBody::new().set_opt("synonym", options.new_synonym())?;
        self.client.post(url, &Query::new(), &body.into_value()).await
    }

    // =========================================================================
    // Dialog nodes
    // =========================================================================

    pub async fn create_dialog_node(&self, options: &CreateDialogNodeOptions) -> ClientResult<DialogNode> {
        let url =
            self.client.endpoint(&["v1", "workspaces", options.workspace_id(), "dialog_nodes"])?;
        let body = JsonBody::new()
            .set("dialog_node", options.dialog_node())?
            .set_opt("description", options.description())?
            .set_opt("conditions", options.conditions())?
            .set_opt("parent", options.parent())?
            .set_opt("previous_sibling", options.previous_sibling())?
            .set_opt("output", options.output())?
            .set_opt("context", options.context())?
            .set_opt("metadata", options.metadata())?
            .set_opt("next_step", options.next_step())?
            .set_opt("actions", options.actions())?
            .set_opt("title", options.title())?
            .set_opt("type", options.node_type())?
            .set_opt("event_name", options.event_name())?
            .set_opt("variable", options.variable())?;
        self.client.post(url, &Query::new(), &body.into_value()).await
    }

    pub async fn delete_dialog_node(&self, options: &DeleteDialogNodeOptions) -> ClientResult<()> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "dialog_nodes",
            options.dialog_node(),
        ])?;
        self.client.delete(url, &Query::new()).await
    }

    pub async fn get_dialog_node(&self, options: &GetDialogNodeOptions) -> ClientResult<DialogNode> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "dialog_nodes",
            options.dialog_node(),
        ])?;
        self.client.get(url, &Query::new()).await
    }

    pub async fn list_dialog_nodes(
        &self,
        options: &ListDialogNodesOptions,
    ) -> ClientResult<DialogNodeCollection> {
        let url =
            self.client.endpoint(&["v1", "workspaces", options.workspace_id(), "dialog_nodes"])?;
        let query = Query::new()
            .push_opt("page_limit", options.page_limit())
            .push_opt("include_count", options.include_count())
            .push_opt("sort", options.sort())
            .push_opt("cursor", options.cursor());
        self.client.get(url, &query).await
    }

    pub async fn update_dialog_node(&self, options: &UpdateDialogNodeOptions) -> ClientResult<DialogNode> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "dialog_nodes",
            options.dialog_node(),
        ])?;
        let body = JsonBody::new()
            .set_opt("dialog_node", options.new_dialog_node())?
            .set_opt("description", options.new_description())?
            .set_opt("conditions", options.new_conditions())?
            .set_opt("parent", options.new_parent())?
            .set_opt("previous_sibling", options.new_previous_sibling())?
            .set_opt("output", options.new_output())?
            .set_opt("context", options.new_context())?
            .set_opt("metadata", options.new_metadata())?
            .set_opt("next_step", options.new_next_step())?
            .set_opt("title", options.new_title())?
            .set_opt("type", options.new_type())?
            .set_opt("event_name", options.new_event_name())?
            .set_opt("variable", options.new_variable())?
            .set_opt("actions", options.new_actions())?;
        self.client.post(url, &Query::new(), &body.into_value()).await
    }

    // =========================================================================
    // Counterexamples
    // =========================================================================

    pub async fn create_counterexample(
        &self,
        options: &CreateCounterexampleOptions,
    ) -> ClientResult<Counterexample> {
        let url =
            self.client.endpoint(&["v1", "workspaces", options.workspace_id(), "counterexamples"])?;
        let body = JsonBody::new().set("text", options.text())?;
        self.client.post(url, &Query::new(), &body.into_value()).await
    }

    pub async fn delete_counterexample(&self, options: &DeleteCounterexampleOptions) -> ClientResult<()> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "counterexamples",
            options.text(),
        ])?;
        self.client.delete(url, &Query::new()).await
    }

    pub async fn get_counterexample(
        &self,
        options: &GetCounterexampleOptions,
    ) -> ClientResult<Counterexample> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "counterexamples",
            options.text(),
        ])?;
        self.client.get(url, &Query::new()).await
    }

    pub async fn list_counterexamples(
        &self,
        options: &ListCounterexamplesOptions,
    ) -> ClientResult<CounterexampleCollection> {
        let url =
            self.client.endpoint(&["v1", "workspaces", options.workspace_id(), "counterexamples"])?;
        let query = Query::new()
            .push_opt("page_limit", options.page_limit())
            .push_opt("include_count", options.include_count())
            .push_opt("sort", options.sort())
            .push_opt("cursor", options.cursor());
        self.client.get(url, &query).await
    }

    pub async fn update_counterexample(
        &self,
        options: &UpdateCounterexampleOptions,
    ) -> ClientResult<Counterexample> {
        let url = self.client.endpoint(&[
            "v1",
            "workspaces",
            options.workspace_id(),
            "counterexamples",
            options.text(),
        ])?;
        let body = JsonBody::new().set_opt("text", options.new_text())?;
        self.client.post(url, &Query::new(), &body.into_value()).await
    }

    // =========================================================================
    // Logs
    // =========================================================================

    /// List the message log of one workspace.
    pub async fn list_logs(&self, options: &ListLogsOptions) -> ClientResult<LogCollection> {
        let url = self.client.endpoint(&["v1", "workspaces", options.workspace_id(), "logs"])?;
        let query = Query::new()
            .push_opt("sort", options.sort())
            .push_opt("filter", options.filter())
            .push_opt("page_limit", options.page_limit())
            .push_opt("cursor", options.cursor());
        self.client.get(url, &query).await
    }

    /// List message logs across workspaces matching a filter.
    pub async fn list_all_logs(&self, options: &ListAllLogsOptions) -> ClientResult<LogCollection> {
        let url = self.client.endpoint(&["v1", "logs"])?;
        let query = Query::new()
            .push("filter", options.filter())
            .push_opt("sort", options.sort())
            .push_opt("page_limit", options.page_limit())
            .push_opt("cursor", options.cursor());
        self.client.get(url, &query).await
    }
}
