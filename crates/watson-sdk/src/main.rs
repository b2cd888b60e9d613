//! Watson CLI - Entry Point
//!
//! Small command-line front end over the Conversation and Visual
//! Recognition clients. Credentials come from the environment or `.env`.

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use watson_sdk::conversation::{self, Context, Conversation, ListWorkspacesOptions, MessageOptionsBuilder};
use watson_sdk::formatters;
use watson_sdk::visual_recognition::{
    self, AnalyzeOptionsBuilder, Feature, ListCollectionsOptions, VisualRecognition,
};

#[derive(Parser, Debug)]
#[command(name = "watson")]
#[command(about = "Command-line client for IBM Watson services")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    service: Service,

    /// Print pretty JSON instead of Markdown
    #[arg(long, global = true)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "RUST_LOG", global = true)]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Service {
    /// Watson Conversation v1
    Conversation {
        /// API version date
        #[arg(long, default_value = conversation::VERSION_DATE_2017_05_26)]
        version_date: String,

        #[command(subcommand)]
        command: ConversationCommand,
    },
    /// Watson Visual Recognition v4
    Vision {
        /// API version date
        #[arg(long, default_value = visual_recognition::VERSION_DATE_2019_02_11)]
        version_date: String,

        #[command(subcommand)]
        command: VisionCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConversationCommand {
    /// List workspaces
    ListWorkspaces {
        #[arg(long)]
        page_limit: Option<i64>,
    },
    /// Send one message to a workspace
    Message {
        #[arg(long)]
        workspace_id: String,

        #[arg(long)]
        text: String,

        /// Continue an existing conversation
        #[arg(long)]
        conversation_id: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum VisionCommand {
    /// List collections
    ListCollections,
    /// Detect objects in an image by URL
    Analyze {
        #[arg(long, required = true)]
        collection_id: Vec<String>,

        #[arg(long, required = true)]
        image_url: Vec<String>,

        /// Minimum detection score
        #[arg(long)]
        threshold: Option<f64>,
    },
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_conversation(
    version: &str,
    command: ConversationCommand,
    json: bool,
) -> anyhow::Result<()> {
    let service = Conversation::from_env(version)?;

    match command {
        ConversationCommand::ListWorkspaces { page_limit } => {
            let mut builder = ListWorkspacesOptions::builder();
            if let Some(limit) = page_limit {
                builder = builder.page_limit(limit);
            }
            let collection = service.list_workspaces(&builder.build()?).await?;
            if json {
                let items: Vec<_> =
                    collection.workspaces.iter().map(formatters::compact_workspace).collect();
                print_json(&items)?;
            } else {
                print!("{}", formatters::format_workspaces_markdown(&collection.workspaces));
            }
        }
        ConversationCommand::Message { workspace_id, text, conversation_id } => {
            let mut builder = MessageOptionsBuilder::new(workspace_id).text(text);
            if let Some(id) = conversation_id {
                builder = builder.context(Context::with_conversation_id(id));
            }
            let response = service.message(&builder.build()?).await?;
            if json {
                print_json(&formatters::compact_message(&response))?;
            } else {
                print!("{}", formatters::format_message_markdown(&response));
            }
        }
    }

    Ok(())
}

async fn run_vision(version: &str, command: VisionCommand, json: bool) -> anyhow::Result<()> {
    let service = VisualRecognition::from_env(version)?;

    match command {
        VisionCommand::ListCollections => {
            let list = service.list_collections(&ListCollectionsOptions::builder().build()?).await?;
            if json {
                let items: Vec<_> = list.collections.iter().map(formatters::compact_collection).collect();
                print_json(&items)?;
            } else {
                print!("{}", formatters::format_collections_markdown(&list.collections));
            }
        }
        VisionCommand::Analyze { collection_id, image_url, threshold } => {
            let mut builder = AnalyzeOptionsBuilder::new(collection_id, vec![Feature::Objects])
                .image_url(image_url);
            if let Some(threshold) = threshold {
                builder = builder.threshold(threshold);
            }
            let response = service.analyze(&builder.build()?).await?;
            if json {
                print_json(&formatters::compact_analysis(&response))?;
            } else {
                print!("{}", formatters::format_analysis_markdown(&response));
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), service = ?cli.service, "Starting watson CLI");

    match cli.service {
        Service::Conversation { version_date, command } => {
            run_conversation(&version_date, command, cli.json).await
        }
        Service::Vision { version_date, command } => run_vision(&version_date, command, cli.json).await,
    }
}
