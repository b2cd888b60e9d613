//! Watson SDK
//!
//! An async client for IBM Watson Conversation v1 and Visual Recognition v4.
//!
//! # Features
//!
//! - **Validated options**: every call takes an options struct whose builder
//!   rejects missing required fields before any request is sent
//! - **Lenient models**: responses tolerate missing, extra and drifted fields
//! - **Dynamic models**: message context and output keep unknown properties
//! - **Auth**: basic, bearer and IAM API keys with cached token refresh
//!
//! # Example
//!
//! ```no_run
//! use watson_sdk::conversation::{Conversation, ListWorkspacesOptions, VERSION_DATE_2017_05_26};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = Conversation::from_env(VERSION_DATE_2017_05_26)?;
//!     let options = ListWorkspacesOptions::builder().page_limit(10).build()?;
//!
//!     for workspace in service.list_workspaces(&options).await?.workspaces {
//!         println!("{:?}", workspace.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod conversation;
pub mod error;
pub mod formatters;
pub mod models;
pub mod options;
pub mod visual_recognition;

pub use auth::Authenticator;
pub use client::WatsonClient;
pub use config::Config;
pub use error::{ClientError, ClientResult, ValidationError};
pub use models::{DynamicModel, FileWithMetadata};
