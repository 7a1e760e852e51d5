//! WeCreate Core - article generation workflow.
//!
//! This crate provides:
//! - the workflow state machine (keyword → topic → outline → sections → finish)
//! - an async driver that executes generation calls against a
//!   [`GenerationClient`](wecreate_abstraction::GenerationClient)
//! - preview/export markdown composition
//! - configuration loading
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wecreate_client::MockGenerationClient;
//! use wecreate_core::{Intent, StudioDriver, WorkflowSettings, WorkflowStep};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = Arc::new(MockGenerationClient::new());
//!     let mut driver = StudioDriver::new(client, WorkflowSettings::default());
//!
//!     driver.dispatch(Intent::SubmitKeyword("AI Agents".into())).unwrap();
//!     driver.settle().await;
//!     let topic = driver.workflow().brief().unwrap().topics[0].clone();
//!
//!     driver.dispatch(Intent::SelectTopic(topic)).unwrap();
//!     driver.settle().await;
//!     driver.dispatch(Intent::ConfirmOutline).unwrap();
//!     driver.run_until(|wf| wf.step() == WorkflowStep::Done).await;
//! }
//! ```

pub mod config;
pub mod draft;
pub mod driver;
pub mod error;
pub mod preview;
pub mod workflow;

pub use config::{ConfigError, StudioConfig};
pub use draft::{ArticleDraft, DraftSection, SectionBody};
pub use driver::StudioDriver;
pub use error::IntentError;
pub use preview::{export_article, preview_markdown};
pub use workflow::{
    ArticleId, BusyFlags, BusyKind, CallKind, Completion, Failure, GenerationCall, Intent,
    Outcome, PendingCall, SectionField, Ticket, Workflow, WorkflowSettings, WorkflowStep,
    WorkflowView, WritingProgress, MAX_IMAGE_EXCERPT_CHARS,
};
