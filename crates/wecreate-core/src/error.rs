// Error types for the article workflow

use thiserror::Error;

use crate::workflow::{BusyKind, WorkflowStep};

/// Result type for intent handling
pub type Result<T> = std::result::Result<T, IntentError>;

/// Reasons an intent is rejected before any state changes or calls are issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    /// Keyword is blank after trimming
    #[error("Keyword must not be empty")]
    EmptyKeyword,

    /// The call this intent would issue is already in flight
    #[error("A {0} request is already in progress")]
    Busy(BusyKind),

    /// Intent does not apply to the current step
    #[error("This action needs the {expected} step, but the workflow is at {actual}")]
    WrongStep {
        /// Step the intent is valid in
        expected: WorkflowStep,
        /// Step the workflow is at
        actual: WorkflowStep,
    },

    /// Selected topic is not part of the current brief
    #[error("Topic '{0}' is not one of the current ideas")]
    UnknownTopic(String),

    /// Outline index out of range
    #[error("Outline has {len} sections, no section at index {index}")]
    SectionOutOfRange {
        /// Requested index
        index: usize,
        /// Outline length
        len: usize,
    },

    /// Nothing to write from
    #[error("Outline has no sections")]
    EmptyOutline,

    /// Nothing to polish or illustrate
    #[error("Article draft is empty")]
    EmptyDraft,
}
