//! Generation calls issued by the workflow and the completions fed back to it.

use serde::{Deserialize, Serialize};
use std::fmt;
use wecreate_abstraction::{GeneratedImage, GenerationError, OutlineSection, TopicBrief};

/// Identity of one article, from the first keyword until the user starts over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArticleId(pub u64);

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "article-{}", self.0)
    }
}

/// Tag carried by every call so its completion can be matched at resumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket {
    /// Article the call was issued for.
    pub article: ArticleId,
    /// Sequence number, unique across the workflow's lifetime.
    pub seq: u64,
}

/// The generation capability a call uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    /// Topic ideation.
    IdeateTopics,
    /// Outline expansion.
    ExpandOutline,
    /// Section writing.
    WriteSection,
    /// Image generation.
    GenerateImage,
    /// Polish pass.
    Polish,
}

impl CallKind {
    /// Returns a display string for the call.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IdeateTopics => "topic ideation",
            Self::ExpandOutline => "outline expansion",
            Self::WriteSection => "section writing",
            Self::GenerateImage => "image generation",
            Self::Polish => "polish",
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload of a generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationCall {
    /// Ideate topics for a keyword.
    IdeateTopics {
        /// Trimmed keyword.
        keyword: String,
    },
    /// Expand the chosen topic into an outline.
    ExpandOutline {
        /// Title of the chosen topic.
        topic_title: String,
        /// Research summary of the current brief.
        summary: String,
    },
    /// Write the body of one outline section.
    WriteSection {
        /// Outline index of the section.
        index: usize,
        /// Section heading.
        title: String,
        /// Section guidance.
        description: String,
        /// Research summary used as context.
        context: String,
    },
    /// Generate an illustration.
    GenerateImage {
        /// Leading excerpt of the draft.
        excerpt: String,
        /// Illustration style.
        style: String,
    },
    /// Rewrite the full draft.
    Polish {
        /// Full draft text.
        content: String,
        /// Target style.
        style: String,
    },
}

impl GenerationCall {
    /// Returns the capability this call uses.
    pub fn kind(&self) -> CallKind {
        match self {
            Self::IdeateTopics { .. } => CallKind::IdeateTopics,
            Self::ExpandOutline { .. } => CallKind::ExpandOutline,
            Self::WriteSection { .. } => CallKind::WriteSection,
            Self::GenerateImage { .. } => CallKind::GenerateImage,
            Self::Polish { .. } => CallKind::Polish,
        }
    }
}

/// A call the workflow wants executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCall {
    /// Tag to return with the completion.
    pub ticket: Ticket,
    /// What to request.
    pub call: GenerationCall,
}

/// Result of a generation call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Result of topic ideation.
    Topics(Result<TopicBrief, GenerationError>),
    /// Result of outline expansion.
    Outline(Result<Vec<OutlineSection>, GenerationError>),
    /// Result of section writing.
    Section(Result<String, GenerationError>),
    /// Result of image generation.
    Image(Result<GeneratedImage, GenerationError>),
    /// Result of a polish pass.
    Polished(Result<String, GenerationError>),
}

impl Outcome {
    /// Returns the capability that produced this outcome.
    pub fn kind(&self) -> CallKind {
        match self {
            Self::Topics(_) => CallKind::IdeateTopics,
            Self::Outline(_) => CallKind::ExpandOutline,
            Self::Section(_) => CallKind::WriteSection,
            Self::Image(_) => CallKind::GenerateImage,
            Self::Polished(_) => CallKind::Polish,
        }
    }

    /// Builds the failed outcome for a call of the given kind.
    pub fn failed(kind: CallKind, error: GenerationError) -> Self {
        match kind {
            CallKind::IdeateTopics => Self::Topics(Err(error)),
            CallKind::ExpandOutline => Self::Outline(Err(error)),
            CallKind::WriteSection => Self::Section(Err(error)),
            CallKind::GenerateImage => Self::Image(Err(error)),
            CallKind::Polish => Self::Polished(Err(error)),
        }
    }
}

/// A finished call, tagged with the ticket it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Ticket of the originating call.
    pub ticket: Ticket,
    /// What the service returned.
    pub outcome: Outcome,
}
