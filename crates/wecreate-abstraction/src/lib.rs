//! Generation abstraction layer for WeCreate.
//!
//! This crate defines the article data model shared by every other crate and
//! the `GenerationClient` trait through which the workflow talks to the remote
//! generation service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Represents an error that can occur when calling the generation service.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationError {
    /// The request was rejected before it was sent (e.g., a blank keyword).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The request could not be delivered (network issues, timeouts).
    #[error("Request error: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("Service error ({status}): {message}")]
    Remote {
        /// HTTP status code returned by the service.
        status: u16,
        /// Body or detail message returned by the service.
        message: String,
    },

    /// The service answered, but the body could not be used.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl GenerationError {
    /// Returns true if the failure happened before anything reached the service.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }
}

/// The language model family the service should use for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    /// Google Gemini (the service default).
    #[default]
    Gemini,
    /// OpenAI GPT models.
    #[serde(rename = "openai")]
    OpenAI,
}

impl ModelProvider {
    /// Returns the identifier the service expects on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAI => "openai",
        }
    }
}

impl fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "openai" | "gpt" => Ok(Self::OpenAI),
            other => Err(format!("unknown model provider '{other}' (expected gemini or openai)")),
        }
    }
}

/// A background source found while researching a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Title of the source page.
    pub title: String,
    /// Link to the source page.
    pub url: String,
    /// Short excerpt of the page content.
    pub excerpt: String,
    /// Publication date, when the search backend reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
}

/// A candidate article idea proposed for a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicIdea {
    /// The proposed headline.
    pub title: String,
    /// Why the topic is worth writing about.
    pub rationale: String,
    /// Short label for the writing angle (e.g. "Technology Analysis").
    pub angle: String,
}

/// The result of topic ideation for one keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicBrief {
    /// Research summary used as writing context for later steps.
    pub summary: String,
    /// Sources the summary was built from, in ranking order.
    pub sources: Vec<SourceRef>,
    /// Candidate topics, in the order the service proposed them.
    pub topics: Vec<TopicIdea>,
}

/// One section stub of an article outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineSection {
    /// Section heading.
    pub title: String,
    /// Guidance on what the section should cover.
    pub description: String,
    /// Bullet points the section should touch.
    #[serde(default)]
    pub key_points: Vec<String>,
}

impl OutlineSection {
    /// Creates a section without key points.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into(), key_points: Vec::new() }
    }
}

/// An illustration generated for an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Absolute URL of the image.
    pub url: String,
    /// The image prompt the service derived from the article.
    pub prompt: String,
}

/// A trait for talking to the remote generation service.
///
/// Every method is a single request/response exchange. Implementations keep
/// no state between calls and never retry on their own.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Researches a keyword and proposes candidate topics.
    ///
    /// # Errors
    /// Returns `GenerationError::InvalidRequest` for a blank keyword, or the
    /// transport/service failure otherwise.
    async fn ideate_topics(&self, keyword: &str) -> Result<TopicBrief, GenerationError>;

    /// Expands a chosen topic into an ordered list of sections.
    async fn expand_outline(
        &self,
        topic_title: &str,
        context_summary: &str,
    ) -> Result<Vec<OutlineSection>, GenerationError>;

    /// Writes the body of one section.
    async fn write_section(
        &self,
        section_title: &str,
        section_description: &str,
        context_summary: &str,
    ) -> Result<String, GenerationError>;

    /// Generates an illustration from a leading excerpt of the article.
    async fn generate_image(
        &self,
        context_excerpt: &str,
        style: &str,
    ) -> Result<GeneratedImage, GenerationError>;

    /// Rewrites the full article text in the given style.
    async fn polish(&self, content: &str, style: &str) -> Result<String, GenerationError>;

    /// Checks that the service is reachable.
    async fn health(&self) -> Result<(), GenerationError> {
        Ok(())
    }

    /// Returns a human-readable description of where requests go.
    fn endpoint(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parsing() {
        assert_eq!("gemini".parse::<ModelProvider>(), Ok(ModelProvider::Gemini));
        assert_eq!(" OpenAI ".parse::<ModelProvider>(), Ok(ModelProvider::OpenAI));
        assert!("claude".parse::<ModelProvider>().is_err());
    }

    #[test]
    fn test_provider_wire_name() {
        let json = serde_json::to_string(&ModelProvider::OpenAI).unwrap();
        assert_eq!(json, "\"openai\"");
        assert_eq!(ModelProvider::default().to_string(), "gemini");
    }

    #[test]
    fn test_error_display() {
        let err = GenerationError::Remote { status: 500, message: "boom".to_string() };
        assert_eq!(err.to_string(), "Service error (500): boom");
        assert!(!err.is_local());
        assert!(GenerationError::InvalidRequest("blank".to_string()).is_local());
    }

    #[test]
    fn test_outline_section_key_points_default() {
        let section: OutlineSection =
            serde_json::from_str(r#"{"title": "Intro", "description": "Why now"}"#).unwrap();
        assert_eq!(section, OutlineSection::new("Intro", "Why now"));
    }
}
