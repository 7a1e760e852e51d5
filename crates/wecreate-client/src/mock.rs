//! Offline generation client.
//!
//! Produces deterministic content derived from its inputs so the full wizard
//! can run without a backend (demos, CLI tests).

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use wecreate_abstraction::{
    GeneratedImage, GenerationClient, GenerationError, OutlineSection, SourceRef, TopicBrief,
    TopicIdea,
};

const ANGLES: [&str; 3] = ["Technology Analysis", "Practical Guide", "Emotional Story"];

/// A mock implementation of the `GenerationClient` trait.
#[derive(Debug, Clone, Default)]
pub struct MockGenerationClient {
    /// Artificial latency applied to every call.
    latency: Option<Duration>,
}

impl MockGenerationClient {
    /// Creates a mock client that answers immediately.
    #[must_use]
    pub const fn new() -> Self {
        Self { latency: None }
    }

    /// Creates a mock client that waits before answering each call.
    #[must_use]
    pub const fn with_latency(latency: Duration) -> Self {
        Self { latency: Some(latency) }
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    async fn ideate_topics(&self, keyword: &str) -> Result<TopicBrief, GenerationError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(GenerationError::InvalidRequest("keyword must not be empty".to_string()));
        }
        debug!(keyword = %keyword, "MockGenerationClient ideating topics");
        self.simulate_latency().await;

        let topics = ANGLES
            .iter()
            .enumerate()
            .map(|(i, angle)| TopicIdea {
                title: format!("{keyword}: perspective {}", i + 1),
                rationale: format!("A {} take on {keyword} that readers can act on.", angle.to_lowercase()),
                angle: (*angle).to_string(),
            })
            .collect();

        Ok(TopicBrief {
            summary: format!("Recent coverage of {keyword} centres on adoption, cost and trust."),
            sources: vec![SourceRef {
                title: format!("{keyword} weekly roundup"),
                url: "https://example.com/roundup".to_string(),
                excerpt: format!("What changed for {keyword} this week."),
                published_date: None,
            }],
            topics,
        })
    }

    async fn expand_outline(
        &self,
        topic_title: &str,
        _context_summary: &str,
    ) -> Result<Vec<OutlineSection>, GenerationError> {
        debug!(topic = %topic_title, "MockGenerationClient expanding outline");
        self.simulate_latency().await;

        Ok(vec![
            OutlineSection::new("Why it matters now", format!("Frame {topic_title} for a busy reader.")),
            OutlineSection::new("How it works", "Explain the moving parts without jargon."),
            OutlineSection::new("What to watch out for", "Risks, costs and common mistakes."),
            OutlineSection::new("Where this goes next", "Close with a forward-looking takeaway."),
        ])
    }

    async fn write_section(
        &self,
        section_title: &str,
        section_description: &str,
        _context_summary: &str,
    ) -> Result<String, GenerationError> {
        debug!(section = %section_title, "MockGenerationClient writing section");
        self.simulate_latency().await;

        Ok(format!(
            "{section_description} This part of the story, \"{section_title}\", walks through \
             one concrete example and ends with a question for the reader."
        ))
    }

    async fn generate_image(
        &self,
        context_excerpt: &str,
        style: &str,
    ) -> Result<GeneratedImage, GenerationError> {
        debug!(excerpt_len = context_excerpt.chars().count(), "MockGenerationClient generating image");
        self.simulate_latency().await;

        Ok(GeneratedImage {
            url: format!("https://example.com/images/cover-{}.png", context_excerpt.chars().count()),
            prompt: format!("{style} illustration of the article's opening"),
        })
    }

    async fn polish(&self, content: &str, style: &str) -> Result<String, GenerationError> {
        debug!(content_len = content.len(), style = %style, "MockGenerationClient polishing");
        self.simulate_latency().await;

        Ok(content
            .replace("In conclusion, ", "So, ")
            .replace("It is important to note that ", "")
            .replace("walks through", "talks you through"))
    }

    fn endpoint(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_ideation_is_deterministic() {
        let client = MockGenerationClient::new();
        let first = client.ideate_topics("AI Agents").await.unwrap();
        let second = client.ideate_topics("AI Agents").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.topics.len(), 3);
        assert!(first.topics[0].title.starts_with("AI Agents"));
    }

    #[tokio::test]
    async fn test_mock_rejects_blank_keyword() {
        let client = MockGenerationClient::new();
        assert!(client.ideate_topics(" ").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_outline_has_four_sections() {
        let client = MockGenerationClient::new();
        let outline = client.expand_outline("Topic", "").await.unwrap();
        assert_eq!(outline.len(), 4);
    }

    #[tokio::test]
    async fn test_mock_polish_rewrites() {
        let client = MockGenerationClient::new();
        let polished = client.polish("In conclusion, it works.", "Conversational").await.unwrap();
        assert_eq!(polished, "So, it works.");
    }
}
