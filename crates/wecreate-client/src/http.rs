//! HTTP implementation of the `GenerationClient` trait.
//!
//! Each operation is one JSON `POST` against the WeCreate backend:
//!
//! | Operation | Endpoint |
//! |---|---|
//! | topic ideation | `/api/topics/generate` |
//! | outline expansion | `/api/articles/outline` |
//! | section writing | `/api/articles/write_section` |
//! | image generation | `/api/images/generate` |
//! | polishing | `/api/articles/polish` |

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use wecreate_abstraction::{
    GeneratedImage, GenerationClient, GenerationError, OutlineSection, SourceRef, TopicBrief,
    TopicIdea,
};

use crate::options::ClientOptions;

/// Generation client backed by the WeCreate HTTP API.
#[derive(Debug, Clone)]
pub struct HttpGenerationClient {
    /// Options attached to every request.
    options: ClientOptions,
    /// Base URL with any trailing `/` removed.
    base_url: String,
    /// HTTP client for making requests.
    client: Client,
}

impl HttpGenerationClient {
    /// Creates a new client from the given options.
    ///
    /// # Errors
    /// Returns a `GenerationError` if the HTTP client cannot be built.
    pub fn new(options: ClientOptions) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(options.timeout).build().map_err(|e| {
            GenerationError::Request(format!("Failed to create HTTP client: {}", e))
        })?;
        let base_url = options.base_url.trim_end_matches('/').to_string();

        Ok(Self { options, base_url, client })
    }

    /// Returns the options this client was built with.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turns a service-relative image path into an absolute URL.
    fn resolve_image_url(&self, url: &str) -> String {
        if url.starts_with('/') {
            self.url(url)
        } else {
            url.to_string()
        }
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, GenerationError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(url = %url, "Sending generation request");

        let response = self.client.post(&url).json(body).send().await.map_err(|e| {
            error!(error = %e, url = %url, "Failed to send request to generation service");
            GenerationError::Request(format!("Network error: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!(
                status = %status,
                error = %error_text,
                url = %url,
                "Generation service returned error status"
            );
            return Err(GenerationError::Remote {
                status: status.as_u16(),
                message: error_detail(&error_text),
            });
        }

        response.json::<R>().await.map_err(|e| {
            error!(error = %e, url = %url, "Failed to parse generation service response");
            GenerationError::Malformed(format!("Failed to parse response: {}", e))
        })
    }
}

/// Extracts the `detail` field the backend puts in error bodies, if present.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn ideate_topics(&self, keyword: &str) -> Result<TopicBrief, GenerationError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(GenerationError::InvalidRequest("keyword must not be empty".to_string()));
        }

        let request = TopicRequest {
            keyword,
            mode: &self.options.mode,
            model_provider: self.options.provider.as_str(),
        };
        let response: TopicResponse = self.post_json("/api/topics/generate", &request).await?;

        Ok(TopicBrief {
            summary: response.search_summary,
            sources: response
                .sources
                .into_iter()
                .map(|s| SourceRef {
                    title: s.title,
                    url: s.url,
                    excerpt: s.content,
                    published_date: s.published_date,
                })
                .collect(),
            topics: response.topics,
        })
    }

    async fn expand_outline(
        &self,
        topic_title: &str,
        context_summary: &str,
    ) -> Result<Vec<OutlineSection>, GenerationError> {
        let request = OutlineRequest {
            topic_title,
            search_summary: context_summary,
            target_audience: &self.options.target_audience,
            model_provider: self.options.provider.as_str(),
        };
        let response: OutlineResponse = self.post_json("/api/articles/outline", &request).await?;

        if response.sections.is_empty() {
            return Err(GenerationError::Malformed("outline has no sections".to_string()));
        }
        Ok(response.sections)
    }

    async fn write_section(
        &self,
        section_title: &str,
        section_description: &str,
        context_summary: &str,
    ) -> Result<String, GenerationError> {
        let request = WriteSectionRequest {
            section_title,
            section_description,
            context_summary,
            tone: &self.options.tone,
            model_provider: self.options.provider.as_str(),
        };
        let response: WriteSectionResponse =
            self.post_json("/api/articles/write_section", &request).await?;

        Ok(response.content)
    }

    async fn generate_image(
        &self,
        context_excerpt: &str,
        style: &str,
    ) -> Result<GeneratedImage, GenerationError> {
        let request = ImageRequest { article_context: context_excerpt, section_index: 0, style };
        let response: ImageResponse = self.post_json("/api/images/generate", &request).await?;

        if response.url.trim().is_empty() {
            return Err(GenerationError::Malformed("image response has no url".to_string()));
        }
        Ok(GeneratedImage { url: self.resolve_image_url(&response.url), prompt: response.prompt })
    }

    async fn polish(&self, content: &str, style: &str) -> Result<String, GenerationError> {
        let request =
            PolishRequest { content, style, model_provider: self.options.provider.as_str() };
        let response: PolishResponse = self.post_json("/api/articles/polish", &request).await?;

        if response.polished_content.trim().is_empty() {
            return Err(GenerationError::Malformed("polish returned empty content".to_string()));
        }
        Ok(response.polished_content)
    }

    async fn health(&self) -> Result<(), GenerationError> {
        let url = self.url("/health");
        let response = self.client.get(&url).send().await.map_err(|e| {
            GenerationError::Request(format!("Network error: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Remote {
                status: status.as_u16(),
                message: "health check failed".to_string(),
            });
        }

        let body: HealthResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(format!("Failed to parse response: {}", e)))?;
        if body.status == "ok" {
            Ok(())
        } else {
            Err(GenerationError::Malformed(format!("service status is '{}'", body.status)))
        }
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}

// WeCreate API request/response structures

#[derive(Debug, Serialize)]
struct TopicRequest<'a> {
    keyword: &'a str,
    mode: &'a str,
    model_provider: &'a str,
}

#[derive(Debug, Deserialize)]
struct TopicResponse {
    #[serde(default)]
    search_summary: String,
    #[serde(default)]
    sources: Vec<SearchResult>,
    topics: Vec<TopicIdea>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    title: String,
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    published_date: Option<String>,
}

#[derive(Debug, Serialize)]
struct OutlineRequest<'a> {
    topic_title: &'a str,
    search_summary: &'a str,
    target_audience: &'a str,
    model_provider: &'a str,
}

#[derive(Debug, Deserialize)]
struct OutlineResponse {
    sections: Vec<OutlineSection>,
}

#[derive(Debug, Serialize)]
struct WriteSectionRequest<'a> {
    section_title: &'a str,
    section_description: &'a str,
    context_summary: &'a str,
    tone: &'a str,
    model_provider: &'a str,
}

#[derive(Debug, Deserialize)]
struct WriteSectionResponse {
    content: String,
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    article_context: &'a str,
    section_index: u32,
    style: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    url: String,
    #[serde(default)]
    prompt: String,
}

#[derive(Debug, Serialize)]
struct PolishRequest<'a> {
    content: &'a str,
    style: &'a str,
    model_provider: &'a str,
}

#[derive(Debug, Deserialize)]
struct PolishResponse {
    polished_content: String,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use wecreate_abstraction::ModelProvider;

    fn client_for(server: &mockito::ServerGuard) -> HttpGenerationClient {
        HttpGenerationClient::new(ClientOptions::new(server.url())).unwrap()
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = HttpGenerationClient::new(ClientOptions::new("http://example.test/")).unwrap();
        assert_eq!(client.endpoint(), "http://example.test");
        assert_eq!(client.url("/health"), "http://example.test/health");
    }

    #[test]
    fn test_resolve_image_url() {
        let client = HttpGenerationClient::new(ClientOptions::new("http://example.test")).unwrap();
        assert_eq!(
            client.resolve_image_url("/static/images/a.png"),
            "http://example.test/static/images/a.png"
        );
        assert_eq!(client.resolve_image_url("https://cdn.test/a.png"), "https://cdn.test/a.png");
    }

    #[test]
    fn test_error_detail_extraction() {
        assert_eq!(error_detail(r#"{"detail": "LLM timeout"}"#), "LLM timeout");
        assert_eq!(error_detail("Internal Server Error"), "Internal Server Error");
    }

    #[tokio::test]
    async fn test_ideate_topics_maps_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/topics/generate")
            .match_body(Matcher::Json(json!({
                "keyword": "AI Agents",
                "mode": "creative",
                "model_provider": "gemini"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                "search_summary": "Agents are everywhere.",
                "sources": [
                    {"title": "News", "url": "https://news.test/1", "content": "Agents ship", "published_date": "2024-05-01"},
                    {"title": "Blog", "url": "https://blog.test/2", "content": "Hype cycle"}
                ],
                "topics": [
                    {"title": "Agents at work", "rationale": "Timely", "angle": "Analysis"},
                    {"title": "Agents at home", "rationale": "Relatable", "angle": "Emotional"}
                ]
            }"#,
            )
            .create_async()
            .await;

        let brief = client_for(&server).ideate_topics("  AI Agents ").await.unwrap();

        assert_eq!(brief.summary, "Agents are everywhere.");
        assert_eq!(brief.sources.len(), 2);
        assert_eq!(brief.sources[0].excerpt, "Agents ship");
        assert_eq!(brief.sources[0].published_date.as_deref(), Some("2024-05-01"));
        assert_eq!(brief.sources[1].published_date, None);
        assert_eq!(brief.topics[1].angle, "Emotional");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_ideate_topics_rejects_blank_keyword_without_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/api/topics/generate").expect(0).create_async().await;

        let result = client_for(&server).ideate_topics("   ").await;

        assert!(matches!(result, Err(GenerationError::InvalidRequest(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_provider_and_writing_options_are_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/articles/write_section")
            .match_body(Matcher::Json(json!({
                "section_title": "Intro",
                "section_description": "Set the scene",
                "context_summary": "ctx",
                "tone": "Playful",
                "model_provider": "openai"
            })))
            .with_status(200)
            .with_body(r#"{"content": "Once upon a time"}"#)
            .create_async()
            .await;

        let options = ClientOptions::new(server.url())
            .with_provider(ModelProvider::OpenAI)
            .with_tone("Playful");
        let client = HttpGenerationClient::new(options).unwrap();

        let content = client.write_section("Intro", "Set the scene", "ctx").await.unwrap();
        assert_eq!(content, "Once upon a time");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_expand_outline_sends_audience() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/articles/outline")
            .match_body(Matcher::PartialJson(json!({
                "topic_title": "Agents at work",
                "search_summary": "summary",
                "target_audience": "General"
            })))
            .with_status(200)
            .with_body(
                r#"{"sections": [
                {"title": "Hook", "description": "Open strong", "key_points": ["stat"]},
                {"title": "Body", "description": "Explain"}
            ]}"#,
            )
            .create_async()
            .await;

        let sections = client_for(&server).expand_outline("Agents at work", "summary").await.unwrap();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].key_points, vec!["stat".to_string()]);
        assert!(sections[1].key_points.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_outline_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/articles/outline")
            .with_status(200)
            .with_body(r#"{"sections": []}"#)
            .create_async()
            .await;

        let result = client_for(&server).expand_outline("t", "s").await;
        assert!(matches!(result, Err(GenerationError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_generate_image_resolves_relative_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/images/generate")
            .match_body(Matcher::Json(json!({
                "article_context": "# Title",
                "section_index": 0,
                "style": "Flat Vector"
            })))
            .with_status(200)
            .with_body(r#"{"url": "/static/images/cover.png", "prompt": "a flat vector robot"}"#)
            .create_async()
            .await;

        let image = client_for(&server).generate_image("# Title", "Flat Vector").await.unwrap();

        assert_eq!(image.url, format!("{}/static/images/cover.png", server.url()));
        assert_eq!(image.prompt, "a flat vector robot");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_polish_returns_rewrite() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/articles/polish")
            .match_body(Matcher::PartialJson(json!({"style": "Conversational"})))
            .with_status(200)
            .with_body(r#"{"polished_content": "Much better."}"#)
            .create_async()
            .await;

        let polished = client_for(&server).polish("Draft.", "Conversational").await.unwrap();
        assert_eq!(polished, "Much better.");
    }

    #[tokio::test]
    async fn test_server_error_carries_detail() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/articles/polish")
            .with_status(500)
            .with_body(r#"{"detail": "LLM quota exhausted"}"#)
            .create_async()
            .await;

        let result = client_for(&server).polish("Draft.", "Conversational").await;
        match result {
            Err(GenerationError::Remote { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "LLM quota exhausted");
            }
            other => panic!("Expected Remote error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unparseable_body_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/articles/write_section")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let result = client_for(&server).write_section("a", "b", "c").await;
        assert!(matches!(result, Err(GenerationError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_health() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status": "ok"}"#)
            .create_async()
            .await;

        assert!(client_for(&server).health().await.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_request_error() {
        // Port 9 (discard) is not expected to accept HTTP connections.
        let client = HttpGenerationClient::new(ClientOptions::new("http://127.0.0.1:9")).unwrap();
        let result = client.health().await;
        assert!(matches!(result, Err(GenerationError::Request(_))));
    }
}
