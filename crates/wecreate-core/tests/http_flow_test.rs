//! End-to-end workflow against a mocked generation service.

use mockito::{Matcher, ServerGuard};
use serde_json::json;
use std::sync::Arc;
use wecreate_client::{ClientOptions, HttpGenerationClient};
use wecreate_core::draft::SECTION_ERROR_MARKER;
use wecreate_core::{export_article, CallKind, Intent, StudioDriver, WorkflowSettings, WorkflowStep};

const SECTIONS: [&str; 4] = ["Setting the scene", "Under the hood", "Pitfalls", "Outlook"];

fn driver_for(server: &ServerGuard) -> StudioDriver {
    let client = HttpGenerationClient::new(ClientOptions::new(server.url())).unwrap();
    StudioDriver::new(Arc::new(client), WorkflowSettings::default())
}

async fn mock_research(server: &mut ServerGuard) -> Vec<mockito::Mock> {
    let topics = server
        .mock("POST", "/api/topics/generate")
        .match_body(Matcher::PartialJson(json!({"keyword": "AI Agents"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "search_summary": "Agents moved from demos to production.",
                "sources": [{"title": "Roundup", "url": "https://news.test/1", "content": "Agents ship"}],
                "topics": [
                    {"title": "Agents at work", "rationale": "Timely", "angle": "Technology Analysis"},
                    {"title": "Build your first agent", "rationale": "Hands-on", "angle": "Practical Guide"},
                    {"title": "Living with agents", "rationale": "Relatable", "angle": "Emotional Story"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let sections: Vec<_> = SECTIONS
        .iter()
        .map(|title| json!({"title": title, "description": format!("About {title}")}))
        .collect();
    let outline = server
        .mock("POST", "/api/articles/outline")
        .match_body(Matcher::PartialJson(json!({
            "topic_title": "Build your first agent",
            "search_summary": "Agents moved from demos to production.",
            "target_audience": "General"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "sections": sections }).to_string())
        .create_async()
        .await;

    vec![topics, outline]
}

#[tokio::test]
async fn test_full_article_over_http() {
    let mut server = mockito::Server::new_async().await;
    let mut mocks = mock_research(&mut server).await;

    for title in SECTIONS {
        let mock = if title == "Under the hood" {
            server
                .mock("POST", "/api/articles/write_section")
                .match_body(Matcher::PartialJson(json!({"section_title": title})))
                .with_status(500)
                .with_body(r#"{"detail": "LLM timeout"}"#)
        } else {
            server
                .mock("POST", "/api/articles/write_section")
                .match_body(Matcher::PartialJson(json!({
                    "section_title": title,
                    "context_summary": "Agents moved from demos to production.",
                    "tone": "Professional yet Engaging"
                })))
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(json!({"content": format!("{title}. ").repeat(30)}).to_string())
        };
        mocks.push(mock.expect(1).create_async().await);
    }

    mocks.push(
        server
            .mock("POST", "/api/images/generate")
            .match_body(Matcher::PartialJson(json!({"section_index": 0, "style": "Flat Vector"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"url": "/static/images/cover.png", "prompt": "robot at a desk"}"#)
            .expect(1)
            .create_async()
            .await,
    );

    let mut driver = driver_for(&server);
    driver.dispatch(Intent::SubmitKeyword("AI Agents".to_string())).unwrap();
    driver.settle().await;

    let brief = driver.workflow().brief().unwrap().clone();
    assert_eq!(brief.topics.len(), 3);
    assert_eq!(brief.sources[0].excerpt, "Agents ship");

    driver.dispatch(Intent::SelectTopic(brief.topics[1].clone())).unwrap();
    driver.settle().await;
    assert_eq!(driver.workflow().step(), WorkflowStep::Outline);
    assert_eq!(driver.workflow().outline().len(), 4);

    driver.dispatch(Intent::ConfirmOutline).unwrap();
    driver.settle().await;

    let view = driver.view();
    assert_eq!(view.step, WorkflowStep::Done);
    assert_eq!(view.progress.written, 3);
    assert_eq!(view.progress.failed, 1);
    assert_eq!(view.draft.matches(SECTION_ERROR_MARKER).count(), 1);

    let failure = view.last_failure.clone().unwrap();
    assert_eq!(failure.kind, CallKind::WriteSection);
    assert_eq!(failure.section, Some(1));
    assert!(failure.to_string().contains("LLM timeout"));

    assert_eq!(view.images.len(), 1);
    assert_eq!(view.images[0].url, format!("{}/static/images/cover.png", server.url()));

    let article = export_article(&view).unwrap();
    assert!(article.starts_with("# Build your first agent"));
    assert!(article.contains("![robot at a desk]("));

    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_polish_failure_keeps_draft() {
    let mut server = mockito::Server::new_async().await;
    let _research = mock_research(&mut server).await;
    let _sections = server
        .mock("POST", "/api/articles/write_section")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"content": "Short."}"#)
        .create_async()
        .await;
    let polish = server
        .mock("POST", "/api/articles/polish")
        .match_body(Matcher::PartialJson(json!({"style": "Conversational", "model_provider": "gemini"})))
        .with_status(503)
        .with_body("Service Unavailable")
        .expect(1)
        .create_async()
        .await;

    let mut driver = driver_for(&server);
    driver.dispatch(Intent::SubmitKeyword("AI Agents".to_string())).unwrap();
    driver.settle().await;
    let topic = driver.workflow().brief().unwrap().topics[1].clone();
    driver.dispatch(Intent::SelectTopic(topic)).unwrap();
    driver.settle().await;
    driver.dispatch(Intent::ConfirmOutline).unwrap();
    driver.settle().await;

    let before = driver.view().draft;
    assert!(before.chars().count() > 50);

    driver.dispatch(Intent::RequestPolish).unwrap();
    driver.settle().await;

    let view = driver.view();
    assert_eq!(view.draft, before);
    assert!(!view.polished);
    assert!(!view.busy.polish);
    assert_eq!(view.last_failure.unwrap().kind, CallKind::Polish);
    polish.assert_async().await;
}
