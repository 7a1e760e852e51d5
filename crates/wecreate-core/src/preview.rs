//! Markdown handed to the mobile article renderer.

use crate::workflow::{WorkflowStep, WorkflowView};

const WELCOME: &str = "## Welcome to WeCreate\n\nStart by entering a topic or keyword.";

/// Builds the preview markdown for the current view.
///
/// Shows the draft once writing has started, the research summary while a
/// topic is being chosen, and a welcome text before any keyword.
pub fn preview_markdown(view: &WorkflowView) -> String {
    let mut markdown = if !view.draft.is_empty() {
        view.draft.clone()
    } else if let Some(brief) = &view.brief {
        format!(
            "## Intelligence Brief\n\n{}\n\n*Select a topic to start generating content...*",
            brief.summary
        )
    } else {
        WELCOME.to_string()
    };

    for image in &view.images {
        markdown.push_str(&format!("\n\n![{}]({})", alt_text(&image.prompt), image.url));
    }
    markdown
}

/// Returns the article markdown ready to paste into a publishing editor.
///
/// Only finished articles can be exported.
pub fn export_article(view: &WorkflowView) -> Option<String> {
    if view.step != WorkflowStep::Done || view.draft.is_empty() {
        return None;
    }
    let mut article = preview_markdown(view);
    if !article.ends_with('\n') {
        article.push('\n');
    }
    Some(article)
}

fn alt_text(prompt: &str) -> String {
    let cleaned: String = prompt.chars().filter(|c| !matches!(c, '[' | ']' | '\n')).collect();
    if cleaned.trim().is_empty() {
        "illustration".to_string()
    } else {
        cleaned.trim().to_string()
    }
}
