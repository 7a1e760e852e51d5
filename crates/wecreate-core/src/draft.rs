//! The article draft buffer.
//!
//! While sections are being written the draft is kept structured (title plus
//! one entry per outline section) and rendered to markdown on demand, so a
//! section's placeholder can never be confused with generated text. A polish
//! pass replaces the whole rendering with the rewritten text.

use serde::{Deserialize, Serialize};

/// Marker shown in place of a section whose content has not arrived yet.
pub const WRITING_PLACEHOLDER: &str = "*Writing...*";

/// Marker shown in place of a section whose generation failed.
pub const SECTION_ERROR_MARKER: &str = "[Error generating section]";

/// Heading used when an article is started without a selected topic.
pub const UNTITLED_ARTICLE: &str = "Untitled Article";

/// State of one section body in the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "text", rename_all = "snake_case")]
pub enum SectionBody {
    /// Waiting for the generation call.
    Pending,
    /// Generated content.
    Written(String),
    /// Generation failed; holds the failure message.
    Failed(String),
}

impl SectionBody {
    /// Returns true while the section is still waiting for content.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    fn render(&self) -> &str {
        match self {
            Self::Pending => WRITING_PLACEHOLDER,
            Self::Written(text) => text,
            Self::Failed(_) => SECTION_ERROR_MARKER,
        }
    }
}

/// One section of the draft, in outline order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSection {
    /// Heading of the section.
    pub title: String,
    /// Body of the section.
    pub body: SectionBody,
}

/// The growing article text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleDraft {
    title: Option<String>,
    sections: Vec<DraftSection>,
    rewrite: Option<String>,
}

impl ArticleDraft {
    /// Starts a draft with the given article title.
    pub fn begin(title: Option<&str>) -> Self {
        Self {
            title: Some(title.unwrap_or(UNTITLED_ARTICLE).to_string()),
            sections: Vec::new(),
            rewrite: None,
        }
    }

    /// Appends a section heading with a pending placeholder and returns its index.
    pub fn push_pending(&mut self, title: &str) -> usize {
        self.sections.push(DraftSection { title: title.to_string(), body: SectionBody::Pending });
        self.sections.len() - 1
    }

    /// Replaces the placeholder of section `index`.
    ///
    /// Returns false if the section does not exist or is already resolved.
    pub fn resolve(&mut self, index: usize, body: SectionBody) -> bool {
        match self.sections.get_mut(index) {
            Some(section) if section.body.is_pending() => {
                section.body = body;
                true
            }
            _ => false,
        }
    }

    /// Replaces the whole text with a rewrite.
    pub fn replace_all(&mut self, text: String) {
        self.rewrite = Some(text);
    }

    /// Sections in outline order.
    pub fn sections(&self) -> &[DraftSection] {
        &self.sections
    }

    /// Returns true once a polish rewrite has replaced the structured text.
    pub fn is_rewritten(&self) -> bool {
        self.rewrite.is_some()
    }

    /// Returns true if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.rewrite.as_deref().map_or(self.title.is_none(), str::is_empty)
    }

    /// Renders the draft as markdown.
    pub fn text(&self) -> String {
        if let Some(rewrite) = &self.rewrite {
            return rewrite.clone();
        }
        let Some(title) = &self.title else {
            return String::new();
        };

        let mut text = format!("# {title}\n\n");
        for section in &self.sections {
            text.push_str("\n\n## ");
            text.push_str(&section.title);
            text.push_str("\n\n");
            text.push_str(section.body.render());
        }
        text
    }
}

/// Returns the leading `max_chars` characters of `text`.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
