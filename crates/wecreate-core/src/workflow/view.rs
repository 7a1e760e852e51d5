//! Read-only snapshots of the workflow for the presentation layer.

use serde::Serialize;
use wecreate_abstraction::{GeneratedImage, OutlineSection, TopicBrief, TopicIdea};

use super::{ArticleId, BusyFlags, Failure, Workflow, WorkflowStep};
use crate::draft::{ArticleDraft, DraftSection, SectionBody};

/// Section counts of the draft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WritingProgress {
    /// Sections with generated content.
    pub written: usize,
    /// Sections that failed and carry the error marker.
    pub failed: usize,
    /// Sections in the outline.
    pub total: usize,
}

impl WritingProgress {
    pub(crate) fn from_draft(draft: &ArticleDraft, total: usize) -> Self {
        let mut progress = Self { total, ..Self::default() };
        for section in draft.sections() {
            match section.body {
                SectionBody::Written(_) => progress.written += 1,
                SectionBody::Failed(_) => progress.failed += 1,
                SectionBody::Pending => {}
            }
        }
        progress
    }

    /// Sections resolved either way.
    pub fn resolved(&self) -> usize {
        self.written + self.failed
    }
}

/// Everything the presentation needs to render one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkflowView {
    /// Article identity.
    pub article: ArticleId,
    /// Current step.
    pub step: WorkflowStep,
    /// Latest topic brief.
    pub brief: Option<TopicBrief>,
    /// Topic the outline was expanded from.
    pub selected_topic: Option<TopicIdea>,
    /// Outline sections.
    pub outline: Vec<OutlineSection>,
    /// Rendered draft markdown.
    pub draft: String,
    /// Draft sections, empty after a polish rewrite.
    pub sections: Vec<DraftSection>,
    /// True once a polish pass replaced the draft.
    pub polished: bool,
    /// Section progress.
    pub progress: WritingProgress,
    /// Generated illustrations.
    pub images: Vec<GeneratedImage>,
    /// Loading flags.
    pub busy: BusyFlags,
    /// Most recent failure.
    pub last_failure: Option<Failure>,
}

impl WorkflowView {
    pub(crate) fn capture(workflow: &Workflow) -> Self {
        let draft = workflow.draft();
        Self {
            article: workflow.article(),
            step: workflow.step(),
            brief: workflow.brief().cloned(),
            selected_topic: workflow.selected_topic().cloned(),
            outline: workflow.outline().to_vec(),
            draft: draft.text(),
            sections: if draft.is_rewritten() { Vec::new() } else { draft.sections().to_vec() },
            polished: draft.is_rewritten(),
            progress: workflow.writing_progress(),
            images: workflow.images().to_vec(),
            busy: workflow.busy(),
            last_failure: workflow.last_failure().cloned(),
        }
    }
}
