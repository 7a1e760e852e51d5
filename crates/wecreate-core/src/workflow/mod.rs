//! Article workflow state machine.
//!
//! The workflow owns every piece of article state and changes it only through
//! two entry points:
//!
//! - [`Workflow::dispatch`] handles a user [`Intent`]. It validates the intent
//!   against the current step and busy flags, mutates state, and returns the
//!   generation calls to issue.
//! - [`Workflow::apply`] handles a [`Completion`] of a previously issued call.
//!   Completions whose ticket no longer matches an outstanding call are
//!   discarded without touching state.
//!
//! Neither method awaits; executing calls is the job of
//! [`StudioDriver`](crate::driver::StudioDriver). Section writing is driven
//! from `apply`: the call for section *k + 1* is only returned once section
//! *k* has been resolved, so sections are always written one at a time and in
//! outline order.

mod calls;
mod view;

pub use calls::{
    ArticleId, CallKind, Completion, GenerationCall, Outcome, PendingCall, Ticket,
};
pub use view::{WorkflowView, WritingProgress};

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};
use wecreate_abstraction::{
    GeneratedImage, GenerationError, OutlineSection, TopicBrief, TopicIdea,
};

use crate::draft::{excerpt, ArticleDraft, SectionBody};
use crate::error::{IntentError, Result};

/// The wizard step the workflow is at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStep {
    /// Keyword entry and topic selection.
    #[default]
    Topic,
    /// Outline review and editing.
    Outline,
    /// Sections are being written.
    Writing,
    /// Article is finished; polish and illustration are available.
    Done,
}

impl WorkflowStep {
    /// All steps in forward order.
    pub const ALL: [Self; 4] = [Self::Topic, Self::Outline, Self::Writing, Self::Done];

    /// Returns a display string for the step.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Topic => "TOPIC",
            Self::Outline => "OUTLINE",
            Self::Writing => "WRITING",
            Self::Done => "DONE",
        }
    }

    /// Zero-based position of the step in the wizard.
    pub fn position(&self) -> usize {
        match self {
            Self::Topic => 0,
            Self::Outline => 1,
            Self::Writing => 2,
            Self::Done => 3,
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which trigger gate rejected an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusyKind {
    /// Topic ideation or outline expansion.
    Topic,
    /// The section writing loop.
    Writing,
    /// Image generation.
    Image,
    /// Polish pass.
    Polish,
}

impl fmt::Display for BusyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Topic => "topic",
            Self::Writing => "writing",
            Self::Image => "image",
            Self::Polish => "polish",
        })
    }
}

/// Loading flags the presentation uses to disable triggers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyFlags {
    /// Topic ideation or outline expansion is in flight.
    pub topic: bool,
    /// Image generation is in flight.
    pub image: bool,
    /// A polish pass is in flight.
    pub polish: bool,
}

impl BusyFlags {
    /// Returns true if any flag is set.
    pub fn any(&self) -> bool {
        self.topic || self.image || self.polish
    }
}

/// Editable field of an outline section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionField {
    /// The section heading.
    Title,
    /// The section guidance text.
    Description,
}

/// A user intent emitted by the presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Research a keyword and propose topics.
    SubmitKeyword(String),
    /// Choose one of the proposed topics and expand it into an outline.
    SelectTopic(TopicIdea),
    /// Change a field of one outline section.
    EditSection {
        /// Outline index.
        index: usize,
        /// Field to change.
        field: SectionField,
        /// New value.
        value: String,
    },
    /// Accept the outline and start writing.
    ConfirmOutline,
    /// Rewrite the finished article.
    RequestPolish,
    /// Generate a new illustration for the finished article.
    RequestImage,
    /// Drop the current article and return to keyword entry.
    StartOver,
}

/// A generation failure reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Capability that failed.
    pub kind: CallKind,
    /// Outline index, for section failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<usize>,
    /// The underlying error.
    pub error: GenerationError,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.section {
            Some(index) => write!(f, "{} failed for section {}: {}", self.kind, index + 1, self.error),
            None => write!(f, "{} failed: {}", self.kind, self.error),
        }
    }
}

/// Upper bound on the draft excerpt sent for image generation, in chars.
pub const MAX_IMAGE_EXCERPT_CHARS: usize = 500;

/// Tunables for the finishing steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSettings {
    /// Style requested for polish passes.
    pub polish_style: String,
    /// Style requested for illustrations.
    pub image_style: String,
    /// Number of leading draft chars (Unicode scalar values) sent for image
    /// generation, capped at [`MAX_IMAGE_EXCERPT_CHARS`].
    pub image_excerpt_chars: usize,
    /// Drafts at or below this many chars (Unicode scalar values, not bytes
    /// or UTF-16 units) get no automatic image.
    pub image_min_chars: usize,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            polish_style: "Conversational".to_string(),
            image_style: "Flat Vector".to_string(),
            image_excerpt_chars: MAX_IMAGE_EXCERPT_CHARS,
            image_min_chars: 50,
        }
    }
}

/// Outstanding call in the topic slot, shared by ideation and outline expansion.
#[derive(Debug, Clone)]
enum TopicSlot {
    Ideate(Ticket),
    Expand { ticket: Ticket, topic: TopicIdea },
}

#[derive(Debug, Clone, Default)]
struct InFlight {
    topic: Option<TopicSlot>,
    section: Option<(Ticket, usize)>,
    image: Option<Ticket>,
    polish: Option<Ticket>,
}

/// The article workflow state machine.
#[derive(Debug, Clone)]
pub struct Workflow {
    settings: WorkflowSettings,
    article: ArticleId,
    next_seq: u64,
    step: WorkflowStep,
    brief: Option<TopicBrief>,
    selected: Option<TopicIdea>,
    outline: Vec<OutlineSection>,
    draft: ArticleDraft,
    images: Vec<GeneratedImage>,
    in_flight: InFlight,
    last_failure: Option<Failure>,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new(WorkflowSettings::default())
    }
}

impl Workflow {
    /// Creates a workflow at the TOPIC step.
    pub fn new(settings: WorkflowSettings) -> Self {
        Self {
            settings,
            article: ArticleId(1),
            next_seq: 0,
            step: WorkflowStep::Topic,
            brief: None,
            selected: None,
            outline: Vec::new(),
            draft: ArticleDraft::default(),
            images: Vec::new(),
            in_flight: InFlight::default(),
            last_failure: None,
        }
    }

    /// Identity of the current article.
    pub fn article(&self) -> ArticleId {
        self.article
    }

    /// Current step.
    pub fn step(&self) -> WorkflowStep {
        self.step
    }

    /// Settings in use.
    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    /// Latest topic brief, if any.
    pub fn brief(&self) -> Option<&TopicBrief> {
        self.brief.as_ref()
    }

    /// Topic the outline was expanded from.
    pub fn selected_topic(&self) -> Option<&TopicIdea> {
        self.selected.as_ref()
    }

    /// Current outline.
    pub fn outline(&self) -> &[OutlineSection] {
        &self.outline
    }

    /// The article draft.
    pub fn draft(&self) -> &ArticleDraft {
        &self.draft
    }

    /// Generated illustrations.
    pub fn images(&self) -> &[GeneratedImage] {
        &self.images
    }

    /// Most recent generation failure.
    pub fn last_failure(&self) -> Option<&Failure> {
        self.last_failure.as_ref()
    }

    /// Current loading flags.
    pub fn busy(&self) -> BusyFlags {
        BusyFlags {
            topic: self.in_flight.topic.is_some(),
            image: self.in_flight.image.is_some(),
            polish: self.in_flight.polish.is_some(),
        }
    }

    /// Returns true if any call issued for the current article is outstanding.
    pub fn has_outstanding_calls(&self) -> bool {
        self.busy().any() || self.in_flight.section.is_some()
    }

    /// Section progress while writing or after.
    pub fn writing_progress(&self) -> WritingProgress {
        WritingProgress::from_draft(&self.draft, self.outline.len())
    }

    /// Takes an immutable snapshot for readers.
    pub fn view(&self) -> WorkflowView {
        WorkflowView::capture(self)
    }

    /// Handles a user intent and returns the calls to issue.
    ///
    /// A rejected intent leaves the workflow untouched.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Vec<PendingCall>> {
        match intent {
            Intent::SubmitKeyword(keyword) => self.submit_keyword(&keyword),
            Intent::SelectTopic(topic) => self.select_topic(topic),
            Intent::EditSection { index, field, value } => {
                self.edit_section(index, field, value)?;
                Ok(Vec::new())
            }
            Intent::ConfirmOutline => self.confirm_outline(),
            Intent::RequestPolish => self.request_polish(),
            Intent::RequestImage => self.request_image(),
            Intent::StartOver => {
                self.start_over();
                Ok(Vec::new())
            }
        }
    }

    /// Applies the result of a call and returns follow-up calls.
    pub fn apply(&mut self, completion: Completion) -> Vec<PendingCall> {
        let Completion { ticket, outcome } = completion;
        match outcome {
            Outcome::Topics(result) => {
                self.apply_topics(ticket, result);
                Vec::new()
            }
            Outcome::Outline(result) => {
                self.apply_outline(ticket, result);
                Vec::new()
            }
            Outcome::Section(result) => self.apply_section(ticket, result),
            Outcome::Image(result) => {
                self.apply_image(ticket, result);
                Vec::new()
            }
            Outcome::Polished(result) => {
                self.apply_polish(ticket, result);
                Vec::new()
            }
        }
    }

    fn issue(&mut self, call: GenerationCall) -> PendingCall {
        self.next_seq += 1;
        let ticket = Ticket { article: self.article, seq: self.next_seq };
        debug!(article = %ticket.article, seq = ticket.seq, kind = %call.kind(), "Issuing generation call");
        PendingCall { ticket, call }
    }

    fn expect_step(&self, expected: WorkflowStep) -> Result<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(IntentError::WrongStep { expected, actual: self.step })
        }
    }

    fn transition(&mut self, to: WorkflowStep) {
        info!(article = %self.article, from = %self.step, to = %to, "Workflow step changed");
        self.step = to;
    }

    fn record_failure(&mut self, failure: Failure) {
        warn!(article = %self.article, error = %failure.error, kind = %failure.kind, "{failure}");
        self.last_failure = Some(failure);
    }

    fn discard(&self, ticket: Ticket, kind: CallKind) {
        warn!(
            article = %self.article,
            ticket_article = %ticket.article,
            seq = ticket.seq,
            kind = %kind,
            "Discarding stale completion"
        );
    }

    // Intents

    fn submit_keyword(&mut self, keyword: &str) -> Result<Vec<PendingCall>> {
        self.expect_step(WorkflowStep::Topic)?;
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(IntentError::EmptyKeyword);
        }
        if self.in_flight.topic.is_some() {
            return Err(IntentError::Busy(BusyKind::Topic));
        }

        self.last_failure = None;
        let call = self.issue(GenerationCall::IdeateTopics { keyword: keyword.to_string() });
        self.in_flight.topic = Some(TopicSlot::Ideate(call.ticket));
        Ok(vec![call])
    }

    fn select_topic(&mut self, topic: TopicIdea) -> Result<Vec<PendingCall>> {
        self.expect_step(WorkflowStep::Topic)?;
        if self.in_flight.topic.is_some() {
            return Err(IntentError::Busy(BusyKind::Topic));
        }
        let Some(brief) = &self.brief else {
            return Err(IntentError::UnknownTopic(topic.title));
        };
        if !brief.topics.contains(&topic) {
            return Err(IntentError::UnknownTopic(topic.title));
        }

        let summary = brief.summary.clone();
        self.last_failure = None;
        let call = self.issue(GenerationCall::ExpandOutline { topic_title: topic.title.clone(), summary });
        self.in_flight.topic = Some(TopicSlot::Expand { ticket: call.ticket, topic });
        Ok(vec![call])
    }

    fn edit_section(&mut self, index: usize, field: SectionField, value: String) -> Result<()> {
        self.expect_step(WorkflowStep::Outline)?;
        let len = self.outline.len();
        let section =
            self.outline.get_mut(index).ok_or(IntentError::SectionOutOfRange { index, len })?;

        match field {
            SectionField::Title => section.title = value,
            SectionField::Description => section.description = value,
        }
        Ok(())
    }

    fn confirm_outline(&mut self) -> Result<Vec<PendingCall>> {
        self.expect_step(WorkflowStep::Outline)?;
        if self.outline.is_empty() {
            return Err(IntentError::EmptyOutline);
        }

        self.last_failure = None;
        self.draft = ArticleDraft::begin(self.selected.as_ref().map(|t| t.title.as_str()));
        self.transition(WorkflowStep::Writing);
        Ok(vec![self.begin_section(0)])
    }

    fn request_polish(&mut self) -> Result<Vec<PendingCall>> {
        self.expect_step(WorkflowStep::Done)?;
        if self.in_flight.polish.is_some() {
            return Err(IntentError::Busy(BusyKind::Polish));
        }
        if self.draft.is_empty() {
            return Err(IntentError::EmptyDraft);
        }

        self.last_failure = None;
        let call = self.issue(GenerationCall::Polish {
            content: self.draft.text(),
            style: self.settings.polish_style.clone(),
        });
        self.in_flight.polish = Some(call.ticket);
        Ok(vec![call])
    }

    fn request_image(&mut self) -> Result<Vec<PendingCall>> {
        self.expect_step(WorkflowStep::Done)?;
        if self.in_flight.image.is_some() {
            return Err(IntentError::Busy(BusyKind::Image));
        }
        if self.draft.is_empty() {
            return Err(IntentError::EmptyDraft);
        }

        self.last_failure = None;
        Ok(vec![self.issue_image()])
    }

    fn start_over(&mut self) {
        let previous = self.article;
        self.article = ArticleId(previous.0 + 1);
        self.brief = None;
        self.selected = None;
        self.outline.clear();
        self.draft = ArticleDraft::default();
        self.images.clear();
        self.in_flight = InFlight::default();
        self.last_failure = None;
        info!(previous = %previous, article = %self.article, "Starting a new article");
        self.transition(WorkflowStep::Topic);
    }

    // Writing loop

    fn begin_section(&mut self, index: usize) -> PendingCall {
        let section = &self.outline[index];
        let (title, description) = (section.title.clone(), section.description.clone());
        self.draft.push_pending(&title);

        let context = self.brief.as_ref().map(|b| b.summary.clone()).unwrap_or_default();
        let call = self.issue(GenerationCall::WriteSection { index, title, description, context });
        self.in_flight.section = Some((call.ticket, index));
        call
    }

    fn issue_image(&mut self) -> PendingCall {
        let text = self.draft.text();
        let limit = self.settings.image_excerpt_chars.min(MAX_IMAGE_EXCERPT_CHARS);
        let call = self.issue(GenerationCall::GenerateImage {
            excerpt: excerpt(&text, limit).to_string(),
            style: self.settings.image_style.clone(),
        });
        self.in_flight.image = Some(call.ticket);
        call
    }

    fn finish_writing(&mut self) -> Vec<PendingCall> {
        self.transition(WorkflowStep::Done);

        let length = self.draft.text().chars().count();
        if length > self.settings.image_min_chars {
            vec![self.issue_image()]
        } else {
            debug!(article = %self.article, length, "Draft too short for an illustration");
            Vec::new()
        }
    }

    // Completions

    fn apply_topics(&mut self, ticket: Ticket, result: std::result::Result<TopicBrief, GenerationError>) {
        if !matches!(&self.in_flight.topic, Some(TopicSlot::Ideate(t)) if *t == ticket) {
            self.discard(ticket, CallKind::IdeateTopics);
            return;
        }
        self.in_flight.topic = None;

        match result {
            Ok(brief) => {
                info!(article = %self.article, topics = brief.topics.len(), "Topic brief received");
                self.brief = Some(brief);
            }
            Err(error) => self.record_failure(Failure { kind: CallKind::IdeateTopics, section: None, error }),
        }
    }

    fn apply_outline(
        &mut self,
        ticket: Ticket,
        result: std::result::Result<Vec<OutlineSection>, GenerationError>,
    ) {
        let topic = match self.in_flight.topic.take() {
            Some(TopicSlot::Expand { ticket: expected, topic }) if expected == ticket => topic,
            other => {
                self.in_flight.topic = other;
                self.discard(ticket, CallKind::ExpandOutline);
                return;
            }
        };

        match result {
            Ok(sections) => {
                info!(article = %self.article, sections = sections.len(), topic = %topic.title, "Outline received");
                self.selected = Some(topic);
                self.outline = sections;
                self.transition(WorkflowStep::Outline);
            }
            Err(error) => self.record_failure(Failure { kind: CallKind::ExpandOutline, section: None, error }),
        }
    }

    fn apply_section(
        &mut self,
        ticket: Ticket,
        result: std::result::Result<String, GenerationError>,
    ) -> Vec<PendingCall> {
        let index = match self.in_flight.section {
            Some((expected, index)) if expected == ticket => index,
            _ => {
                self.discard(ticket, CallKind::WriteSection);
                return Vec::new();
            }
        };
        self.in_flight.section = None;

        let body = match result {
            Ok(content) => {
                debug!(article = %self.article, section = index, "Section written");
                SectionBody::Written(content)
            }
            Err(error) => {
                let message = error.to_string();
                self.record_failure(Failure { kind: CallKind::WriteSection, section: Some(index), error });
                SectionBody::Failed(message)
            }
        };
        self.draft.resolve(index, body);

        let next = index + 1;
        if next < self.outline.len() {
            vec![self.begin_section(next)]
        } else {
            self.finish_writing()
        }
    }

    fn apply_image(&mut self, ticket: Ticket, result: std::result::Result<GeneratedImage, GenerationError>) {
        if self.in_flight.image != Some(ticket) {
            self.discard(ticket, CallKind::GenerateImage);
            return;
        }
        self.in_flight.image = None;

        match result {
            Ok(image) => {
                info!(article = %self.article, url = %image.url, "Illustration received");
                self.images = vec![image];
            }
            Err(error) => self.record_failure(Failure { kind: CallKind::GenerateImage, section: None, error }),
        }
    }

    fn apply_polish(&mut self, ticket: Ticket, result: std::result::Result<String, GenerationError>) {
        if self.in_flight.polish != Some(ticket) {
            self.discard(ticket, CallKind::Polish);
            return;
        }
        self.in_flight.polish = None;

        match result {
            Ok(text) => {
                info!(article = %self.article, length = text.len(), "Polished draft received");
                self.draft.replace_all(text);
            }
            Err(error) => self.record_failure(Failure { kind: CallKind::Polish, section: None, error }),
        }
    }
}
