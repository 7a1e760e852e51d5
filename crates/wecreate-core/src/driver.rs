//! Async driver for the article workflow.
//!
//! The driver is the single writer of the [`Workflow`]. Generation calls run
//! as tokio tasks that only talk to the client; their results come back over
//! a channel and are applied one at a time on the driver's task. A call that
//! panics still reports back, as a failed outcome of its kind.
//! After every mutation a fresh [`WorkflowView`] is published on a watch
//! channel for any number of readers.

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, warn};
use wecreate_abstraction::{GenerationClient, GenerationError};

use crate::error::Result;
use crate::workflow::{
    Completion, GenerationCall, Intent, Outcome, PendingCall, Workflow, WorkflowSettings,
    WorkflowView,
};

/// Executes one call against the client.
pub async fn execute(client: &dyn GenerationClient, call: GenerationCall) -> Outcome {
    match call {
        GenerationCall::IdeateTopics { keyword } => {
            Outcome::Topics(client.ideate_topics(&keyword).await)
        }
        GenerationCall::ExpandOutline { topic_title, summary } => {
            Outcome::Outline(client.expand_outline(&topic_title, &summary).await)
        }
        GenerationCall::WriteSection { title, description, context, .. } => {
            Outcome::Section(client.write_section(&title, &description, &context).await)
        }
        GenerationCall::GenerateImage { excerpt, style } => {
            Outcome::Image(client.generate_image(&excerpt, &style).await)
        }
        GenerationCall::Polish { content, style } => {
            Outcome::Polished(client.polish(&content, &style).await)
        }
    }
}

/// Owns a workflow and runs its generation calls.
pub struct StudioDriver {
    workflow: Workflow,
    client: Arc<dyn GenerationClient>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    view_tx: watch::Sender<WorkflowView>,
    in_flight: usize,
}

impl StudioDriver {
    /// Creates a driver for a fresh workflow.
    pub fn new(client: Arc<dyn GenerationClient>, settings: WorkflowSettings) -> Self {
        let workflow = Workflow::new(settings);
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (view_tx, _) = watch::channel(workflow.view());

        Self { workflow, client, completion_tx, completion_rx, view_tx, in_flight: 0 }
    }

    /// Subscribes to view snapshots.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowView> {
        self.view_tx.subscribe()
    }

    /// The workflow being driven.
    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    /// Snapshot of the current state.
    pub fn view(&self) -> WorkflowView {
        self.workflow.view()
    }

    /// Number of spawned calls whose completion has not been received yet.
    ///
    /// This includes calls that will be discarded as stale on arrival.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Handles a user intent and launches the calls it produces.
    pub fn dispatch(&mut self, intent: Intent) -> Result<()> {
        debug!(intent = ?intent, step = %self.workflow.step(), "Dispatching intent");
        let calls = self.workflow.dispatch(intent).inspect_err(|e| {
            warn!(error = %e, "Intent rejected");
        })?;
        self.launch(calls);
        self.publish();
        Ok(())
    }

    /// Waits for the next completion and applies it.
    ///
    /// Returns false immediately if nothing is in flight.
    pub async fn next(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.completion_rx.recv().await {
            Some(completion) => {
                self.receive(completion);
                true
            }
            None => false,
        }
    }

    /// Applies every completion that has already arrived, without waiting.
    pub fn drain_ready(&mut self) -> usize {
        let mut applied = 0;
        while self.in_flight > 0 {
            match self.completion_rx.try_recv() {
                Ok(completion) => {
                    self.receive(completion);
                    applied += 1;
                }
                Err(_) => break,
            }
        }
        applied
    }

    /// Processes completions until `done` holds or nothing is left in flight.
    ///
    /// Returns whether `done` holds at the end.
    pub async fn run_until<F>(&mut self, done: F) -> bool
    where
        F: Fn(&Workflow) -> bool,
    {
        while !done(&self.workflow) {
            if !self.next().await {
                break;
            }
        }
        done(&self.workflow)
    }

    /// Processes completions until nothing is in flight.
    pub async fn settle(&mut self) {
        while self.next().await {}
    }

    /// Runs an intent loop until the intent channel closes and all calls settle.
    ///
    /// Rejected intents are logged and otherwise ignored.
    pub async fn run(mut self, mut intents: mpsc::Receiver<Intent>) -> Workflow {
        let mut open = true;
        while open || self.in_flight > 0 {
            tokio::select! {
                intent = intents.recv(), if open => match intent {
                    Some(intent) => {
                        if let Err(e) = self.dispatch(intent) {
                            debug!(error = %e, "Ignoring rejected intent");
                        }
                    }
                    None => open = false,
                },
                Some(completion) = self.completion_rx.recv(), if self.in_flight > 0 => {
                    self.receive(completion);
                }
                else => break,
            }
        }
        self.workflow
    }

    fn receive(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let calls = self.workflow.apply(completion);
        self.launch(calls);
        self.publish();
    }

    fn launch(&mut self, calls: Vec<PendingCall>) {
        for PendingCall { ticket, call } in calls {
            let client = Arc::clone(&self.client);
            let tx = self.completion_tx.clone();
            self.in_flight += 1;

            tokio::spawn(async move {
                let kind = call.kind();
                let task = tokio::spawn(async move { execute(client.as_ref(), call).await });
                let outcome = match task.await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        error!(seq = ticket.seq, kind = %kind, error = %e, "Generation task failed");
                        Outcome::failed(kind, GenerationError::Request(format!("generation task failed: {e}")))
                    }
                };
                if tx.send(Completion { ticket, outcome }).is_err() {
                    debug!(seq = ticket.seq, "Driver dropped before completion arrived");
                }
            });
        }
    }

    fn publish(&self) {
        self.view_tx.send_replace(self.workflow.view());
    }
}
