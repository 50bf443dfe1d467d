//! WorkflowManager - actor that owns one orchestrator
//!
//! Generating requests are refused with `WorkflowError::Busy` while another
//! one is in flight; nothing is queued. A caller that stops waiting does not
//! stop the request, its reply is simply dropped.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

use super::messages::{BusyGuard, WorkflowCommand, WorkflowResponse};
use super::{Orchestrator, Stage, WorkflowError, WorkflowInput, WorkflowSnapshot};
use crate::domain::ProductConcept;

/// Handle to send commands to the workflow actor
#[derive(Clone)]
pub struct WorkflowManager {
    tx: mpsc::Sender<WorkflowCommand>,
    busy: Arc<AtomicBool>,
    stage_rx: watch::Receiver<Stage>,
}

impl WorkflowManager {
    /// Spawn the actor task around `orchestrator`
    pub fn spawn(orchestrator: Orchestrator) -> Self {
        debug!("WorkflowManager::spawn: called");
        let stage_rx = orchestrator.subscribe();
        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(actor_loop(orchestrator, rx));
        info!("WorkflowManager spawned");

        Self {
            tx,
            busy: Arc::new(AtomicBool::new(false)),
            stage_rx,
        }
    }

    /// Whether a generating request is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn stage(&self) -> Stage {
        *self.stage_rx.borrow()
    }

    /// Watch stage changes (e.g. to show progress while generating)
    pub fn subscribe(&self) -> watch::Receiver<Stage> {
        self.stage_rx.clone()
    }

    /// Take the busy flag now, then send the command when polled
    ///
    /// The flag is taken before the future is returned, so a second call
    /// made before the first is awaited is already refused.
    fn generating<T, F>(&self, make: F) -> impl Future<Output = WorkflowResponse<T>> + Send + use<T, F>
    where
        T: Send + 'static,
        F: FnOnce(BusyGuard, oneshot::Sender<WorkflowResponse<T>>) -> WorkflowCommand + Send + 'static,
    {
        let guard = BusyGuard::acquire(&self.busy);
        let tx = self.tx.clone();
        async move {
            let Some(guard) = guard else {
                debug!("generating: refused, request in flight");
                return Err(WorkflowError::Busy);
            };
            let (reply_tx, reply_rx) = oneshot::channel();
            tx.send(make(guard, reply_tx))
                .await
                .map_err(|_| WorkflowError::ChannelClosed)?;
            reply_rx.await.map_err(|_| WorkflowError::ChannelClosed)?
        }
    }

    pub fn begin(&self, input: WorkflowInput) -> impl Future<Output = WorkflowResponse<Stage>> + Send + use<> {
        debug!("begin: called");
        self.generating(move |guard, reply| WorkflowCommand::Begin { input, guard, reply })
    }

    pub fn answer_and_continue(
        &self,
        answers: BTreeMap<usize, String>,
    ) -> impl Future<Output = WorkflowResponse<Stage>> + Send + use<> {
        debug!(answers = answers.len(), "answer_and_continue: called");
        self.generating(move |guard, reply| WorkflowCommand::Answer { answers, guard, reply })
    }

    pub fn chapter_help(
        &self,
        chapter_id: u8,
        concept: ProductConcept,
    ) -> impl Future<Output = WorkflowResponse<String>> + Send + use<> {
        debug!(%chapter_id, "chapter_help: called");
        self.generating(move |guard, reply| WorkflowCommand::ChapterHelp {
            chapter_id,
            concept,
            guard,
            reply,
        })
    }

    pub fn ask(&self, question: String) -> impl Future<Output = WorkflowResponse<Option<String>>> + Send + use<> {
        debug!(question_len = question.len(), "ask: called");
        self.generating(move |guard, reply| WorkflowCommand::Ask { question, guard, reply })
    }

    pub async fn reset(&self) -> WorkflowResponse<()> {
        debug!("reset: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(WorkflowCommand::Reset { reply: reply_tx })
            .await
            .map_err(|_| WorkflowError::ChannelClosed)?;
        reply_rx.await.map_err(|_| WorkflowError::ChannelClosed)
    }

    pub async fn snapshot(&self) -> WorkflowResponse<WorkflowSnapshot> {
        debug!("snapshot: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(WorkflowCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| WorkflowError::ChannelClosed)?;
        reply_rx.await.map_err(|_| WorkflowError::ChannelClosed)
    }

    pub async fn shutdown(&self) -> WorkflowResponse<()> {
        debug!("shutdown: called");
        self.tx
            .send(WorkflowCommand::Shutdown)
            .await
            .map_err(|_| WorkflowError::ChannelClosed)
    }
}

/// The actor loop that owns the orchestrator and processes commands
///
/// Each guard is dropped before the reply goes out, so a caller that gets
/// its answer can submit again straight away.
async fn actor_loop(mut orchestrator: Orchestrator, mut rx: mpsc::Receiver<WorkflowCommand>) {
    debug!("Workflow actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            WorkflowCommand::Begin { input, guard, reply } => {
                debug!("actor_loop: Begin command");
                let result = orchestrator.begin(input).await;
                drop(guard);
                let _ = reply.send(result);
            }

            WorkflowCommand::Answer { answers, guard, reply } => {
                debug!(answers = answers.len(), "actor_loop: Answer command");
                let result = orchestrator.answer_and_continue(&answers).await;
                drop(guard);
                let _ = reply.send(result);
            }

            WorkflowCommand::ChapterHelp {
                chapter_id,
                concept,
                guard,
                reply,
            } => {
                debug!(%chapter_id, "actor_loop: ChapterHelp command");
                let result = orchestrator.chapter_help(chapter_id, &concept).await;
                drop(guard);
                let _ = reply.send(result);
            }

            WorkflowCommand::Ask { question, guard, reply } => {
                debug!("actor_loop: Ask command");
                let result = orchestrator.ask(&question).await;
                drop(guard);
                let _ = reply.send(result);
            }

            WorkflowCommand::Reset { reply } => {
                debug!("actor_loop: Reset command");
                orchestrator.reset();
                let _ = reply.send(());
            }

            WorkflowCommand::Snapshot { reply } => {
                debug!("actor_loop: Snapshot command");
                let _ = reply.send(orchestrator.snapshot());
            }

            WorkflowCommand::Shutdown => {
                info!("Workflow actor shutting down");
                break;
            }
        }
    }

    debug!("Workflow actor stopped");
}
