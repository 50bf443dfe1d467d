//! Workflow manager messages
//!
//! Commands and responses for the actor pattern.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::oneshot;
use tracing::debug;

use super::{Stage, WorkflowError, WorkflowInput, WorkflowSnapshot};
use crate::domain::ProductConcept;

/// Response from workflow operations
pub type WorkflowResponse<T> = Result<T, WorkflowError>;

/// Holds the manager's busy flag for one generating request
///
/// Travels inside the command; the flag clears when the actor drops it.
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl BusyGuard {
    /// Take the flag, or `None` if a request is already in flight
    pub fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag.clone()))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        debug!("BusyGuard::drop: clearing busy flag");
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Commands sent to the workflow actor
#[derive(Debug)]
pub enum WorkflowCommand {
    Begin {
        input: WorkflowInput,
        guard: BusyGuard,
        reply: oneshot::Sender<WorkflowResponse<Stage>>,
    },
    Answer {
        answers: BTreeMap<usize, String>,
        guard: BusyGuard,
        reply: oneshot::Sender<WorkflowResponse<Stage>>,
    },
    ChapterHelp {
        chapter_id: u8,
        concept: ProductConcept,
        guard: BusyGuard,
        reply: oneshot::Sender<WorkflowResponse<String>>,
    },
    Ask {
        question: String,
        guard: BusyGuard,
        reply: oneshot::Sender<WorkflowResponse<Option<String>>>,
    },
    Reset {
        reply: oneshot::Sender<()>,
    },
    Snapshot {
        reply: oneshot::Sender<WorkflowSnapshot>,
    },
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_guard_is_exclusive() {
        let flag = Arc::new(AtomicBool::new(false));
        let guard = BusyGuard::acquire(&flag).unwrap();
        assert!(BusyGuard::acquire(&flag).is_none());

        drop(guard);
        assert!(!flag.load(Ordering::SeqCst));
        assert!(BusyGuard::acquire(&flag).is_some());
    }
}
