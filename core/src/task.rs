//! Fetch task bookkeeping.
//!
//! Every fetch the screen starts is tracked as a `FetchTask` with an id,
//! a state, and a cancellation token derived from the screen's lifetime
//! token. The host receives a `PendingFetch` carrying the request to run
//! and a clone of that token; it hands the outcome back under the same id.

use std::fmt;

use tokio_util::sync::CancellationToken;

use crate::error::FetchError;
use crate::http::HttpRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fetch-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Succeeded { appended: usize },
    Failed(FetchError),
    Cancelled,
}

impl TaskState {
    pub fn is_finished(&self) -> bool {
        !matches!(self, TaskState::Pending)
    }
}

#[derive(Debug)]
pub struct FetchTask {
    id: TaskId,
    state: TaskState,
    token: CancellationToken,
}

impl FetchTask {
    pub(crate) fn new(id: TaskId, token: CancellationToken) -> Self {
        Self {
            id,
            state: TaskState::Pending,
            token,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn state(&self) -> &TaskState {
        &self.state
    }

    /// True once the task or the screen that owns it was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether an outcome delivered now would still be applied.
    pub(crate) fn accepts_outcome(&self) -> bool {
        self.state == TaskState::Pending && !self.token.is_cancelled()
    }

    pub(crate) fn finish(&mut self, state: TaskState) {
        self.state = state;
    }

    pub(crate) fn cancel(&mut self) {
        self.token.cancel();
        if self.state == TaskState::Pending {
            self.state = TaskState::Cancelled;
        }
    }
}

/// Work handed to the host: run `request`, then report back under `task_id`.
#[derive(Debug, Clone)]
pub struct PendingFetch {
    pub task_id: TaskId,
    pub request: HttpRequest,
    pub token: CancellationToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_is_pending_and_live() {
        let task = FetchTask::new(TaskId(1), CancellationToken::new());
        assert_eq!(task.state(), &TaskState::Pending);
        assert!(task.accepts_outcome());
        assert!(!task.state().is_finished());
    }

    #[test]
    fn parent_cancellation_reaches_task() {
        let parent = CancellationToken::new();
        let task = FetchTask::new(TaskId(2), parent.child_token());
        parent.cancel();
        assert!(task.is_cancelled());
        assert!(!task.accepts_outcome());
    }

    #[test]
    fn cancel_keeps_finished_state() {
        let mut task = FetchTask::new(TaskId(3), CancellationToken::new());
        task.finish(TaskState::Succeeded { appended: 2 });
        task.cancel();
        assert_eq!(task.state(), &TaskState::Succeeded { appended: 2 });
        assert!(!task.accepts_outcome());
    }

    #[test]
    fn cancel_pending_task() {
        let mut task = FetchTask::new(TaskId(4), CancellationToken::new());
        task.cancel();
        assert_eq!(task.state(), &TaskState::Cancelled);
    }

    #[test]
    fn task_id_display() {
        assert_eq!(TaskId(7).to_string(), "fetch-7");
    }
}
