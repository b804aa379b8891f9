//! The job list screen controller.
//!
//! # Design
//! `JobScreen` owns the job list, the hosting widget, and every fetch task
//! it started. Nothing else can mutate the list: the adapter is a borrowed
//! read-only view built on demand, and fetch results only land through
//! `complete_fetch`, which the host calls on the thread that owns the
//! screen. That single owner is what makes the list safe without locks.
//!
//! Lifecycle: `new` runs the `Initializing` steps and leaves the screen
//! `Ready` with one fetch in flight. `destroy` cancels the lifetime token;
//! outcomes that arrive afterwards are dropped.
//!
//! Finished tasks are kept for inspection, up to `FINISHED_TASK_HISTORY`;
//! older ones are pruned as new fetches finish.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::adapter::JobListAdapter;
use crate::client::JobsClient;
use crate::config::{IngestPolicy, ScreenConfig};
use crate::error::FetchError;
use crate::http::HttpResponse;
use crate::task::{FetchTask, PendingFetch, TaskId, TaskState};
use crate::types::JobList;
use crate::widget::ListWidget;

/// Finished tasks kept around after their outcome was applied.
pub const FINISHED_TASK_HISTORY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    Initializing,
    Ready,
    Destroyed,
}

#[derive(Debug)]
pub struct JobScreen<W: ListWidget> {
    config: ScreenConfig,
    client: JobsClient,
    state: ScreenState,
    jobs: JobList,
    widget: W,
    tasks: Vec<FetchTask>,
    next_task: u64,
    lifetime: CancellationToken,
}

impl<W: ListWidget> JobScreen<W> {
    /// Set up the screen and start the first fetch.
    ///
    /// Returns as soon as the request is built; the host runs the returned
    /// `PendingFetch` and reports back through `complete_fetch`.
    pub fn new(config: ScreenConfig, widget: W) -> (Self, PendingFetch) {
        let client = JobsClient::new(&config.base_url);
        let mut screen = Self {
            config,
            client,
            state: ScreenState::Initializing,
            jobs: JobList::new(),
            widget,
            tasks: Vec::new(),
            next_task: 1,
            lifetime: CancellationToken::new(),
        };

        JobListAdapter::new(&screen.jobs).notify_changed(&mut screen.widget);
        let pending = screen.start_fetch();
        screen.state = ScreenState::Ready;
        info!(
            base_url = screen.client.base_url(),
            ingest = %screen.config.ingest,
            "job screen ready"
        );
        (screen, pending)
    }

    /// Start another fetch. Its records are appended after the current ones.
    ///
    /// Returns `None` once the screen is destroyed.
    pub fn fetch(&mut self) -> Option<PendingFetch> {
        if self.state == ScreenState::Destroyed {
            debug!("fetch ignored on destroyed screen");
            return None;
        }
        Some(self.start_fetch())
    }

    fn start_fetch(&mut self) -> PendingFetch {
        let task_id = TaskId(self.next_task);
        self.next_task += 1;
        let token = self.lifetime.child_token();
        self.tasks.push(FetchTask::new(task_id, token.clone()));
        let request = self.client.build_list_jobs();
        debug!(%task_id, path = %request.path, "fetch started");
        PendingFetch {
            task_id,
            request,
            token,
        }
    }

    /// Apply the outcome of a fetch the host executed.
    ///
    /// Failures are logged and recorded on the task; the list keeps whatever
    /// the ingest policy left in it. Returns the task's final state, or
    /// `None` when the outcome was dropped (unknown or finished task,
    /// cancelled task, destroyed screen).
    pub fn complete_fetch(
        &mut self,
        task_id: TaskId,
        outcome: Result<HttpResponse, FetchError>,
    ) -> Option<&TaskState> {
        if self.state == ScreenState::Destroyed {
            debug!(%task_id, "outcome dropped: screen destroyed");
            return None;
        }
        let Some(pos) = self.tasks.iter().position(|t| t.id() == task_id) else {
            debug!(%task_id, "outcome dropped: unknown task");
            return None;
        };
        if !self.tasks[pos].accepts_outcome() {
            debug!(%task_id, "outcome dropped: task no longer pending");
            return None;
        }

        let before = self.jobs.len();
        let result = outcome.and_then(|response| self.ingest(&response));
        let appended = self.jobs.len() - before;

        let state = match result {
            Ok(n) => {
                info!(%task_id, appended = n, total = self.jobs.len(), "fetch succeeded");
                TaskState::Succeeded { appended: n }
            }
            Err(err) => {
                warn!(%task_id, kept = appended, error = %err, "fetch failed");
                TaskState::Failed(err)
            }
        };
        if matches!(state, TaskState::Succeeded { .. }) || appended > 0 {
            JobListAdapter::new(&self.jobs).notify_changed(&mut self.widget);
        }

        self.tasks[pos].finish(state);
        self.prune_finished(task_id);
        self.task(task_id).map(FetchTask::state)
    }

    /// Drop the oldest finished tasks beyond the history limit, never `keep`.
    fn prune_finished(&mut self, keep: TaskId) {
        let finished = self.tasks.iter().filter(|t| t.state().is_finished()).count();
        let mut excess = finished.saturating_sub(FINISHED_TASK_HISTORY);
        if excess == 0 {
            return;
        }
        self.tasks.retain(|t| {
            if excess > 0 && t.id() != keep && t.state().is_finished() {
                excess -= 1;
                false
            } else {
                true
            }
        });
        debug!(kept = self.tasks.len(), "pruned finished tasks");
    }

    fn ingest(&mut self, response: &HttpResponse) -> Result<usize, FetchError> {
        match self.config.ingest {
            IngestPolicy::Partial => self.client.ingest_list_jobs(response, &mut self.jobs),
            IngestPolicy::Atomic => {
                let jobs = self.client.parse_list_jobs(response)?;
                let n = jobs.len();
                self.jobs.extend(jobs);
                Ok(n)
            }
        }
    }

    /// Tear the screen down. Pending fetches are cancelled and later
    /// outcomes ignored.
    pub fn destroy(&mut self) {
        if self.state == ScreenState::Destroyed {
            return;
        }
        self.lifetime.cancel();
        for task in &mut self.tasks {
            task.cancel();
        }
        self.state = ScreenState::Destroyed;
        debug!(tasks = self.tasks.len(), "job screen destroyed");
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    pub fn jobs(&self) -> &JobList {
        &self.jobs
    }

    pub fn adapter(&self) -> JobListAdapter<'_> {
        JobListAdapter::new(&self.jobs)
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    /// Whether work for `task_id` should be abandoned: the screen is
    /// destroyed or the task was cancelled.
    pub fn is_cancelled(&self, task_id: TaskId) -> bool {
        self.state == ScreenState::Destroyed
            || self.task(task_id).is_some_and(FetchTask::is_cancelled)
    }

    pub fn task(&self, task_id: TaskId) -> Option<&FetchTask> {
        self.tasks.iter().find(|t| t.id() == task_id)
    }

    pub fn tasks(&self) -> &[FetchTask] {
        &self.tasks
    }
}

impl<W: ListWidget> Drop for JobScreen<W> {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
