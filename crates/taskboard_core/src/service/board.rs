//! Board store: the single owner of the canonical task collection.
//!
//! # Responsibility
//! - Hold the collection, filter inputs and the open reorder session.
//! - Route caller events into mutation/ordering use-cases.
//! - Persist after every applied change and push a fresh view to subscribers.
//!
//! # Invariants
//! - A rejected or no-op call leaves collection and storage untouched.
//! - While a reorder session is open, only `end_reorder` may change tasks.
//! - A failed save is logged and never rolls back in-memory state.
//! - Subscribers always receive a view recomputed from current state.

use crate::model::task::{
    parse_priority_input, OrderKey, Priority, Task, TaskId, TaskStatus, TaskValidationError,
};
use crate::repo::task_repo::{RepoError, TaskRepository};
use crate::service::ordering::{self, LanePosition};
use crate::service::task_service::{self, TaskPatch};
use crate::view::projection::{project, FilterState};
use crate::view::stats::BoardStats;
use crate::view::BoardView;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Whether a call changed the canonical collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Collection changed and was persisted.
    Applied,
    /// Nothing to do: unknown id or unresolved reorder destination.
    Unchanged,
}

impl MutationOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Errors from board operations.
#[derive(Debug)]
pub enum BoardError {
    /// Caller input failed validation.
    Validation(TaskValidationError),
    /// A reorder of this task is in progress; finish it first.
    ReorderInProgress(TaskId),
    /// `end_reorder` was called without a matching `begin_reorder`.
    NoReorderInProgress,
    /// Loading the collection failed at the storage backend.
    Repo(RepoError),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ReorderInProgress(id) => write!(f, "reorder of task {id} is in progress"),
            Self::NoReorderInProgress => write!(f, "no reorder is in progress"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::ReorderInProgress(_) => None,
            Self::NoReorderInProgress => None,
        }
    }
}

impl From<TaskValidationError> for BoardError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for BoardError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

type Subscriber = Box<dyn FnMut(&BoardView)>;

#[derive(Debug, Clone)]
struct ReorderSession {
    task_id: TaskId,
}

/// Board store over a task repository.
pub struct Board<R: TaskRepository> {
    repo: R,
    tasks: Vec<Task>,
    filter: FilterState,
    reorder: Option<ReorderSession>,
    subscribers: Vec<Subscriber>,
}

impl<R: TaskRepository> Board<R> {
    /// Loads the collection from `repo` and creates the board.
    ///
    /// Corrupt stored data yields an empty board; only backend failures error.
    pub fn open(repo: R) -> Result<Self, BoardError> {
        let tasks = repo.load()?;
        info!(
            "event=board_open module=board status=ok task_count={}",
            tasks.len()
        );
        Ok(Self {
            repo,
            tasks,
            filter: FilterState::default(),
            reorder: None,
            subscribers: Vec::new(),
        })
    }

    /// Canonical collection in storage order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up one task by id.
    pub fn task(&self, task_id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == task_id)
    }

    /// Active search and priority filter.
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Whether a reorder session is open (filtering is suppressed).
    pub fn is_reordering(&self) -> bool {
        self.reorder.is_some()
    }

    /// Lane counts over the full collection.
    pub fn stats(&self) -> BoardStats {
        BoardStats::compute(&self.tasks)
    }

    /// Computes the current view.
    pub fn view(&self) -> BoardView {
        BoardView {
            lanes: project(&self.tasks, &self.filter, self.is_reordering()),
            stats: self.stats(),
        }
    }

    /// Registers a callback invoked with a fresh view after every change.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&BoardView) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Creates a task at the end of the `todo` lane.
    ///
    /// `priority` of `None` or blank text means `Medium`.
    pub fn create(&mut self, title: &str, priority: Option<&str>) -> Result<Task, BoardError> {
        let priority = parse_priority_input(priority)?;
        self.create_with_priority(title, priority)
    }

    /// Creates a task with an already-parsed priority.
    pub fn create_with_priority(
        &mut self,
        title: &str,
        priority: Priority,
    ) -> Result<Task, BoardError> {
        self.ensure_idle()?;
        let (task, next) = task_service::create_task(&self.tasks, title, priority, now_epoch_ms())?;
        info!(
            "event=task_create module=board status=ok task_id={} order={}",
            task.id, task.order
        );
        self.commit(next);
        Ok(task)
    }

    /// Edits title and/or priority of one task.
    pub fn update(
        &mut self,
        task_id: &TaskId,
        patch: &TaskPatch,
    ) -> Result<MutationOutcome, BoardError> {
        self.ensure_idle()?;
        match task_service::update_fields(&self.tasks, task_id, patch)? {
            Some(next) => {
                info!("event=task_update module=board status=ok task_id={task_id}");
                self.commit(next);
                Ok(MutationOutcome::Applied)
            }
            None => {
                debug!("event=task_update module=board status=noop reason=not_found task_id={task_id}");
                Ok(MutationOutcome::Unchanged)
            }
        }
    }

    /// Deletes one task. Confirmation is the caller's responsibility.
    pub fn delete(&mut self, task_id: &TaskId) -> Result<MutationOutcome, BoardError> {
        self.ensure_idle()?;
        match task_service::delete_task(&self.tasks, task_id) {
            Some(next) => {
                info!("event=task_delete module=board status=ok task_id={task_id}");
                self.commit(next);
                Ok(MutationOutcome::Applied)
            }
            None => {
                debug!("event=task_delete module=board status=noop reason=not_found task_id={task_id}");
                Ok(MutationOutcome::Unchanged)
            }
        }
    }

    /// Opens a reorder session for `task_id` and suppresses filtering.
    ///
    /// Returns `false` and opens nothing when `task_id` is unknown.
    pub fn begin_reorder(&mut self, task_id: &TaskId) -> Result<bool, BoardError> {
        self.ensure_idle()?;
        let Some(source_status) = self.task(task_id).map(Task::status) else {
            debug!("event=reorder_begin module=board status=noop reason=not_found task_id={task_id}");
            return Ok(false);
        };
        debug!(
            "event=reorder_begin module=board status=ok task_id={} source={}",
            task_id, source_status
        );
        self.reorder = Some(ReorderSession {
            task_id: task_id.clone(),
        });
        self.notify();
        Ok(true)
    }

    /// Closes the reorder session and applies at most one move.
    ///
    /// `None` means the gesture ended outside any lane: nothing moves.
    pub fn end_reorder(
        &mut self,
        destination: Option<LanePosition>,
    ) -> Result<MutationOutcome, BoardError> {
        let session = self.reorder.take().ok_or(BoardError::NoReorderInProgress)?;
        let outcome = self.apply_move(&session.task_id, destination);
        if !outcome.is_applied() {
            // Filtering was suppressed during the session; views must refresh.
            self.notify();
        }
        Ok(outcome)
    }

    /// Moves one task in a single call, without a reorder session.
    pub fn move_task(
        &mut self,
        task_id: &TaskId,
        destination: LanePosition,
    ) -> Result<MutationOutcome, BoardError> {
        self.ensure_idle()?;
        Ok(self.apply_move(task_id, Some(destination)))
    }

    /// Sets the title search text.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.filter.search = text.into();
        self.notify();
    }

    /// Sets the priority filter; empty text clears it.
    pub fn set_priority_filter(&mut self, value: &str) -> Result<(), BoardError> {
        let priority = match value.trim() {
            "" => None,
            text => Some(text.parse::<Priority>()?),
        };
        self.filter.priority = priority;
        self.notify();
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), BoardError> {
        match &self.reorder {
            Some(session) => Err(BoardError::ReorderInProgress(session.task_id.clone())),
            None => Ok(()),
        }
    }

    fn apply_move(
        &mut self,
        task_id: &TaskId,
        destination: Option<LanePosition>,
    ) -> MutationOutcome {
        let source_status = self.task(task_id).map(Task::status);
        match ordering::move_task(&self.tasks, task_id, destination) {
            Some(next) => {
                info!(
                    "event=task_move module=board status=ok task_id={} source={} destination={} index={}",
                    task_id,
                    source_status.map_or("none", TaskStatus::as_str),
                    destination.map_or("none", |position| position.status.as_str()),
                    destination.map_or(0, |position| position.index)
                );
                self.commit(next);
                MutationOutcome::Applied
            }
            None => {
                debug!(
                    "event=task_move module=board status=noop task_id={} resolved_destination={}",
                    task_id,
                    destination.is_some()
                );
                MutationOutcome::Unchanged
            }
        }
    }

    fn commit(&mut self, next: Vec<Task>) {
        self.tasks = next;
        if let Err(err) = self.repo.save(&self.tasks) {
            warn!(
                "event=board_persist module=board status=error task_count={} error={}",
                self.tasks.len(),
                err
            );
        }
        self.notify();
    }

    fn notify(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let view = self.view();
        for subscriber in &mut self.subscribers {
            subscriber(&view);
        }
    }
}

fn now_epoch_ms() -> OrderKey {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            OrderKey::try_from(elapsed.as_millis()).unwrap_or(OrderKey::MAX)
        })
}
