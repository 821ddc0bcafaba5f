//! Task mutation use-cases.
//!
//! # Responsibility
//! - Create, edit and delete tasks over an immutable input collection.
//! - Reject invalid input before any new collection is built.
//!
//! # Invariants
//! - Field edits touch `title` and `priority` only; `id`, `status` and
//!   `order` belong to the ordering engine.
//! - Referential misses return `None` instead of an error.
//! - Deletion never renumbers surviving tasks.

use crate::model::task::{normalize_title, OrderKey, Priority, Task, TaskId, TaskStatus};
use crate::service::ordering;
use serde::Deserialize;

/// Editable subset of a task.
///
/// Deserializing a patch ignores every other field, so a full task record
/// sent by a view (including `status` or `order`) only edits title/priority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub priority: Option<Priority>,
}

impl TaskPatch {
    /// Patch that sets only the title.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            priority: None,
        }
    }

    /// Patch that sets only the priority.
    pub fn priority(priority: Priority) -> Self {
        Self {
            title: None,
            priority: Some(priority),
        }
    }

    /// Patch carrying the editable fields of an edited task copy.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: Some(task.title.clone()),
            priority: Some(task.priority),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.priority.is_none()
    }
}

/// Builds a new `todo` task placed after every existing `todo` task.
///
/// Returns the task and the collection with it appended. The `todo` lane is
/// renumbered only when its keys leave no room above the maximum.
///
/// # Errors
/// - Returns [`crate::TaskValidationError::EmptyTitle`] for blank titles.
pub fn create_task(
    tasks: &[Task],
    title: &str,
    priority: Priority,
    now_ms: OrderKey,
) -> Result<(Task, Vec<Task>), crate::TaskValidationError> {
    let title = normalize_title(title)?;
    let (mut next, order) = ordering::reserve_append(tasks, TaskStatus::Todo, now_ms);
    let task = Task::new(&title, priority, order)?;
    next.push(task.clone());
    Ok((task, next))
}

/// Applies `patch` to the task with `task_id`.
///
/// Returns `Ok(None)` when no task has that id.
///
/// # Errors
/// - Returns [`crate::TaskValidationError::EmptyTitle`] when the patch title
///   is blank; nothing is applied in that case.
pub fn update_fields(
    tasks: &[Task],
    task_id: &TaskId,
    patch: &TaskPatch,
) -> Result<Option<Vec<Task>>, crate::TaskValidationError> {
    let title = patch.title.as_deref().map(normalize_title).transpose()?;

    if !tasks.iter().any(|task| &task.id == task_id) {
        return Ok(None);
    }

    let next = tasks
        .iter()
        .map(|task| {
            if &task.id != task_id {
                return task.clone();
            }
            let mut edited = task.clone();
            if let Some(title) = &title {
                edited.title = title.clone();
            }
            if let Some(priority) = patch.priority {
                edited.priority = priority;
            }
            edited
        })
        .collect();
    Ok(Some(next))
}

/// Deletes the task with `task_id`.
///
/// Returns `None` when no task has that id.
pub fn delete_task(tasks: &[Task], task_id: &TaskId) -> Option<Vec<Task>> {
    ordering::remove(tasks, task_id)
}
