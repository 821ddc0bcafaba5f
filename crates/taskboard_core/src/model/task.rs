//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record shared by ordering, projection and storage.
//! - Own title normalization and priority/status parsing rules.
//!
//! # Invariants
//! - `id` is stable and never reassigned once a task exists.
//! - Titles created or edited through this module are trimmed and non-empty.
//! - Wire names (`todo`, `inprogress`, `done`, `Low`, `Medium`, `High`) are
//!   part of the persisted format and must not change.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Numeric sort key establishing sequence inside one lane.
pub type OrderKey = i64;

/// Stable identifier of one task.
///
/// Freshly created tasks get a random UUID; ids read back from storage are
/// accepted as any non-empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a new random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parses a caller-provided identifier.
    ///
    /// # Errors
    /// - Returns [`TaskValidationError::EmptyId`] for blank input.
    pub fn parse(value: impl Into<String>) -> Result<Self, TaskValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        Ok(Self(value))
    }

    /// Returns the identifier text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lane a task belongs to.
///
/// Variant order is the board's display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not started. New tasks always land here.
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// Every lane in display order.
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Returns the stored wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "inprogress",
            Self::Done => "done",
        }
    }

    /// Returns the human-facing lane heading.
    pub fn label(self) -> &'static str {
        match self {
            Self::Todo => "To do",
            Self::InProgress => "In progress",
            Self::Done => "Done",
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = TaskValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "inprogress" | "in_progress" | "in-progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(TaskValidationError::InvalidStatus(value.to_string())),
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Can wait.
    Low,
    /// Default for tasks created without an explicit priority.
    #[default]
    Medium,
    /// Needs attention first.
    High,
}

impl Priority {
    /// Every priority from lowest to highest.
    pub const ALL: [Priority; 3] = [Self::Low, Self::Medium, Self::High];

    /// Returns the stored wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| TaskValidationError::InvalidPriority(value.to_string()))
    }
}

/// Parses optional caller priority text.
///
/// Absent or blank input falls back to [`Priority::Medium`].
///
/// # Errors
/// - Returns [`TaskValidationError::InvalidPriority`] for unknown values.
pub fn parse_priority_input(value: Option<&str>) -> Result<Priority, TaskValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(Priority::default()),
        Some(text) => text.parse(),
    }
}

/// Trims a title and rejects it when nothing is left.
///
/// # Errors
/// - Returns [`TaskValidationError::EmptyTitle`] for blank input.
pub fn normalize_title(value: &str) -> Result<String, TaskValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

/// Validation failures for task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty after trimming.
    EmptyTitle,
    /// Identifier is empty after trimming.
    EmptyId,
    /// Priority text is not one of `Low|Medium|High`.
    InvalidPriority(String),
    /// Status text is not one of `todo|inprogress|done`.
    InvalidStatus(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be blank"),
            Self::EmptyId => write!(f, "task id must not be blank"),
            Self::InvalidPriority(value) => write!(
                f,
                "invalid priority `{value}`; expected Low|Medium|High"
            ),
            Self::InvalidStatus(value) => write!(
                f,
                "invalid status `{value}`; expected todo|inprogress|done"
            ),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
///
/// `status` and `order` are only changed by the ordering engine; `title` and
/// `priority` only by field edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub(crate) id: TaskId,
    pub(crate) title: String,
    pub(crate) priority: Priority,
    pub(crate) status: TaskStatus,
    pub(crate) order: OrderKey,
    /// Fields found on a stored record that this model does not know about.
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

impl Task {
    /// Creates a `todo` task with a generated id.
    ///
    /// # Errors
    /// - Returns [`TaskValidationError::EmptyTitle`] for blank titles.
    pub fn new(
        title: &str,
        priority: Priority,
        order: OrderKey,
    ) -> Result<Self, TaskValidationError> {
        Self::with_id(TaskId::generate(), title, priority, TaskStatus::Todo, order)
    }

    /// Creates a task with a caller-provided id, lane and order key.
    ///
    /// Used by import paths and fixtures where identity already exists.
    ///
    /// # Errors
    /// - Returns [`TaskValidationError::EmptyTitle`] for blank titles.
    pub fn with_id(
        id: TaskId,
        title: &str,
        priority: Priority,
        status: TaskStatus,
        order: OrderKey,
    ) -> Result<Self, TaskValidationError> {
        Ok(Self {
            id,
            title: normalize_title(title)?,
            priority,
            status,
            order,
            extra: Map::new(),
        })
    }

    /// Stable identifier.
    pub fn id(&self) -> &TaskId {
        &self.id
    }

    /// Display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current priority.
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Lane the task currently sits in.
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Sort key inside the current lane.
    pub fn order(&self) -> OrderKey {
        self.order
    }

    /// Unknown stored fields carried through load/save untouched.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}
