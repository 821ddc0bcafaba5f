//! Filtered per-lane projection of the canonical collection.
//!
//! # Responsibility
//! - Match tasks against search text and a priority filter.
//! - Group tasks by lane and sort each lane by order key.
//!
//! # Invariants
//! - Projection reads the collection and never mutates it.
//! - Every lane is present in the output, possibly empty.
//! - Lane sort is stable; equal keys keep collection order.
//! - With filtering suppressed the full collection is projected.

use crate::model::task::{Priority, Task, TaskStatus};
use std::collections::BTreeMap;

/// Search text and priority filter chosen by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub priority: Option<Priority>,
}

impl FilterState {
    pub fn new(search: impl Into<String>, priority: Option<Priority>) -> Self {
        Self {
            search: search.into(),
            priority,
        }
    }

    /// Case-insensitive title substring match AND exact priority match.
    pub fn matches(&self, task: &Task) -> bool {
        let matches_search = task
            .title
            .to_lowercase()
            .contains(&self.search.to_lowercase());
        let matches_priority = self
            .priority
            .map_or(true, |priority| task.priority == priority);
        matches_search && matches_priority
    }

    /// Whether this filter lets every task through.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.priority.is_none()
    }
}

/// Tasks grouped by lane, each lane sorted by order key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneMap {
    lanes: BTreeMap<TaskStatus, Vec<Task>>,
}

impl LaneMap {
    /// Tasks of one lane in display order.
    pub fn lane(&self, status: TaskStatus) -> &[Task] {
        self.lanes.get(&status).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Lanes in display order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskStatus, &[Task])> {
        self.lanes
            .iter()
            .map(|(status, tasks)| (*status, tasks.as_slice()))
    }

    /// Number of tasks across all projected lanes.
    pub fn len(&self) -> usize {
        self.lanes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Projects `tasks` into sorted lanes.
///
/// `suppress_filtering` is set while a reorder is in progress so lane indices
/// line up with the canonical lanes instead of a filtered subset.
pub fn project(tasks: &[Task], filter: &FilterState, suppress_filtering: bool) -> LaneMap {
    let mut lanes: BTreeMap<TaskStatus, Vec<Task>> = TaskStatus::ALL
        .into_iter()
        .map(|status| (status, Vec::new()))
        .collect();

    for task in tasks
        .iter()
        .filter(|task| suppress_filtering || filter.matches(task))
    {
        lanes.entry(task.status).or_default().push(task.clone());
    }

    for lane in lanes.values_mut() {
        lane.sort_by_key(|task| task.order);
    }

    LaneMap { lanes }
}
