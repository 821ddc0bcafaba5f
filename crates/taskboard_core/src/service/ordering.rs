//! Lane ordering engine.
//!
//! # Responsibility
//! - Move a task to a position inside a destination lane.
//! - Append and remove tasks without disturbing other lanes.
//! - Re-densify lane order keys to `0..n-1` after structural moves.
//!
//! # Invariants
//! - Every lane touched by a move holds order keys `0..n-1` afterwards.
//! - A moved task appears exactly once in the result, in its destination lane.
//! - Lane sorting is stable: equal keys keep their collection order.
//! - Inputs are never mutated; callers receive a new collection.

use crate::model::task::{OrderKey, Task, TaskId, TaskStatus};

/// Target slot of a move: a lane and a 0-based index inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanePosition {
    pub status: TaskStatus,
    pub index: usize,
}

impl LanePosition {
    pub fn new(status: TaskStatus, index: usize) -> Self {
        Self { status, index }
    }
}

/// Moves `task_id` into `destination`.
///
/// `destination.index` addresses the destination lane as sorted by order key
/// with the moved task taken out, and is clamped to the lane length.
///
/// Returns `None` (input unchanged) when `destination` is `None` or the id is
/// unknown.
pub fn move_task(
    tasks: &[Task],
    task_id: &TaskId,
    destination: Option<LanePosition>,
) -> Option<Vec<Task>> {
    let destination = destination?;
    let source_index = tasks.iter().position(|task| &task.id == task_id)?;

    let mut moved = tasks[source_index].clone();
    let source_status = moved.status;
    moved.status = destination.status;

    let mut others = Vec::with_capacity(tasks.len());
    let mut lane = Vec::new();
    for (index, task) in tasks.iter().enumerate() {
        if index == source_index {
            continue;
        }
        if task.status == destination.status {
            lane.push(task.clone());
        } else {
            others.push(task.clone());
        }
    }

    sort_lane(&mut lane);
    let target_index = destination.index.min(lane.len());
    lane.insert(target_index, moved);
    densify(&mut lane);

    if source_status != destination.status {
        densify_in_place(&mut others, source_status);
    }

    others.extend(lane);
    Some(others)
}

/// Removes `task_id` without renumbering survivors.
///
/// Returns `None` when the id is unknown.
pub fn remove(tasks: &[Task], task_id: &TaskId) -> Option<Vec<Task>> {
    if !tasks.iter().any(|task| &task.id == task_id) {
        return None;
    }
    Some(
        tasks
            .iter()
            .filter(|task| &task.id != task_id)
            .cloned()
            .collect(),
    )
}

/// Order key for a task appended to `status`.
///
/// Uses `now_ms` unless the lane already holds a key at or above it, in which
/// case the key is one past the lane maximum. `None` when that key would
/// overflow [`OrderKey`].
pub fn next_order_key(tasks: &[Task], status: TaskStatus, now_ms: OrderKey) -> Option<OrderKey> {
    let mut after_last = None;
    for task in tasks.iter().filter(|task| task.status == status) {
        let candidate = task.order.checked_add(1)?;
        after_last = Some(after_last.map_or(candidate, |key: OrderKey| key.max(candidate)));
    }
    Some(after_last.map_or(now_ms, |key| key.max(now_ms)))
}

/// Collection and order key for a task about to be appended to `status`.
///
/// When the lane has no key left above its maximum, the lane is re-densified
/// first and the new key is the lane length.
pub fn reserve_append(tasks: &[Task], status: TaskStatus, now_ms: OrderKey) -> (Vec<Task>, OrderKey) {
    if let Some(order) = next_order_key(tasks, status, now_ms) {
        return (tasks.to_vec(), order);
    }
    let mut next = tasks.to_vec();
    densify_in_place(&mut next, status);
    let lane_len = next.iter().filter(|task| task.status == status).count();
    (next, lane_len as OrderKey)
}

/// Returns the lane and 0-based sorted position of `task_id`.
pub fn position_of(tasks: &[Task], task_id: &TaskId) -> Option<LanePosition> {
    let status = tasks.iter().find(|task| &task.id == task_id)?.status;
    let mut lane: Vec<&Task> = tasks.iter().filter(|task| task.status == status).collect();
    lane.sort_by_key(|task| task.order);
    let index = lane.iter().position(|task| &task.id == task_id)?;
    Some(LanePosition::new(status, index))
}

/// Sorts one lane by order key, keeping collection order for ties.
pub fn sort_lane(lane: &mut [Task]) {
    lane.sort_by_key(|task| task.order);
}

fn densify(lane: &mut [Task]) {
    for (index, task) in lane.iter_mut().enumerate() {
        task.order = index as OrderKey;
    }
}

fn densify_in_place(tasks: &mut [Task], status: TaskStatus) {
    let mut members: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| task.status == status)
        .map(|(index, _)| index)
        .collect();
    members.sort_by_key(|&index| tasks[index].order);
    for (rank, index) in members.into_iter().enumerate() {
        tasks[index].order = rank as OrderKey;
    }
}

#[cfg(test)]
mod tests {
    use super::{move_task, next_order_key, position_of, remove, reserve_append, LanePosition};
    use crate::model::task::{Priority, Task, TaskId, TaskStatus};

    fn task(id: &str, status: TaskStatus, order: i64) -> Task {
        Task::with_id(TaskId::parse(id).unwrap(), id, Priority::Medium, status, order).unwrap()
    }

    fn id(value: &str) -> TaskId {
        TaskId::parse(value).unwrap()
    }

    fn lane(tasks: &[Task], status: TaskStatus) -> Vec<(String, i64)> {
        let mut members: Vec<&Task> = tasks.iter().filter(|t| t.status() == status).collect();
        members.sort_by_key(|t| t.order());
        members
            .into_iter()
            .map(|t| (t.id().to_string(), t.order()))
            .collect()
    }

    #[test]
    fn move_without_destination_is_noop() {
        let tasks = vec![task("1", TaskStatus::Todo, 0)];
        assert!(move_task(&tasks, &id("1"), None).is_none());
    }

    #[test]
    fn move_of_unknown_id_is_noop() {
        let tasks = vec![task("1", TaskStatus::Todo, 0)];
        let dest = Some(LanePosition::new(TaskStatus::Done, 0));
        assert!(move_task(&tasks, &id("missing"), dest).is_none());
    }

    #[test]
    fn move_clamps_index_to_lane_length() {
        let tasks = vec![
            task("a", TaskStatus::Done, 0),
            task("b", TaskStatus::Todo, 0),
        ];
        let moved = move_task(&tasks, &id("b"), Some(LanePosition::new(TaskStatus::Done, 99)))
            .unwrap();
        assert_eq!(
            lane(&moved, TaskStatus::Done),
            vec![("a".to_string(), 0), ("b".to_string(), 1)]
        );
        assert!(lane(&moved, TaskStatus::Todo).is_empty());
    }

    #[test]
    fn cross_lane_move_densifies_source_lane_in_place() {
        let tasks = vec![
            task("a", TaskStatus::Todo, 10),
            task("b", TaskStatus::Todo, 20),
            task("c", TaskStatus::Todo, 30),
        ];
        let moved =
            move_task(&tasks, &id("b"), Some(LanePosition::new(TaskStatus::Done, 0))).unwrap();
        assert_eq!(
            lane(&moved, TaskStatus::Todo),
            vec![("a".to_string(), 0), ("c".to_string(), 1)]
        );
        assert_eq!(moved.len(), 3);
    }

    #[test]
    fn move_sorts_destination_with_stable_ties() {
        let tasks = vec![
            task("x", TaskStatus::Todo, 5),
            task("y", TaskStatus::Todo, 5),
            task("z", TaskStatus::Done, 0),
        ];
        let moved =
            move_task(&tasks, &id("z"), Some(LanePosition::new(TaskStatus::Todo, 1))).unwrap();
        assert_eq!(
            lane(&moved, TaskStatus::Todo),
            vec![
                ("x".to_string(), 0),
                ("z".to_string(), 1),
                ("y".to_string(), 2)
            ]
        );
    }

    #[test]
    fn next_order_key_stays_after_lane_maximum() {
        let tasks = vec![
            task("a", TaskStatus::Todo, 1_000),
            task("b", TaskStatus::Done, 5_000),
        ];
        assert_eq!(next_order_key(&tasks, TaskStatus::Todo, 500), Some(1_001));
        assert_eq!(next_order_key(&tasks, TaskStatus::Todo, 9_000), Some(9_000));
        assert_eq!(next_order_key(&[], TaskStatus::Todo, 7), Some(7));
    }

    #[test]
    fn saturated_lane_is_densified_before_append() {
        let tasks = vec![
            task("top", TaskStatus::Todo, i64::MAX),
            task("low", TaskStatus::Todo, 3),
            task("done", TaskStatus::Done, i64::MAX),
        ];
        assert_eq!(next_order_key(&tasks, TaskStatus::Todo, 1_700_000_000_000), None);

        let (next, order) = reserve_append(&tasks, TaskStatus::Todo, 1_700_000_000_000);

        assert_eq!(order, 2);
        assert_eq!(
            lane(&next, TaskStatus::Todo),
            vec![("low".to_string(), 0), ("top".to_string(), 1)]
        );
        assert_eq!(lane(&next, TaskStatus::Done), vec![("done".to_string(), i64::MAX)]);
    }

    #[test]
    fn remove_leaves_gaps() {
        let tasks = vec![
            task("a", TaskStatus::Todo, 0),
            task("b", TaskStatus::Todo, 1),
            task("c", TaskStatus::Todo, 2),
        ];
        let next = remove(&tasks, &id("b")).unwrap();
        assert_eq!(
            lane(&next, TaskStatus::Todo),
            vec![("a".to_string(), 0), ("c".to_string(), 2)]
        );
        assert!(remove(&tasks, &id("zzz")).is_none());
    }

    #[test]
    fn position_of_reports_sorted_index() {
        let tasks = vec![
            task("late", TaskStatus::Todo, 9),
            task("early", TaskStatus::Todo, 1),
        ];
        assert_eq!(
            position_of(&tasks, &id("late")),
            Some(LanePosition::new(TaskStatus::Todo, 1))
        );
        assert_eq!(position_of(&tasks, &id("none")), None);
    }
}
