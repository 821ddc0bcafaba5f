use taskboard_core::{move_task, project, FilterState, LanePosition, Priority, Task, TaskId, TaskStatus};

fn id(value: &str) -> TaskId {
    TaskId::parse(value).unwrap()
}

fn task(task_id: &str, status: TaskStatus, order: i64) -> Task {
    Task::with_id(id(task_id), &format!("task {task_id}"), Priority::Medium, status, order).unwrap()
}

fn lane(tasks: &[Task], status: TaskStatus) -> Vec<(String, i64)> {
    project(tasks, &FilterState::default(), true)
        .lane(status)
        .iter()
        .map(|task| (task.id().to_string(), task.order()))
        .collect()
}

fn pair(task_id: &str, order: i64) -> (String, i64) {
    (task_id.to_string(), order)
}

#[test]
fn reorder_within_lane_moves_task_to_front() {
    let tasks = vec![task("1", TaskStatus::Todo, 0), task("2", TaskStatus::Todo, 1)];

    let moved = move_task(&tasks, &id("2"), Some(LanePosition::new(TaskStatus::Todo, 0))).unwrap();

    assert_eq!(lane(&moved, TaskStatus::Todo), vec![pair("2", 0), pair("1", 1)]);
}

#[test]
fn cross_lane_move_lands_task_in_destination_once() {
    let tasks = vec![task("1", TaskStatus::Todo, 0), task("2", TaskStatus::Todo, 1)];
    let reordered =
        move_task(&tasks, &id("2"), Some(LanePosition::new(TaskStatus::Todo, 0))).unwrap();

    let moved = move_task(
        &reordered,
        &id("1"),
        Some(LanePosition::new(TaskStatus::InProgress, 0)),
    )
    .unwrap();

    assert_eq!(lane(&moved, TaskStatus::Todo), vec![pair("2", 0)]);
    assert_eq!(lane(&moved, TaskStatus::InProgress), vec![pair("1", 0)]);
    assert!(lane(&moved, TaskStatus::Done).is_empty());
    assert_eq!(moved.len(), 2);
    assert_eq!(
        moved.iter().filter(|task| task.id() == &id("1")).count(),
        1
    );
}

#[test]
fn moving_to_current_position_keeps_sequence() {
    let tasks = vec![
        task("a", TaskStatus::Done, 100),
        task("b", TaskStatus::Done, 250),
        task("c", TaskStatus::Done, 900),
    ];

    let moved = move_task(&tasks, &id("b"), Some(LanePosition::new(TaskStatus::Done, 1))).unwrap();

    assert_eq!(
        lane(&moved, TaskStatus::Done),
        vec![pair("a", 0), pair("b", 1), pair("c", 2)]
    );
}

#[test]
fn other_lanes_keep_their_keys() {
    let tasks = vec![
        task("t", TaskStatus::Todo, 1_700_000_000_000),
        task("p", TaskStatus::InProgress, 4),
        task("d", TaskStatus::Done, 7),
    ];

    let moved =
        move_task(&tasks, &id("p"), Some(LanePosition::new(TaskStatus::Done, 0))).unwrap();

    assert_eq!(lane(&moved, TaskStatus::Todo), vec![pair("t", 1_700_000_000_000)]);
    assert_eq!(lane(&moved, TaskStatus::Done), vec![pair("p", 0), pair("d", 1)]);
    assert!(moved
        .iter()
        .all(|task| task.status() != TaskStatus::InProgress));
}

#[test]
fn cancelled_reorder_returns_nothing_to_apply() {
    let tasks = vec![task("1", TaskStatus::Todo, 0)];
    assert!(move_task(&tasks, &id("1"), None).is_none());
}
