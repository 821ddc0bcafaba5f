//! Core domain logic for the task board.
//! This crate is the single source of truth for lane ordering invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use config::BoardConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{
    parse_priority_input, OrderKey, Priority, Task, TaskId, TaskStatus, TaskValidationError,
};
pub use repo::slot_store::{MemorySlotStore, SlotStore, SqliteSlotStore};
pub use repo::task_repo::{
    RepoError, RepoResult, SlotTaskRepository, TaskRepository, DEFAULT_SLOT_KEY,
};
pub use service::board::{Board, BoardError, MutationOutcome};
pub use service::ordering::{move_task, LanePosition};
pub use service::task_service::{create_task, delete_task, update_fields, TaskPatch};
pub use view::projection::{project, FilterState, LaneMap};
pub use view::stats::BoardStats;
pub use view::BoardView;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
