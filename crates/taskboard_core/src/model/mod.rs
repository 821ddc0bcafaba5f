//! Domain model for the task board.
//!
//! # Responsibility
//! - Define the single canonical entity (`Task`) and its vocabularies.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Lane membership is derived from `status` alone.

pub mod task;
