//! Core use-case services.
//!
//! # Responsibility
//! - Keep lane ordering and field mutation rules as pure functions.
//! - Expose the board store that owns state, persistence and notification.

pub mod board;
pub mod ordering;
pub mod task_service;
