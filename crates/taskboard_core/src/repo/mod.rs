//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value slot contract the board is persisted into.
//! - Encode/decode the task collection and recover from corrupt slots.
//!
//! # Invariants
//! - Corrupt stored data never surfaces as an error; it resets the slot.
//! - Backend failures are surfaced as typed errors, never panics.

pub mod slot_store;
pub mod task_repo;
