//! Durable key-value slot stores.
//!
//! # Responsibility
//! - Provide get/set/remove over named text slots.
//! - Keep SQL details inside the slot store boundary.
//!
//! # Invariants
//! - `set` replaces the whole value of a slot atomically.
//! - `remove` of an absent slot is not an error.

use crate::db::migrations::{current_version, latest_version};
use crate::db::{DbError, DbResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Named text slot storage.
pub trait SlotStore {
    /// Reads one slot; `None` when it was never written or was removed.
    fn get(&self, key: &str) -> DbResult<Option<String>>;
    /// Writes one slot, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> DbResult<()>;
    /// Clears one slot.
    fn remove(&self, key: &str) -> DbResult<()>;
}

impl<S: SlotStore + ?Sized> SlotStore for &S {
    fn get(&self, key: &str) -> DbResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> DbResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> DbResult<()> {
        (**self).remove(key)
    }
}

/// SQLite-backed slot store over the `kv_slots` table.
pub struct SqliteSlotStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotStore<'conn> {
    /// Creates a store from a migrated connection.
    ///
    /// # Errors
    /// - Returns [`DbError::UninitializedConnection`] when migrations have not
    ///   been applied to `conn`.
    pub fn try_new(conn: &'conn Connection) -> DbResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_version(conn)?;
        if actual_version != expected_version {
            return Err(DbError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl SlotStore for SqliteSlotStore<'_> {
    fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT slot_value FROM kv_slots WHERE slot_key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (slot_key, slot_value)
             VALUES (?1, ?2)
             ON CONFLICT(slot_key) DO UPDATE
             SET slot_value = excluded.slot_value,
                 updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> DbResult<()> {
        self.conn
            .execute("DELETE FROM kv_slots WHERE slot_key = ?1;", [key])?;
        Ok(())
    }
}

/// Process-local slot store, used by tests and ephemeral boards.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: RefCell<BTreeMap<String, String>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with one slot pre-filled.
    pub fn with_slot(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl SlotStore for MemorySlotStore {
    fn get(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> DbResult<()> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> DbResult<()> {
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}
