//! Task collection persistence over a key-value slot.
//!
//! # Responsibility
//! - Load and save the whole canonical collection as one JSON array.
//! - Normalize legacy records and reset the slot when its content is corrupt.
//!
//! # Invariants
//! - `load` never fails because of stored content; only backend read errors
//!   surface. A failed reset of a corrupt slot is logged, not returned.
//! - Records without a numeric `order` get their positional index.
//! - Unknown record fields survive a load/save cycle verbatim.
//! - Loaded ids are unique; a repeated id keeps its first record only.

use crate::db::DbError;
use crate::model::task::{OrderKey, Priority, Task, TaskId, TaskStatus};
use crate::repo::slot_store::SlotStore;
use log::{error, info, warn};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key the board is stored under unless configured otherwise.
pub const DEFAULT_SLOT_KEY: &str = "taskmate-tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for slot backend and encoding failures.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode tasks: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Repository interface for the canonical task collection.
pub trait TaskRepository {
    /// Loads the stored collection, resetting corrupt storage to empty.
    fn load(&self) -> RepoResult<Vec<Task>>;
    /// Replaces the stored collection.
    fn save(&self, tasks: &[Task]) -> RepoResult<()>;
}

impl<R: TaskRepository + ?Sized> TaskRepository for &R {
    fn load(&self) -> RepoResult<Vec<Task>> {
        (**self).load()
    }

    fn save(&self, tasks: &[Task]) -> RepoResult<()> {
        (**self).save(tasks)
    }
}

/// Task repository persisting into one named slot.
pub struct SlotTaskRepository<S: SlotStore> {
    store: S,
    key: String,
}

impl<S: SlotStore> SlotTaskRepository<S> {
    /// Creates a repository over `store` using [`DEFAULT_SLOT_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_SLOT_KEY)
    }

    /// Creates a repository over `store` using a custom slot key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Slot key this repository reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<S: SlotStore> TaskRepository for SlotTaskRepository<S> {
    fn load(&self) -> RepoResult<Vec<Task>> {
        let Some(raw) = self.store.get(&self.key)? else {
            info!("event=tasks_load module=repo status=empty reason=absent");
            return Ok(Vec::new());
        };

        match decode_tasks(&raw) {
            Ok(tasks) => {
                info!(
                    "event=tasks_load module=repo status=ok task_count={}",
                    tasks.len()
                );
                Ok(tasks)
            }
            Err(err) => {
                warn!(
                    "event=tasks_load module=repo status=reset reason=corrupt_slot error={}",
                    err
                );
                if let Err(reset_err) = self.store.remove(&self.key) {
                    warn!(
                        "event=tasks_load module=repo status=error reason=reset_failed error={}",
                        reset_err
                    );
                }
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, tasks: &[Task]) -> RepoResult<()> {
        let encoded = serde_json::to_string(tasks).map_err(RepoError::Encode)?;
        if let Err(err) = self.store.set(&self.key, &encoded) {
            error!(
                "event=tasks_save module=repo status=error task_count={} error={}",
                tasks.len(),
                err
            );
            return Err(err.into());
        }
        info!(
            "event=tasks_save module=repo status=ok task_count={}",
            tasks.len()
        );
        Ok(())
    }
}

/// Stored record shape, lenient about `order` and open to extra fields.
#[derive(Debug, Deserialize)]
struct StoredTaskRecord {
    id: String,
    title: String,
    priority: Priority,
    status: TaskStatus,
    #[serde(default)]
    order: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn decode_tasks(raw: &str) -> Result<Vec<Task>, String> {
    let records: Vec<StoredTaskRecord> =
        serde_json::from_str(raw).map_err(|err| err.to_string())?;

    let mut seen = HashSet::with_capacity(records.len());
    let mut tasks = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let id = TaskId::parse(record.id)
            .map_err(|err| format!("record {index}: {err}"))?;
        if !seen.insert(id.clone()) {
            warn!(
                "event=tasks_load module=repo status=skip reason=duplicate_id task_id={} index={}",
                id, index
            );
            continue;
        }

        let order = record
            .order
            .as_ref()
            .and_then(order_from_value)
            .unwrap_or(index as OrderKey);

        tasks.push(Task {
            id,
            title: record.title,
            priority: record.priority,
            status: record.status,
            order,
            extra: record.extra,
        });
    }
    Ok(tasks)
}

fn order_from_value(value: &Value) -> Option<OrderKey> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|number| number.is_finite())
            .map(|number| number.floor() as OrderKey)
    })
}

#[cfg(test)]
mod tests {
    use super::{decode_tasks, order_from_value};
    use serde_json::json;

    #[test]
    fn order_accepts_integers_and_floors_fractions() {
        assert_eq!(order_from_value(&json!(7)), Some(7));
        assert_eq!(order_from_value(&json!(2.9)), Some(2));
        assert_eq!(order_from_value(&json!("3")), None);
        assert_eq!(order_from_value(&json!(null)), None);
    }

    #[test]
    fn decode_rejects_non_array_and_bad_shapes() {
        assert!(decode_tasks("not-json").is_err());
        assert!(decode_tasks("{\"id\":\"a\"}").is_err());
        assert!(decode_tasks(
            "[{\"id\":\"a\",\"title\":\"t\",\"priority\":\"Urgent\",\"status\":\"todo\"}]"
        )
        .is_err());
        assert!(decode_tasks(
            "[{\"id\":\"  \",\"title\":\"t\",\"priority\":\"Low\",\"status\":\"todo\"}]"
        )
        .is_err());
    }

    #[test]
    fn decode_keeps_first_of_duplicate_ids() {
        let raw = json!([
            {"id": "a", "title": "first", "priority": "Low", "status": "todo", "order": 0},
            {"id": "a", "title": "second", "priority": "Low", "status": "done", "order": 0}
        ])
        .to_string();

        let tasks = decode_tasks(&raw).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title(), "first");
    }
}
