//! In-memory record store for tasks, events, preference and status.
//!
//! Single-process and non-durable. Every accessor takes the lock for the
//! duration of one operation only; planning works on [`StoreSnapshot`]
//! copies so no lock is held while the planner runs.

use indexmap::IndexMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;
use uuid::Uuid;

use crate::calendar::Event;
use crate::error::StoreError;
use crate::preference::{UserPreference, UserStatus};
use crate::task::Task;

#[derive(Debug, Default)]
struct Records {
    tasks: IndexMap<String, Task>,
    events: Vec<Event>,
    preference: Option<UserPreference>,
    status: UserStatus,
}

/// Owned copy of the store for one planning call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    pub tasks: Vec<Task>,
    pub events: Vec<Event>,
    /// `None` until a preference has been stored
    pub preference: Option<UserPreference>,
    pub status: UserStatus,
}

/// Thread-safe, insertion-ordered record store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Records> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Records> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a task, assigning a UUID when it has no id.
    ///
    /// # Errors
    /// Returns `AlreadyExists` if a task with the same id is stored.
    pub fn create_task(&self, mut task: Task) -> Result<Task, StoreError> {
        let id = task
            .id
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone();

        let mut records = self.write();
        if records.tasks.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        records.tasks.insert(id.clone(), task.clone());
        debug!(target: "focusplan::store", task_id = %id, "task created");
        Ok(task)
    }

    pub fn get_task(&self, id: &str) -> Result<Task, StoreError> {
        self.read()
            .tasks
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// All tasks in insertion order.
    pub fn list_tasks(&self) -> Vec<Task> {
        self.read().tasks.values().cloned().collect()
    }

    pub fn delete_task(&self, id: &str) -> Result<Task, StoreError> {
        let removed = self
            .write()
            .tasks
            .shift_remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        debug!(target: "focusplan::store", task_id = %id, "task deleted");
        Ok(removed)
    }

    pub fn add_event(&self, event: Event) {
        self.write().events.push(event);
    }

    pub fn list_events(&self) -> Vec<Event> {
        self.read().events.clone()
    }

    pub fn preference(&self) -> Option<UserPreference> {
        self.read().preference.clone()
    }

    pub fn put_preference(&self, preference: UserPreference) {
        self.write().preference = Some(preference);
    }

    pub fn status(&self) -> UserStatus {
        self.read().status.clone()
    }

    pub fn put_status(&self, status: UserStatus) {
        self.write().status = status;
    }

    /// Flip rest mode and return the new status.
    pub fn toggle_rest_mode(&self) -> UserStatus {
        let mut records = self.write();
        records.status.rest_mode = !records.status.rest_mode;
        debug!(target: "focusplan::store", rest_mode = records.status.rest_mode, "rest mode toggled");
        records.status.clone()
    }

    /// Copy everything out under a single read lock.
    pub fn snapshot(&self) -> StoreSnapshot {
        let records = self.read();
        StoreSnapshot {
            tasks: records.tasks.values().cloned().collect(),
            events: records.events.clone(),
            preference: records.preference.clone(),
            status: records.status.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn create_assigns_id_when_missing() {
        let store = MemoryStore::new();
        let task = store.create_task(Task::flexible("Read", 30)).unwrap();
        let id = task.id.clone().unwrap();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_eq!(store.get_task(&id).unwrap(), task);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let store = MemoryStore::new();
        store.create_task(Task::flexible("A", 30).with_id("a")).unwrap();
        let err = store.create_task(Task::flexible("B", 30).with_id("a")).unwrap_err();
        assert_eq!(err, StoreError::AlreadyExists("a".to_string()));
    }

    #[test]
    fn delete_keeps_remaining_order() {
        let store = MemoryStore::new();
        for id in ["a", "b", "c"] {
            store.create_task(Task::flexible(id, 30).with_id(id)).unwrap();
        }
        store.delete_task("b").unwrap();
        let ids: Vec<_> = store
            .list_tasks()
            .into_iter()
            .filter_map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(store.delete_task("b"), Err(StoreError::NotFound("b".to_string())));
        assert!(store.get_task("b").is_err());
    }

    #[test]
    fn rest_mode_toggles() {
        let store = MemoryStore::new();
        assert!(store.toggle_rest_mode().rest_mode);
        assert!(!store.toggle_rest_mode().rest_mode);
    }

    #[test]
    fn snapshot_is_detached_from_store() {
        let store = MemoryStore::new();
        store.put_preference(UserPreference::default());
        let snapshot = store.snapshot();
        store.create_task(Task::flexible("Later", 30)).unwrap();
        assert!(snapshot.tasks.is_empty());
        assert_eq!(snapshot.preference, Some(UserPreference::default()));
    }

    #[test]
    fn concurrent_creates_are_all_kept() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store
                        .create_task(Task::flexible(format!("task {i}"), 30))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.list_tasks().len(), 8);
    }
}
