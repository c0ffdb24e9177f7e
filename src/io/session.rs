use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::io::storage::{KeyValueStore, StorageError};
use crate::model::list::{CustomList, ListId};
use crate::model::store::{NextIds, StoreError, TaskStore};
use crate::model::task::{CategoryFlags, Flag, Task, TaskId};
use crate::ops::list_ops::RemovedList;
use crate::ops::task_ops::RemovedTask;
use crate::ops::view::Filter;

pub const TODOS_KEY: &str = "todos";
pub const LISTS_KEY: &str = "customLists";
pub const LAST_SAVED_KEY: &str = "lastSaved";
/// Most recent deletion, kept so `undo` survives a process restart
pub const LAST_DELETED_KEY: &str = "lastDeleted";
/// Id counters, so ids of records deleted for good are not handed out again
pub const NEXT_IDS_KEY: &str = "nextIds";

/// Result of a mutation that succeeded in memory.
///
/// `persist_error` is set when the new state could not be written; the
/// in-memory state stays authoritative either way.
#[derive(Debug)]
pub struct Saved<T> {
    pub value: T,
    pub persist_error: Option<StorageError>,
}

impl<T> Saved<T> {
    pub fn is_persisted(&self) -> bool {
        self.persist_error.is_none()
    }
}

type Listener = Box<dyn FnMut(&TaskStore)>;

/// A task store bound to its persistence collaborator.
///
/// Every successful mutation writes the full collections back and then
/// notifies registered listeners. Failed operations touch neither.
pub struct Session<S: KeyValueStore> {
    store: TaskStore,
    backend: S,
    listeners: Vec<Listener>,
    last_deleted: Option<RemovedTask>,
    undo_delete: bool,
    load_error: Option<StorageError>,
}

impl<S: KeyValueStore> Session<S> {
    /// Load both collections from `backend`.
    ///
    /// A failed or malformed read is logged and treated as no existing
    /// data; the error stays available through [`load_error`](Self::load_error).
    pub fn open(backend: S) -> Self {
        let mut load_error = None;
        let tasks: Vec<Task> = read_key(&backend, TODOS_KEY).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not load tasks, starting empty");
            load_error = Some(e);
            Vec::new()
        });
        let lists: Vec<CustomList> = read_key(&backend, LISTS_KEY).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not load lists, starting empty");
            if load_error.is_none() {
                load_error = Some(e);
            }
            Vec::new()
        });
        let last_deleted = read_key::<Option<RemovedTask>, _>(&backend, LAST_DELETED_KEY)
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "could not load pending undo, dropping it");
                None
            });
        let next_ids = read_key::<Option<NextIds>, _>(&backend, NEXT_IDS_KEY)
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "could not load id counters");
                None
            });

        let (mut store, detached) = TaskStore::from_records(tasks, lists);
        if let Some(next) = next_ids {
            store.reserve_ids(next);
        }
        if let Some(removed) = &last_deleted {
            store.reserve_task_id(removed.task.id);
        }
        if detached > 0 {
            tracing::warn!(detached, "tasks referenced missing lists and were detached");
        }
        tracing::info!(
            tasks = store.tasks().len(),
            lists = store.lists().len(),
            "session opened"
        );

        Session {
            store,
            backend,
            listeners: Vec::new(),
            last_deleted,
            undo_delete: true,
            load_error,
        }
    }

    /// Whether deletes are kept for [`undo_delete`](Self::undo_delete)
    pub fn with_undo(mut self, enabled: bool) -> Self {
        self.undo_delete = enabled;
        if !enabled {
            self.last_deleted = None;
        }
        self
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn load_error(&self) -> Option<&StorageError> {
        self.load_error.as_ref()
    }

    pub fn last_deleted(&self) -> Option<&RemovedTask> {
        self.last_deleted.as_ref()
    }

    /// Timestamp of the last successful save, if one was recorded
    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        let raw: String = read_key::<Option<String>, _>(&self.backend, LAST_SAVED_KEY).ok()??;
        DateTime::parse_from_rfc3339(&raw)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    /// Register a callback run after every successful mutation
    pub fn subscribe(&mut self, listener: impl FnMut(&TaskStore) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Write both collections and the save timestamp.
    pub fn persist(&mut self) -> Result<(), StorageError> {
        let todos = to_json(TODOS_KEY, self.store.tasks())?;
        let lists = to_json(LISTS_KEY, self.store.lists())?;
        let next_ids = to_json(NEXT_IDS_KEY, &self.store.next_ids())?;
        let saved_at = to_json(LAST_SAVED_KEY, &Utc::now().to_rfc3339())?;
        self.backend.write(TODOS_KEY, &todos)?;
        self.backend.write(LISTS_KEY, &lists)?;
        self.backend.write(NEXT_IDS_KEY, &next_ids)?;
        self.backend.write(LAST_SAVED_KEY, &saved_at)?;
        tracing::debug!(
            tasks = self.store.tasks().len(),
            lists = self.store.lists().len(),
            "saved"
        );
        Ok(())
    }

    fn persist_last_deleted(&mut self) -> Result<(), StorageError> {
        let value = to_json(LAST_DELETED_KEY, &self.last_deleted)?;
        self.backend.write(LAST_DELETED_KEY, &value)
    }

    fn mutate<T>(
        &mut self,
        op: impl FnOnce(&mut TaskStore) -> Result<T, StoreError>,
    ) -> Result<Saved<T>, StoreError> {
        let value = op(&mut self.store)?;
        let persist_error = self.persist().err();
        if let Some(e) = &persist_error {
            tracing::warn!(error = %e, "changes may not survive a reload");
        }
        for listener in &mut self.listeners {
            listener(&self.store);
        }
        Ok(Saved {
            value,
            persist_error,
        })
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    pub fn create_task(
        &mut self,
        text: &str,
        flags: CategoryFlags,
        list_id: Option<ListId>,
    ) -> Result<Saved<Task>, StoreError> {
        self.mutate(|s| s.create_task(text, flags, list_id))
    }

    pub fn toggle_completed(&mut self, id: TaskId) -> Result<Saved<Task>, StoreError> {
        self.mutate(|s| s.toggle_completed(id))
    }

    pub fn toggle_flag(&mut self, id: TaskId, flag: Flag) -> Result<Saved<Task>, StoreError> {
        self.mutate(|s| s.toggle_flag(id, flag))
    }

    pub fn edit_text(&mut self, id: TaskId, text: &str) -> Result<Saved<Task>, StoreError> {
        self.mutate(|s| s.edit_text(id, text))
    }

    pub fn move_task_to_list(
        &mut self,
        id: TaskId,
        list_id: Option<ListId>,
    ) -> Result<Saved<Task>, StoreError> {
        self.mutate(|s| s.move_task_to_list(id, list_id))
    }

    /// Delete a task, remembering it for [`undo_delete`](Self::undo_delete)
    /// when undo is enabled.
    pub fn delete_task(&mut self, id: TaskId) -> Result<Saved<RemovedTask>, StoreError> {
        let mut saved = self.mutate(|s| s.delete_task(id))?;
        if self.undo_delete {
            self.last_deleted = Some(saved.value.clone());
            if let Err(e) = self.persist_last_deleted() {
                tracing::warn!(error = %e, "could not record deletion for undo");
                saved.persist_error = saved.persist_error.or(Some(e));
            }
        }
        Ok(saved)
    }

    /// Put the most recently deleted task back where it was.
    /// Returns `Ok(None)` when there is nothing to undo.
    pub fn undo_delete(&mut self) -> Result<Option<Saved<Task>>, StoreError> {
        let Some(removed) = self.last_deleted.clone() else {
            return Ok(None);
        };
        let mut saved = self.mutate(|s| s.restore_task(removed))?;
        self.last_deleted = None;
        if let Err(e) = self.persist_last_deleted() {
            saved.persist_error = saved.persist_error.or(Some(e));
        }
        tracing::info!(task = %saved.value.id, "deletion undone");
        Ok(Some(saved))
    }

    pub fn restore_task(&mut self, removed: RemovedTask) -> Result<Saved<Task>, StoreError> {
        self.mutate(|s| s.restore_task(removed))
    }

    pub fn reorder_task(&mut self, from: usize, to: usize) -> Result<Saved<Vec<Task>>, StoreError> {
        self.mutate(|s| s.reorder_task(from, to).map(<[Task]>::to_vec))
    }

    pub fn reorder_in_view(
        &mut self,
        filter: &Filter,
        from: usize,
        to: usize,
    ) -> Result<Saved<Vec<Task>>, StoreError> {
        self.mutate(|s| s.reorder_in_view(filter, from, to).map(<[Task]>::to_vec))
    }

    // -----------------------------------------------------------------------
    // Lists
    // -----------------------------------------------------------------------

    pub fn create_list(&mut self, name: &str, theme: &str) -> Result<Saved<CustomList>, StoreError> {
        self.mutate(|s| s.create_list(name, theme))
    }

    pub fn rename_list(&mut self, id: ListId, name: &str) -> Result<Saved<CustomList>, StoreError> {
        self.mutate(|s| s.rename_list(id, name))
    }

    pub fn set_list_theme(
        &mut self,
        id: ListId,
        theme: &str,
    ) -> Result<Saved<CustomList>, StoreError> {
        self.mutate(|s| s.set_list_theme(id, theme))
    }

    /// Delete a list and its tasks. A pending undo for a task of that list
    /// is dropped along with it.
    pub fn delete_list(&mut self, id: ListId) -> Result<Saved<RemovedList>, StoreError> {
        let mut saved = self.mutate(|s| s.delete_list(id))?;
        if self
            .last_deleted
            .as_ref()
            .is_some_and(|r| r.task.list_id == Some(id))
        {
            self.last_deleted = None;
            if let Err(e) = self.persist_last_deleted() {
                saved.persist_error = saved.persist_error.or(Some(e));
            }
            tracing::debug!(list = %id, "pending undo dropped with its list");
        }
        Ok(saved)
    }
}

/// Read and decode one key; a key that was never written decodes as default.
fn read_key<T, S>(backend: &S, key: &str) -> Result<T, StorageError>
where
    T: DeserializeOwned + Default,
    S: KeyValueStore,
{
    match backend.read(key)? {
        Some(raw) if !raw.trim().is_empty() => {
            serde_json::from_str(&raw).map_err(|e| StorageError::Json {
                key: key.to_string(),
                source: e,
            })
        }
        _ => Ok(T::default()),
    }
}

fn to_json<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|e| StorageError::Json {
        key: key.to_string(),
        source: e,
    })
}
