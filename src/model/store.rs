use serde::{Deserialize, Serialize};

use super::list::{CustomList, ListId};
use super::task::{Task, TaskId};
use super::theme::ThemeRegistry;

/// Error type for store operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{what} must be between 1 and {max} characters (got {len})")]
    Length {
        what: &'static str,
        len: usize,
        max: usize,
    },
    #[error("list name cannot be empty")]
    EmptyListName,
    #[error("a list named \"{0}\" already exists")]
    DuplicateListName(String),
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
    #[error("task {0} is already in the collection")]
    DuplicateTask(TaskId),
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    #[error("list not found: {0}")]
    ListNotFound(ListId),
    #[error("cannot move position {from} to {to}: collection has {len} entries")]
    OutOfRange { from: usize, to: usize, len: usize },
}

/// Broad failure category, for callers that only branch on the kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Length,
    Validation,
    NotFound,
    Range,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Length { .. } => ErrorKind::Length,
            StoreError::EmptyListName
            | StoreError::DuplicateListName(_)
            | StoreError::UnknownTheme(_)
            | StoreError::DuplicateTask(_) => ErrorKind::Validation,
            StoreError::TaskNotFound(_) | StoreError::ListNotFound(_) => ErrorKind::NotFound,
            StoreError::OutOfRange { .. } => ErrorKind::Range,
        }
    }
}

/// Next ids to hand out, persisted so ids of hard-deleted records are never reused
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextIds {
    pub task: u64,
    pub list: u64,
}

/// The authoritative task and custom list collections.
///
/// Tasks are kept most-recent-first unless reordered. All mutation goes
/// through the operations in `crate::ops`; every operation either applies
/// fully or returns an error with the collections untouched.
#[derive(Debug, Clone)]
pub struct TaskStore {
    pub(crate) tasks: Vec<Task>,
    pub(crate) lists: Vec<CustomList>,
    pub(crate) themes: ThemeRegistry,
    next_task_id: u64,
    next_list_id: u64,
}

impl Default for TaskStore {
    fn default() -> Self {
        TaskStore::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        TaskStore {
            tasks: Vec::new(),
            lists: Vec::new(),
            themes: ThemeRegistry::default(),
            next_task_id: 1,
            next_list_id: 1,
        }
    }

    /// Build a store from previously persisted records.
    ///
    /// Tasks that point at a list missing from `lists` are detached from it.
    /// Returns the store and the number of tasks detached.
    pub fn from_records(mut tasks: Vec<Task>, lists: Vec<CustomList>) -> (Self, usize) {
        let mut detached = 0;
        for task in &mut tasks {
            if let Some(list_id) = task.list_id
                && !lists.iter().any(|l| l.id == list_id)
            {
                task.list_id = None;
                detached += 1;
            }
        }
        let next_task_id = tasks.iter().map(|t| t.id.0).max().map_or(1, |m| m + 1);
        let next_list_id = lists.iter().map(|l| l.id.0).max().map_or(1, |m| m + 1);
        let store = TaskStore {
            tasks,
            lists,
            themes: ThemeRegistry::default(),
            next_task_id,
            next_list_id,
        };
        (store, detached)
    }

    /// All tasks in backing order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// All custom lists in creation order
    pub fn lists(&self) -> &[CustomList] {
        &self.lists
    }

    pub fn themes(&self) -> &ThemeRegistry {
        &self.themes
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn list(&self, id: ListId) -> Option<&CustomList> {
        self.lists.iter().find(|l| l.id == id)
    }

    /// Case-insensitive lookup by list name
    pub fn list_by_name(&self, name: &str) -> Option<&CustomList> {
        self.lists.iter().find(|l| l.name_matches(name.trim()))
    }

    pub(crate) fn task_index(&self, id: TaskId) -> Result<usize, StoreError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::TaskNotFound(id))
    }

    pub(crate) fn task_mut(&mut self, id: TaskId) -> Result<&mut Task, StoreError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::TaskNotFound(id))
    }

    pub(crate) fn list_index(&self, id: ListId) -> Result<usize, StoreError> {
        self.lists
            .iter()
            .position(|l| l.id == id)
            .ok_or(StoreError::ListNotFound(id))
    }

    pub(crate) fn allocate_task_id(&mut self) -> TaskId {
        let id = TaskId(self.next_task_id);
        self.next_task_id += 1;
        id
    }

    /// Keep `id` from being handed out again (a task held outside the store,
    /// such as a pending undo).
    pub(crate) fn reserve_task_id(&mut self, id: TaskId) {
        self.next_task_id = self.next_task_id.max(id.0 + 1);
    }

    pub fn next_ids(&self) -> NextIds {
        NextIds {
            task: self.next_task_id,
            list: self.next_list_id,
        }
    }

    /// Raise the id counters to at least `next`. Never lowers them.
    pub(crate) fn reserve_ids(&mut self, next: NextIds) {
        self.next_task_id = self.next_task_id.max(next.task);
        self.next_list_id = self.next_list_id.max(next.list);
    }

    pub(crate) fn allocate_list_id(&mut self) -> ListId {
        let id = ListId(self.next_list_id);
        self.next_list_id += 1;
        id
    }
}
