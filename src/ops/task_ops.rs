use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::model::list::ListId;
use crate::model::store::{StoreError, TaskStore};
use crate::model::task::{CategoryFlags, Flag, MAX_TASK_TEXT_LEN, Task, TaskId};

/// A task taken out of the store, with the index it occupied.
/// Handing it back to [`TaskStore::restore_task`] undoes the delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedTask {
    pub task: Task,
    pub index: usize,
}

/// Trim `text` and check it against the task length limit
pub fn validate_task_text(text: &str) -> Result<String, StoreError> {
    let trimmed = text.trim();
    let len = trimmed.chars().count();
    if len == 0 || len > MAX_TASK_TEXT_LEN {
        return Err(StoreError::Length {
            what: "task text",
            len,
            max: MAX_TASK_TEXT_LEN,
        });
    }
    Ok(trimmed.to_string())
}

impl TaskStore {
    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Create a task at the front of the collection.
    pub fn create_task(
        &mut self,
        text: &str,
        flags: CategoryFlags,
        list_id: Option<ListId>,
    ) -> Result<Task, StoreError> {
        let text = validate_task_text(text)?;
        if let Some(list_id) = list_id {
            self.list_index(list_id)?;
        }
        let id = self.allocate_task_id();
        let task = Task::new(id, text, flags, list_id, Utc::now());
        self.tasks.insert(0, task.clone());
        Ok(task)
    }

    /// Flip `completed`, setting or removing `completed_at`.
    pub fn toggle_completed(&mut self, id: TaskId) -> Result<Task, StoreError> {
        let task = self.task_mut(id)?;
        let completed = !task.completed;
        task.set_completed(completed, Utc::now());
        Ok(task.clone())
    }

    /// Flip one category flag.
    pub fn toggle_flag(&mut self, id: TaskId, flag: Flag) -> Result<Task, StoreError> {
        let task = self.task_mut(id)?;
        let value = task.flag_mut(flag);
        *value = !*value;
        task.touch(Utc::now());
        Ok(task.clone())
    }

    /// Replace a task's text. Unchanged text (after trimming) is a no-op.
    pub fn edit_text(&mut self, id: TaskId, new_text: &str) -> Result<Task, StoreError> {
        let index = self.task_index(id)?;
        let text = validate_task_text(new_text)?;
        let task = &mut self.tasks[index];
        if task.text != text {
            task.text = text;
            task.touch(Utc::now());
        }
        Ok(task.clone())
    }

    /// Attach a task to a custom list, or detach it with `None`.
    pub fn move_task_to_list(
        &mut self,
        id: TaskId,
        list_id: Option<ListId>,
    ) -> Result<Task, StoreError> {
        let index = self.task_index(id)?;
        if let Some(list_id) = list_id {
            self.list_index(list_id)?;
        }
        let task = &mut self.tasks[index];
        if task.list_id != list_id {
            task.list_id = list_id;
            task.touch(Utc::now());
        }
        Ok(task.clone())
    }

    /// Remove a task, returning it together with its former index.
    pub fn delete_task(&mut self, id: TaskId) -> Result<RemovedTask, StoreError> {
        let index = self.task_index(id)?;
        let task = self.tasks.remove(index);
        Ok(RemovedTask { task, index })
    }

    /// Re-insert a previously removed task. An index past the end appends.
    pub fn restore_task(&mut self, removed: RemovedTask) -> Result<Task, StoreError> {
        let RemovedTask { task, index } = removed;
        if self.tasks.iter().any(|t| t.id == task.id) {
            return Err(StoreError::DuplicateTask(task.id));
        }
        if let Some(list_id) = task.list_id {
            self.list_index(list_id)?;
        }
        let index = index.min(self.tasks.len());
        self.tasks.insert(index, task.clone());
        Ok(task)
    }

    // -----------------------------------------------------------------------
    // Ordering
    // -----------------------------------------------------------------------

    /// Move the task at backing index `from` to backing index `to`.
    pub fn reorder_task(&mut self, from: usize, to: usize) -> Result<&[Task], StoreError> {
        let len = self.tasks.len();
        if from >= len || to >= len {
            return Err(StoreError::OutOfRange { from, to, len });
        }
        if from != to {
            let task = self.tasks.remove(from);
            self.tasks.insert(to, task);
        }
        Ok(&self.tasks)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(store: &TaskStore) -> Vec<u64> {
        store.tasks().iter().map(|t| t.id.0).collect()
    }

    fn store_with(texts: &[&str]) -> TaskStore {
        let mut store = TaskStore::new();
        for text in texts {
            store
                .create_task(text, CategoryFlags::default(), None)
                .unwrap();
        }
        store
    }

    // --- create ---

    #[test]
    fn create_inserts_at_front() {
        let store = store_with(&["first", "second", "third"]);
        assert_eq!(ids(&store), vec![3, 2, 1]);
        assert_eq!(store.tasks()[0].text, "third");
    }

    #[test]
    fn create_trims_text() {
        let mut store = TaskStore::new();
        let task = store
            .create_task("  Pay bills  ", CategoryFlags::my_day(), None)
            .unwrap();
        assert_eq!(task.text, "Pay bills");
        assert!(task.my_day);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn create_rejects_empty_and_blank() {
        let mut store = TaskStore::new();
        for text in ["", "   ", "\t\n"] {
            let err = store
                .create_task(text, CategoryFlags::default(), None)
                .unwrap_err();
            assert!(matches!(err, StoreError::Length { len: 0, .. }));
        }
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn create_length_boundary() {
        let mut store = TaskStore::new();
        let ok = "a".repeat(255);
        assert!(store.create_task(&ok, CategoryFlags::default(), None).is_ok());
        let too_long = "a".repeat(256);
        let err = store
            .create_task(&too_long, CategoryFlags::default(), None)
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::Length {
                what: "task text",
                len: 256,
                max: 255
            }
        );
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn create_counts_characters_not_bytes() {
        let mut store = TaskStore::new();
        let text = "é".repeat(255);
        assert!(store.create_task(&text, CategoryFlags::default(), None).is_ok());
    }

    #[test]
    fn create_with_unknown_list_fails() {
        let mut store = TaskStore::new();
        let err = store
            .create_task("x", CategoryFlags::default(), Some(ListId(9)))
            .unwrap_err();
        assert_eq!(err, StoreError::ListNotFound(ListId(9)));
        assert!(store.tasks().is_empty());
    }

    // --- toggles ---

    #[test]
    fn toggle_completed_round_trip() {
        let mut store = store_with(&["a"]);
        let id = store.tasks()[0].id;

        let task = store.toggle_completed(id).unwrap();
        assert!(task.completed);
        assert!(task.completed_at.is_some());

        let task = store.toggle_completed(id).unwrap();
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn toggle_stamps_updated_at() {
        let mut store = store_with(&["a"]);
        let id = store.tasks()[0].id;
        let old = Utc::now() - chrono::Duration::days(1);
        store.tasks[0].updated_at = old;
        let task = store.toggle_flag(id, Flag::Important).unwrap();
        assert!(task.important);
        assert!(task.updated_at > old);
    }

    #[test]
    fn toggle_missing_task() {
        let mut store = TaskStore::new();
        assert_eq!(
            store.toggle_completed(TaskId(4)).unwrap_err(),
            StoreError::TaskNotFound(TaskId(4))
        );
        assert_eq!(
            store.toggle_flag(TaskId(4), Flag::MyDay).unwrap_err(),
            StoreError::TaskNotFound(TaskId(4))
        );
    }

    // --- edit ---

    #[test]
    fn edit_text_replaces_and_validates() {
        let mut store = store_with(&["a"]);
        let id = store.tasks()[0].id;
        let task = store.edit_text(id, " b ").unwrap();
        assert_eq!(task.text, "b");

        let err = store.edit_text(id, &"x".repeat(300)).unwrap_err();
        assert!(matches!(err, StoreError::Length { len: 300, .. }));
        assert_eq!(store.tasks()[0].text, "b");
    }

    #[test]
    fn edit_unknown_id_reports_not_found_first() {
        let mut store = TaskStore::new();
        assert_eq!(
            store.edit_text(TaskId(1), "").unwrap_err(),
            StoreError::TaskNotFound(TaskId(1))
        );
    }

    // --- delete / restore ---

    #[test]
    fn delete_then_restore_is_identity() {
        let mut store = store_with(&["a", "b", "c"]);
        let before = store.tasks().to_vec();
        let removed = store.delete_task(TaskId(2)).unwrap();
        assert_eq!(removed.index, 1);
        assert_eq!(ids(&store), vec![3, 1]);

        store.restore_task(removed).unwrap();
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn restore_twice_is_rejected() {
        let mut store = store_with(&["a"]);
        let removed = store.delete_task(TaskId(1)).unwrap();
        store.restore_task(removed.clone()).unwrap();
        assert_eq!(
            store.restore_task(removed).unwrap_err(),
            StoreError::DuplicateTask(TaskId(1))
        );
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn restore_clamps_index() {
        let mut store = store_with(&["a", "b"]);
        let removed = store.delete_task(TaskId(1)).unwrap();
        store.delete_task(TaskId(2)).unwrap();
        store.restore_task(removed).unwrap();
        assert_eq!(ids(&store), vec![1]);
    }

    // --- reorder ---

    #[test]
    fn reorder_moves_one_record() {
        let mut store = store_with(&["a", "b", "c", "d"]);
        assert_eq!(ids(&store), vec![4, 3, 2, 1]);
        store.reorder_task(0, 2).unwrap();
        assert_eq!(ids(&store), vec![3, 2, 4, 1]);
        store.reorder_task(3, 0).unwrap();
        assert_eq!(ids(&store), vec![1, 3, 2, 4]);
    }

    #[test]
    fn reorder_out_of_range_is_rejected() {
        let mut store = store_with(&["a", "b"]);
        let err = store.reorder_task(0, 2).unwrap_err();
        assert_eq!(
            err,
            StoreError::OutOfRange {
                from: 0,
                to: 2,
                len: 2
            }
        );
        assert_eq!(ids(&store), vec![2, 1]);
    }

    // --- lists ---

    #[test]
    fn move_task_to_list_and_back() {
        let mut store = store_with(&["a"]);
        let list = store.create_list("Home", "theme-green").unwrap();
        let task = store.move_task_to_list(TaskId(1), Some(list.id)).unwrap();
        assert_eq!(task.list_id, Some(list.id));
        let task = store.move_task_to_list(TaskId(1), None).unwrap();
        assert_eq!(task.list_id, None);
        assert_eq!(
            store
                .move_task_to_list(TaskId(1), Some(ListId(77)))
                .unwrap_err(),
            StoreError::ListNotFound(ListId(77))
        );
    }
}
