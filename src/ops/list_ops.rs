use chrono::Utc;

use crate::model::list::{CustomList, ListId, MAX_LIST_NAME_LEN};
use crate::model::store::{StoreError, TaskStore};
use crate::model::task::Task;

/// A custom list removed together with every task that belonged to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedList {
    pub list: CustomList,
    pub tasks: Vec<Task>,
}

impl TaskStore {
    /// Trim `name` and check emptiness, length and case-insensitive uniqueness.
    /// `exclude` skips one list in the duplicate check (the list being renamed).
    fn validate_list_name(&self, name: &str, exclude: Option<ListId>) -> Result<String, StoreError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(StoreError::EmptyListName);
        }
        let len = trimmed.chars().count();
        if len > MAX_LIST_NAME_LEN {
            return Err(StoreError::Length {
                what: "list name",
                len,
                max: MAX_LIST_NAME_LEN,
            });
        }
        if self
            .lists
            .iter()
            .any(|l| Some(l.id) != exclude && l.name_matches(trimmed))
        {
            return Err(StoreError::DuplicateListName(trimmed.to_string()));
        }
        Ok(trimmed.to_string())
    }

    fn validate_theme(&self, theme: &str) -> Result<(), StoreError> {
        if self.themes.contains(theme) {
            Ok(())
        } else {
            Err(StoreError::UnknownTheme(theme.to_string()))
        }
    }

    /// Create a custom list, appended after the existing ones.
    pub fn create_list(&mut self, name: &str, theme: &str) -> Result<CustomList, StoreError> {
        let name = self.validate_list_name(name, None)?;
        self.validate_theme(theme)?;
        let id = self.allocate_list_id();
        let list = CustomList::new(id, name, theme.to_string(), Utc::now());
        self.lists.push(list.clone());
        Ok(list)
    }

    /// Rename a list. Changing only the letter case of its own name is allowed.
    pub fn rename_list(&mut self, id: ListId, new_name: &str) -> Result<CustomList, StoreError> {
        let index = self.list_index(id)?;
        let name = self.validate_list_name(new_name, Some(id))?;
        let list = &mut self.lists[index];
        list.name = name;
        Ok(list.clone())
    }

    /// Point a list at a different registry theme.
    pub fn set_list_theme(&mut self, id: ListId, theme: &str) -> Result<CustomList, StoreError> {
        let index = self.list_index(id)?;
        self.validate_theme(theme)?;
        let list = &mut self.lists[index];
        list.theme = theme.to_string();
        Ok(list.clone())
    }

    /// Delete a list and hard-delete every task attached to it.
    pub fn delete_list(&mut self, id: ListId) -> Result<RemovedList, StoreError> {
        let index = self.list_index(id)?;
        let list = self.lists.remove(index);
        let (removed, kept): (Vec<Task>, Vec<Task>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|t| t.list_id == Some(id));
        self.tasks = kept;
        Ok(RemovedList {
            list,
            tasks: removed,
        })
    }
}
