use serde::Serialize;

use crate::model::list::ListId;
use crate::model::store::{StoreError, TaskStore};
use crate::model::task::Task;
use crate::ops::search::TextQuery;

/// A named, derived view over the task collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    MyDay,
    Important,
    Planned,
    Assigned,
    /// Every task, completed or not
    All,
    /// Incomplete tasks attached to one custom list
    List(ListId),
}

impl Section {
    pub const BUILT_IN: [Section; 5] = [
        Section::MyDay,
        Section::Important,
        Section::Planned,
        Section::Assigned,
        Section::All,
    ];

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Section::MyDay => task.my_day && !task.completed,
            Section::Important => task.important && !task.completed,
            Section::Planned => task.planned && !task.completed,
            Section::Assigned => task.assigned && !task.completed,
            Section::All => true,
            Section::List(id) => task.list_id == Some(id) && !task.completed,
        }
    }

    /// Stable key (`my-day`, `tasks`, `custom-<id>`, ...)
    pub fn key(self) -> String {
        match self {
            Section::MyDay => "my-day".into(),
            Section::Important => "important".into(),
            Section::Planned => "planned".into(),
            Section::Assigned => "assigned".into(),
            Section::All => "tasks".into(),
            Section::List(id) => format!("custom-{}", id),
        }
    }

    /// Human-readable title for built-in sections
    pub fn title(self) -> &'static str {
        match self {
            Section::MyDay => "My Day",
            Section::Important => "Important",
            Section::Planned => "Planned",
            Section::Assigned => "Assigned to me",
            Section::All => "Tasks",
            Section::List(_) => "List",
        }
    }
}

impl std::str::FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "my-day" => Ok(Section::MyDay),
            "important" => Ok(Section::Important),
            "planned" => Ok(Section::Planned),
            "assigned" => Ok(Section::Assigned),
            "tasks" | "all" => Ok(Section::All),
            other => other
                .strip_prefix("custom-")
                .and_then(|n| n.parse::<u64>().ok())
                .map(|n| Section::List(ListId(n)))
                .ok_or_else(|| format!("unknown section: {}", other)),
        }
    }
}

/// What a view projects: a section, or a free-text query over task text
#[derive(Debug, Clone)]
pub enum Filter {
    Section(Section),
    Search(String),
}

impl Filter {
    fn predicate(&self) -> Box<dyn Fn(&Task) -> bool + '_> {
        match self {
            Filter::Section(section) => {
                let section = *section;
                Box::new(move |t| section.matches(t))
            }
            Filter::Search(query) => {
                let query = TextQuery::new(query);
                Box::new(move |t| query.is_match(&t.text))
            }
        }
    }
}

impl From<Section> for Filter {
    fn from(section: Section) -> Self {
        Filter::Section(section)
    }
}

/// Count of one section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionCount {
    pub key: String,
    pub count: usize,
}

/// The "Tasks" page: three groups over the whole collection
#[derive(Debug, Clone, Default)]
pub struct AllTasksGroups<'a> {
    /// My Day tasks, including completed ones
    pub my_day: Vec<&'a Task>,
    /// Important tasks, including completed ones
    pub important: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
}

impl TaskStore {
    /// Project the collection through a filter, preserving backing order.
    pub fn view(&self, filter: &Filter) -> Vec<&Task> {
        let predicate = filter.predicate();
        self.tasks.iter().filter(|t| predicate(t)).collect()
    }

    pub fn count(&self, section: Section) -> usize {
        self.tasks.iter().filter(|t| section.matches(t)).count()
    }

    /// Counts for every built-in section followed by every custom list.
    pub fn counts(&self) -> Vec<SectionCount> {
        Section::BUILT_IN
            .into_iter()
            .chain(self.lists.iter().map(|l| Section::List(l.id)))
            .map(|section| SectionCount {
                key: section.key(),
                count: self.count(section),
            })
            .collect()
    }

    pub fn all_tasks_groups(&self) -> AllTasksGroups<'_> {
        let mut groups = AllTasksGroups::default();
        for task in &self.tasks {
            if task.my_day {
                groups.my_day.push(task);
            }
            if task.important {
                groups.important.push(task);
            }
            if task.completed {
                groups.completed.push(task);
            }
        }
        groups
    }

    /// Reorder using positions within a filtered view (what a drag gesture
    /// over that view reports). The dragged task takes the backing slot of
    /// the task it was dropped on.
    pub fn reorder_in_view(
        &mut self,
        filter: &Filter,
        from: usize,
        to: usize,
    ) -> Result<&[Task], StoreError> {
        let backing: Vec<usize> = {
            let predicate = filter.predicate();
            self.tasks
                .iter()
                .enumerate()
                .filter(|(_, t)| predicate(t))
                .map(|(i, _)| i)
                .collect()
        };
        match (backing.get(from), backing.get(to)) {
            (Some(&from_idx), Some(&to_idx)) => self.reorder_task(from_idx, to_idx),
            _ => Err(StoreError::OutOfRange {
                from,
                to,
                len: backing.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{CategoryFlags, Flag, TaskId};
    use pretty_assertions::assert_eq;

    fn texts(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.text.clone()).collect()
    }

    #[test]
    fn my_day_excludes_completed() {
        let mut store = TaskStore::new();
        let a = store.create_task("a", CategoryFlags::my_day(), None).unwrap();
        store.create_task("b", CategoryFlags::default(), None).unwrap();
        store.create_task("c", CategoryFlags::my_day(), None).unwrap();
        store.toggle_completed(a.id).unwrap();

        let view = store.view(&Section::MyDay.into());
        assert_eq!(texts(&view), vec!["c"]);
        assert_eq!(store.count(Section::All), 3);
    }

    #[test]
    fn a_task_can_appear_in_several_sections() {
        let mut store = TaskStore::new();
        let flags = CategoryFlags::from_flags(&Flag::ALL);
        store.create_task("everything", flags, None).unwrap();
        for section in Section::BUILT_IN {
            assert_eq!(store.count(section), 1, "{}", section.key());
        }
    }

    #[test]
    fn custom_list_view() {
        let mut store = TaskStore::new();
        let list = store.create_list("Home", "theme-blue").unwrap();
        let t = store
            .create_task("sweep", CategoryFlags::default(), Some(list.id))
            .unwrap();
        store
            .create_task("mop", CategoryFlags::default(), Some(list.id))
            .unwrap();
        store.create_task("loose", CategoryFlags::default(), None).unwrap();
        store.toggle_completed(t.id).unwrap();

        let view = store.view(&Section::List(list.id).into());
        assert_eq!(texts(&view), vec!["mop"]);
    }

    #[test]
    fn search_filter_view() {
        let mut store = TaskStore::new();
        store.create_task("Buy milk", CategoryFlags::default(), None).unwrap();
        store.create_task("buy bread", CategoryFlags::default(), None).unwrap();
        store.create_task("Read", CategoryFlags::default(), None).unwrap();
        let view = store.view(&Filter::Search("BUY".into()));
        assert_eq!(texts(&view), vec!["buy bread", "Buy milk"]);
    }

    #[test]
    fn counts_cover_built_ins_and_lists() {
        let mut store = TaskStore::new();
        let list = store.create_list("Home", "theme-blue").unwrap();
        store
            .create_task("a", CategoryFlags::my_day(), Some(list.id))
            .unwrap();
        let counts = store.counts();
        let keys: Vec<&str> = counts.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["my-day", "important", "planned", "assigned", "tasks", "custom-1"]
        );
        assert_eq!(counts[0].count, 1);
        assert_eq!(counts[5].count, 1);
    }

    #[test]
    fn all_tasks_groups_include_completed() {
        let mut store = TaskStore::new();
        let a = store.create_task("a", CategoryFlags::my_day(), None).unwrap();
        store
            .create_task("b", CategoryFlags::from_flags(&[Flag::Important]), None)
            .unwrap();
        store.toggle_completed(a.id).unwrap();
        let groups = store.all_tasks_groups();
        assert_eq!(texts(&groups.my_day), vec!["a"]);
        assert_eq!(texts(&groups.important), vec!["b"]);
        assert_eq!(texts(&groups.completed), vec!["a"]);
    }

    #[test]
    fn reorder_in_view_maps_to_backing_indices() {
        let mut store = TaskStore::new();
        // backing order after creation: e d c b a
        for (text, my_day) in [("a", true), ("b", false), ("c", true), ("d", false), ("e", true)] {
            let flags = if my_day { CategoryFlags::my_day() } else { CategoryFlags::default() };
            store.create_task(text, flags, None).unwrap();
        }
        // My Day view: e c a. Drag e (pos 0) onto a (pos 2).
        store
            .reorder_in_view(&Section::MyDay.into(), 0, 2)
            .unwrap();
        let all: Vec<&str> = store.tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(all, vec!["d", "c", "b", "a", "e"]);
        assert_eq!(texts(&store.view(&Section::MyDay.into())), vec!["c", "a", "e"]);
    }

    #[test]
    fn reorder_in_view_out_of_range() {
        let mut store = TaskStore::new();
        store.create_task("a", CategoryFlags::my_day(), None).unwrap();
        store.create_task("b", CategoryFlags::default(), None).unwrap();
        let err = store
            .reorder_in_view(&Section::MyDay.into(), 0, 1)
            .unwrap_err();
        assert_eq!(err, StoreError::OutOfRange { from: 0, to: 1, len: 1 });
        assert_eq!(store.tasks()[0].id, TaskId(2));
    }

    #[test]
    fn section_parse_round_trip() {
        for section in Section::BUILT_IN {
            assert_eq!(section.key().parse::<Section>(), Ok(section));
        }
        assert_eq!("custom-12".parse::<Section>(), Ok(Section::List(ListId(12))));
        assert!("custom-x".parse::<Section>().is_err());
        assert_eq!("all".parse::<Section>(), Ok(Section::All));
    }
}
