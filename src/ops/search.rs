use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::model::store::TaskStore;
use crate::model::task::{Task, TaskId};

/// A search hit on a task's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub task_id: TaskId,
    /// Byte ranges of each match within the task text (empty for an empty query)
    pub spans: Vec<Range<usize>>,
}

/// Compiled free-text query: case-insensitive literal substring.
/// A blank query matches everything.
#[derive(Debug, Clone)]
pub struct TextQuery {
    re: Option<Regex>,
}

impl TextQuery {
    pub fn new(query: &str) -> Self {
        let query = query.trim();
        if query.is_empty() {
            return TextQuery { re: None };
        }
        let re = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
            .ok();
        TextQuery { re }
    }

    pub fn is_match(&self, text: &str) -> bool {
        match &self.re {
            Some(re) => re.is_match(text),
            None => true,
        }
    }

    /// Match byte-ranges in `text`, or `None` if the query does not match.
    pub fn find(&self, text: &str) -> Option<Vec<Range<usize>>> {
        match &self.re {
            Some(re) => {
                let spans = find_matches(re, text);
                if spans.is_empty() { None } else { Some(spans) }
            }
            None => Some(Vec::new()),
        }
    }
}

/// Collect all non-overlapping match byte-ranges for a regex in the given text.
fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

/// Search task text across the whole collection, in backing order.
pub fn search_tasks(store: &TaskStore, query: &str) -> Vec<SearchHit> {
    let query = TextQuery::new(query);
    store
        .tasks()
        .iter()
        .filter_map(|task| search_task(&query, task))
        .collect()
}

fn search_task(query: &TextQuery, task: &Task) -> Option<SearchHit> {
    query.find(&task.text).map(|spans| SearchHit {
        task_id: task.id,
        spans,
    })
}
