use std::ops::Range;

use serde::Serialize;

use crate::gesture::TerminalAction;
use crate::model::list::CustomList;
use crate::model::store::TaskStore;
use crate::model::task::{Flag, Task};
use crate::model::theme::{Theme, ThemeStyle};
use crate::ops::search::SearchHit;
use crate::util::unicode::{display_width, pad_to_width, truncate_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: u64,
    pub text: String,
    pub completed: bool,
    pub flags: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

#[derive(Serialize)]
pub struct SectionJson {
    pub section: String,
    pub title: String,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct GroupsJson {
    pub my_day: Vec<TaskJson>,
    pub important: Vec<TaskJson>,
    pub completed: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct ListJson {
    pub id: u64,
    pub name: String,
    pub theme: String,
    pub count: usize,
}

#[derive(Serialize)]
pub struct RemovedListJson {
    pub list: ListJson,
    pub removed_tasks: usize,
}

#[derive(Serialize)]
pub struct SearchHitJson {
    pub id: u64,
    pub text: String,
    pub spans: Vec<[usize; 2]>,
}

#[derive(Serialize)]
pub struct ThemeJson {
    pub key: &'static str,
    #[serde(flatten)]
    pub theme: Theme,
}

#[derive(Serialize)]
pub struct GestureJson {
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<usize>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_flags(task: &Task) -> Vec<&'static str> {
    Flag::ALL
        .into_iter()
        .filter(|f| task.flag(*f))
        .map(Flag::name)
        .collect()
}

pub fn task_to_json(task: &Task, store: &TaskStore) -> TaskJson {
    TaskJson {
        id: task.id.0,
        text: task.text.clone(),
        completed: task.completed,
        flags: task_flags(task),
        list: task
            .list_id
            .and_then(|id| store.list(id))
            .map(|l| l.name.clone()),
        created_at: task.created_at.to_rfc3339(),
        updated_at: task.updated_at.to_rfc3339(),
        completed_at: task.completed_at.map(|t| t.to_rfc3339()),
    }
}

pub fn tasks_to_json(tasks: &[&Task], store: &TaskStore) -> Vec<TaskJson> {
    tasks.iter().map(|t| task_to_json(t, store)).collect()
}

pub fn list_to_json(list: &CustomList, store: &TaskStore) -> ListJson {
    ListJson {
        id: list.id.0,
        name: list.name.clone(),
        theme: list.theme.clone(),
        count: store.count(crate::ops::view::Section::List(list.id)),
    }
}

pub fn action_to_json(action: Option<TerminalAction>) -> GestureJson {
    let (action, from, to) = match action {
        Some(TerminalAction::Delete) => ("delete", None, None),
        Some(TerminalAction::Reorder { from, to }) => ("reorder", Some(from), Some(to)),
        Some(TerminalAction::OpenDetail) => ("open-detail", None, None),
        Some(TerminalAction::Cancel) => ("cancel", None, None),
        None => ("none", None, None),
    };
    GestureJson { action, from, to }
}

pub fn hit_to_json(hit: &SearchHit, task: &Task) -> SearchHitJson {
    SearchHitJson {
        id: hit.task_id.0,
        text: task.text.clone(),
        spans: hit.spans.iter().map(|r| [r.start, r.end]).collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Terminal width from `COLUMNS`, or 100 cells
pub fn term_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse().ok())
        .filter(|&w: &usize| w > 0)
        .unwrap_or(100)
}

fn flag_marker(flag: Flag) -> char {
    match flag {
        Flag::Important => '★',
        Flag::MyDay => '☀',
        Flag::Planned => '▦',
        Flag::Assigned => '◉',
    }
}

/// One-line summary: `[x] 12 Buy milk ★☀ @Groceries`, truncated to `width`.
pub fn format_task_line(task: &Task, store: &TaskStore, width: usize) -> String {
    let check = if task.completed { 'x' } else { ' ' };
    let prefix = format!("[{}] {} ", check, task.id);
    let markers: String = Flag::ALL
        .into_iter()
        .filter(|f| task.flag(*f))
        .map(flag_marker)
        .collect();
    let mut suffix = String::new();
    if !markers.is_empty() {
        suffix.push(' ');
        suffix.push_str(&markers);
    }
    if let Some(list) = task.list_id.and_then(|id| store.list(id)) {
        suffix.push_str(&format!(" @{}", list.name));
    }
    let budget = width.saturating_sub(display_width(&prefix) + display_width(&suffix));
    format!("{}{}{}", prefix, truncate_to_width(&task.text, budget.max(1)), suffix)
}

/// Numbered listing for a view; positions match what `mv` accepts.
pub fn format_view(title: &str, tasks: &[&Task], store: &TaskStore, width: usize) -> Vec<String> {
    let mut lines = vec![format!("== {} ({}) ==", title, tasks.len())];
    let num_width = tasks.len().to_string().len();
    for (i, task) in tasks.iter().enumerate() {
        let pos = format!("{:>w$}. ", i + 1, w = num_width);
        let line = format_task_line(task, store, width.saturating_sub(pos.len()));
        lines.push(format!("{}{}", pos, line));
    }
    lines
}

/// Detailed task view
pub fn format_task_detail(task: &Task, store: &TaskStore) -> Vec<String> {
    let check = if task.completed { 'x' } else { ' ' };
    let mut lines = vec![format!("[{}] {} {}", check, task.id, task.text)];
    let flags = task_flags(task);
    if !flags.is_empty() {
        lines.push(format!("flags: {}", flags.join(", ")));
    }
    if let Some(list) = task.list_id.and_then(|id| store.list(id)) {
        lines.push(format!("list: {}", list.name));
    }
    lines.push(format!("created: {}", task.created_at.format("%Y-%m-%d %H:%M")));
    lines.push(format!("updated: {}", task.updated_at.format("%Y-%m-%d %H:%M")));
    if let Some(done) = task.completed_at {
        lines.push(format!("completed: {}", done.format("%Y-%m-%d %H:%M")));
    }
    lines
}

/// Wrap each matched span in `*`
pub fn highlight_spans(text: &str, spans: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(text.len() + spans.len() * 2);
    let mut last = 0;
    for span in spans {
        if span.start < last || span.end > text.len() {
            continue;
        }
        out.push_str(&text[last..span.start]);
        out.push('*');
        out.push_str(&text[span.clone()]);
        out.push('*');
        last = span.end;
    }
    out.push_str(&text[last..]);
    out
}

pub fn format_list_line(list: &CustomList, store: &TaskStore) -> String {
    let count = store.count(crate::ops::view::Section::List(list.id));
    format!("  {} ({}) [{}]  {} open", list.name, list.id, list.theme, count)
}

/// `  <title>  <count>` with titles padded by display width
pub fn format_count_line(title: &str, count: usize) -> String {
    format!("  {} {}", pad_to_width(title, 20), count)
}

pub fn format_theme_line(key: &str, theme: &Theme) -> String {
    match &theme.style {
        ThemeStyle::Solid { primary, secondary } => {
            format!("  {:<20} {:<14} {} {}", key, theme.name, primary, secondary)
        }
        ThemeStyle::Image => format!("  {:<20} {:<14} (image)", key, theme.name),
    }
}

pub fn format_action(action: Option<TerminalAction>) -> String {
    match action {
        Some(TerminalAction::Delete) => "delete".to_string(),
        Some(TerminalAction::Reorder { from, to }) => format!("reorder {} -> {}", from, to),
        Some(TerminalAction::OpenDetail) => "open-detail".to_string(),
        Some(TerminalAction::Cancel) => "cancel".to_string(),
        None => "none".to_string(),
    }
}
