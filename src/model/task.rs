use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::list::ListId;

/// Maximum task text length, in characters, after trimming
pub const MAX_TASK_TEXT_LEN: usize = 255;

/// Opaque, unique task identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the independent category flags a task can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flag {
    Important,
    MyDay,
    Planned,
    Assigned,
}

impl Flag {
    pub const ALL: [Flag; 4] = [Flag::Important, Flag::MyDay, Flag::Planned, Flag::Assigned];

    /// The kebab-case name used on the command line and in JSON
    pub fn name(self) -> &'static str {
        match self {
            Flag::Important => "important",
            Flag::MyDay => "my-day",
            Flag::Planned => "planned",
            Flag::Assigned => "assigned",
        }
    }
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Flag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Flag::ALL
            .into_iter()
            .find(|flag| flag.name() == s)
            .ok_or_else(|| format!("unknown flag '{}' (expected important, my-day, planned or assigned)", s))
    }
}

/// Category flags supplied when a task is created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryFlags {
    pub important: bool,
    pub my_day: bool,
    pub planned: bool,
    pub assigned: bool,
}

impl CategoryFlags {
    /// Flags with only My Day set (the default for tasks added from My Day)
    pub fn my_day() -> Self {
        CategoryFlags {
            my_day: true,
            ..Default::default()
        }
    }

    /// Build flags from a list of flag names
    pub fn from_flags(flags: &[Flag]) -> Self {
        let mut out = CategoryFlags::default();
        for flag in flags {
            match flag {
                Flag::Important => out.important = true,
                Flag::MyDay => out.my_day = true,
                Flag::Planned => out.planned = true,
                Flag::Assigned => out.assigned = true,
            }
        }
        out
    }
}

/// A single to-do record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    /// Trimmed text, 1..=255 characters
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub important: bool,
    #[serde(default)]
    pub my_day: bool,
    #[serde(default)]
    pub planned: bool,
    #[serde(default)]
    pub assigned: bool,
    /// Custom list this task belongs to, if any
    #[serde(default)]
    pub list_id: Option<ListId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Present exactly while `completed` is true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new, incomplete task stamped with `now`
    pub fn new(
        id: TaskId,
        text: String,
        flags: CategoryFlags,
        list_id: Option<ListId>,
        now: DateTime<Utc>,
    ) -> Self {
        Task {
            id,
            text,
            completed: false,
            important: flags.important,
            my_day: flags.my_day,
            planned: flags.planned,
            assigned: flags.assigned,
            list_id,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    pub fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::Important => self.important,
            Flag::MyDay => self.my_day,
            Flag::Planned => self.planned,
            Flag::Assigned => self.assigned,
        }
    }

    pub fn flag_mut(&mut self, flag: Flag) -> &mut bool {
        match flag {
            Flag::Important => &mut self.important,
            Flag::MyDay => &mut self.my_day,
            Flag::Planned => &mut self.planned,
            Flag::Assigned => &mut self.assigned,
        }
    }

    /// Set the completion state, keeping `completed_at` in step with it
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        self.completed = completed;
        self.completed_at = if completed { Some(now) } else { None };
        self.touch(now);
    }

    /// Stamp `updated_at`
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
