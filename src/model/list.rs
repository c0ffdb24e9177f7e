use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum custom list name length, in characters, after trimming
pub const MAX_LIST_NAME_LEN: usize = 50;

/// Opaque, unique custom list identifier (separate namespace from tasks)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(pub u64);

impl std::fmt::Display for ListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user-created named grouping of tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomList {
    pub id: ListId,
    pub name: String,
    /// Key into the theme registry (e.g. `theme-blue`)
    #[serde(default = "default_theme")]
    pub theme: String,
    pub created_at: DateTime<Utc>,
}

fn default_theme() -> String {
    super::theme::DEFAULT_THEME.to_string()
}

impl CustomList {
    pub fn new(id: ListId, name: String, theme: String, now: DateTime<Utc>) -> Self {
        CustomList {
            id,
            name,
            theme,
            created_at: now,
        }
    }

    /// Case-insensitive name comparison used for uniqueness checks
    pub fn name_matches(&self, other: &str) -> bool {
        self.name.to_lowercase() == other.to_lowercase()
    }
}
