use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::gesture::GestureConfig;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub tasks: TaskConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `todos.json` and `customLists.json`.
    /// If absent, the platform data directory is used.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Keep the last deleted task around so it can be restored with `undo`.
    /// When false, deletes are final.
    #[serde(default = "default_true")]
    pub undo_delete: bool,
}

impl Default for TaskConfig {
    fn default() -> Self {
        TaskConfig { undo_delete: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.storage.data_dir.is_none());
        assert!(config.tasks.undo_delete);
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.gesture.swipe_threshold, 120.0);
        assert_eq!(config.gesture.long_press_ms, 500);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
[storage]
data_dir = "/tmp/myday"

[gesture]
swipe_threshold = 80.0
enable_long_press = false

[tasks]
undo_delete = false
"#,
        )
        .unwrap();
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/tmp/myday")));
        assert_eq!(config.gesture.swipe_threshold, 80.0);
        assert_eq!(config.gesture.jitter_tolerance, 10.0);
        assert!(!config.gesture.enable_long_press);
        assert!(config.gesture.enable_swipe);
        assert!(!config.tasks.undo_delete);
    }
}
