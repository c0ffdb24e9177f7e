use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile { path: PathBuf, source: io::Error },

    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    #[error("could not determine data directory (no HOME or XDG_DATA_HOME); pass --data-dir")]
    NoDataDir,
}

/// `~/.config/myday/config.toml` on Linux, the platform equivalent elsewhere
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("myday").join("config.toml"))
}

/// `~/.local/share/myday` on Linux, the platform equivalent elsewhere
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("myday"))
}

/// Load the config file.
///
/// If `explicit_path` is `Some`, the file must exist. Otherwise the default
/// path is tried and a missing file yields the compiled defaults.
pub fn load_config(explicit_path: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit_path {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(path) = default_config_path() else {
        return Ok(Config::default());
    };
    match fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}

/// Data directory: CLI flag, then `[storage] data_dir`, then the platform default.
pub fn resolve_data_dir(cli: Option<&Path>, config: &Config) -> Result<PathBuf, ConfigError> {
    cli.map(Path::to_path_buf)
        .or_else(|| config.storage.data_dir.clone())
        .or_else(default_data_dir)
        .ok_or(ConfigError::NoDataDir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_file_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[tasks]\nundo_delete = false\n[log]\nlevel = \"debug\"\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert!(!config.tasks.undo_delete);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[gesture\nswipe_threshold = ").unwrap();
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::ParseToml(_))
        ));
    }

    #[test]
    fn data_dir_priority() {
        let mut config = Config::default();
        config.storage.data_dir = Some(PathBuf::from("/from/config"));
        assert_eq!(
            resolve_data_dir(Some(Path::new("/from/cli")), &config).unwrap(),
            PathBuf::from("/from/cli")
        );
        assert_eq!(
            resolve_data_dir(None, &config).unwrap(),
            PathBuf::from("/from/config")
        );
    }
}
