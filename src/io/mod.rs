pub mod config_io;
pub mod session;
pub mod storage;

pub use config_io::{ConfigError, default_config_path, default_data_dir, load_config, resolve_data_dir};
pub use session::{Saved, Session};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
