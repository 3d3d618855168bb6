use std::path::PathBuf;

use super::config::BoardConfig;

/// A located board: where it lives and how it is configured. The tasks
/// themselves are owned by the store opened from it.
#[derive(Debug, Clone)]
pub struct Board {
    /// Directory containing `.lanes/`
    pub root: PathBuf,
    /// Path to the `.lanes/` directory
    pub lanes_dir: PathBuf,
    /// Parsed board.toml
    pub config: BoardConfig,
}

impl Board {
    /// Storage key of the task collection
    pub fn namespace(&self) -> &str {
        &self.config.storage.namespace
    }
}
