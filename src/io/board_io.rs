use std::fs;
use std::path::{Path, PathBuf};

use crate::io::lock::LockError;
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::io::store::{FileStorage, LoadOutcome, StoreError, TaskStore};
use crate::model::board::Board;
use crate::model::config::BoardConfig;

/// Name of the board directory
pub const LANES_DIR: &str = ".lanes";
pub const CONFIG_FILE: &str = "board.toml";

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("not a lanes board: no .lanes/ directory found (run `lanes init`)")]
    NotABoard,
    #[error("a board already exists at {0}")]
    AlreadyExists(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse board.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Find the board by walking up from `start`, looking for `.lanes/board.toml`.
pub fn discover_board(start: &Path) -> Result<PathBuf, BoardError> {
    let mut current = start.to_path_buf();
    loop {
        let lanes_dir = current.join(LANES_DIR);
        if lanes_dir.is_dir() && lanes_dir.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(BoardError::NotABoard);
        }
    }
}

/// Read board.toml for the board rooted at `root`.
pub fn load_board(root: &Path) -> Result<Board, BoardError> {
    let lanes_dir = root.join(LANES_DIR);
    if !lanes_dir.is_dir() {
        return Err(BoardError::NotABoard);
    }

    let config_path = lanes_dir.join(CONFIG_FILE);
    let config_text = fs::read_to_string(&config_path).map_err(|e| BoardError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: BoardConfig = toml::from_str(&config_text)?;

    Ok(Board {
        root: root.to_path_buf(),
        lanes_dir,
        config,
    })
}

/// Discover and load the board from `start` (or an explicit board root).
pub fn open_board(start: &Path) -> Result<Board, BoardError> {
    let root = discover_board(start)?;
    load_board(&root)
}

/// A store over the board's task file. Nothing is read until the store is
/// loaded.
pub fn open_store(board: &Board) -> TaskStore<FileStorage> {
    TaskStore::new(FileStorage::new(&board.lanes_dir), board.namespace())
}

/// Open and load the store. A corrupt task file is replaced by the seed
/// collection; the discarded bytes go to the recovery log.
pub fn load_store(board: &Board) -> Result<TaskStore<FileStorage>, BoardError> {
    finish_load(board, open_store(board))
}

/// Like [`load_store`], but the board stays locked until the store is
/// dropped. Used by commands that read, decide, then write.
pub fn load_locked_store(board: &Board) -> Result<TaskStore<FileStorage>, BoardError> {
    let storage = FileStorage::locked(&board.lanes_dir)?;
    finish_load(board, TaskStore::new(storage, board.namespace()))
}

fn finish_load(
    board: &Board,
    mut store: TaskStore<FileStorage>,
) -> Result<TaskStore<FileStorage>, BoardError> {
    let outcome = store.load()?;
    log_load_outcome(&board.lanes_dir, board.namespace(), &outcome);
    Ok(store)
}

/// Keep the bytes of a discarded task file in the recovery log.
pub fn log_load_outcome(lanes_dir: &Path, namespace: &str, outcome: &LoadOutcome) {
    if let LoadOutcome::Recovered { raw, reason } = outcome {
        recovery::log_recovery(
            lanes_dir,
            RecoveryEntry::new(RecoveryCategory::Parser, "stored tasks discarded")
                .field("Namespace", namespace)
                .field("Reason", reason.as_str())
                .body(raw.as_str()),
        );
    }
}

/// Create `.lanes/` under `root` with the given board.toml text. An existing
/// board is only overwritten with `force`, and its task file is kept.
pub fn create_board(root: &Path, config_text: &str, force: bool) -> Result<Board, BoardError> {
    let lanes_dir = root.join(LANES_DIR);
    let config_path = lanes_dir.join(CONFIG_FILE);
    if config_path.exists() && !force {
        return Err(BoardError::AlreadyExists(lanes_dir));
    }
    // Reject unparsable templates before anything touches disk
    toml::from_str::<BoardConfig>(config_text)?;

    fs::create_dir_all(&lanes_dir)?;
    recovery::atomic_write(&config_path, config_text.as_bytes())?;
    load_board(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::Storage;
    use crate::model::seed::seed_tasks;
    use tempfile::TempDir;

    const CONFIG: &str = "[board]\nname = \"test\"\n";

    #[test]
    fn discover_walks_up() {
        let tmp = TempDir::new().unwrap();
        create_board(tmp.path(), CONFIG, false).unwrap();
        let nested = tmp.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(discover_board(&nested).unwrap(), tmp.path());
    }

    #[test]
    fn discover_fails_outside_a_board() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            discover_board(tmp.path()),
            Err(BoardError::NotABoard)
        ));
    }

    #[test]
    fn create_refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        create_board(tmp.path(), CONFIG, false).unwrap();
        assert!(matches!(
            create_board(tmp.path(), CONFIG, false),
            Err(BoardError::AlreadyExists(_))
        ));
        let board = create_board(tmp.path(), "[board]\nname = \"renamed\"\n", true).unwrap();
        assert_eq!(board.config.board.name, "renamed");
    }

    #[test]
    fn create_rejects_bad_config() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            create_board(tmp.path(), "[board", false),
            Err(BoardError::ConfigParseError(_))
        ));
        assert!(!tmp.path().join(LANES_DIR).exists());
    }

    #[test]
    fn fresh_board_loads_seed() {
        let tmp = TempDir::new().unwrap();
        let board = create_board(tmp.path(), CONFIG, false).unwrap();
        let store = load_store(&board).unwrap();
        assert_eq!(store.tasks(), seed_tasks().as_slice());
        assert!(board.lanes_dir.join("lanes-tasks.json").exists());
    }

    #[test]
    fn corrupt_task_file_is_logged_and_replaced() {
        let tmp = TempDir::new().unwrap();
        let board = create_board(tmp.path(), CONFIG, false).unwrap();
        fs::write(board.lanes_dir.join("lanes-tasks.json"), "[{broken").unwrap();

        let store = load_store(&board).unwrap();
        assert_eq!(store.tasks(), seed_tasks().as_slice());

        let entries = recovery::read_recovery_entries(&board.lanes_dir, None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, RecoveryCategory::Parser);
        assert_eq!(entries[0].body, "[{broken");

        // The seed was written back over the corrupt file
        let raw = store.storage().get("lanes-tasks").unwrap().unwrap();
        assert!(String::from_utf8(raw).unwrap().contains("seed-1"));
    }

    #[test]
    fn locked_store_keeps_other_writers_out() {
        let tmp = TempDir::new().unwrap();
        let board = create_board(tmp.path(), CONFIG, false).unwrap();
        let store = load_locked_store(&board).unwrap();
        assert!(matches!(
            crate::io::lock::BoardLock::acquire(&board.lanes_dir, std::time::Duration::from_millis(20)),
            Err(LockError::Timeout { .. })
        ));
        drop(store);
        assert!(load_store(&board).is_ok());
    }

    #[test]
    fn custom_namespace_names_the_task_file() {
        let tmp = TempDir::new().unwrap();
        let board = create_board(
            tmp.path(),
            "[board]\nname = \"w\"\n\n[storage]\nnamespace = \"work\"\n",
            false,
        )
        .unwrap();
        load_store(&board).unwrap();
        assert!(board.lanes_dir.join("work.json").exists());
    }
}
