use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::io::lock::{BoardLock, LockError};
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::seed::seed_tasks;
use crate::model::task::{Status, Task, TaskDraft};
use crate::ops::reconcile::{self, DropTarget};

// ---------------------------------------------------------------------------
// Storage backends
// ---------------------------------------------------------------------------

/// Key-value backend the task collection is persisted through. One key holds
/// the whole collection as a JSON array.
pub trait Storage {
    /// Held across a read-modify-write of the collection
    type Guard;

    fn lock(&self) -> io::Result<Self::Guard>;
    /// The raw stored bytes. Decoding is the reader's concern, so unreadable
    /// data can be recovered rather than failing the read.
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// Stores each key as `<dir>/<key>.json`. Writes go through the board lock,
/// taken per read-modify-write or, with [`FileStorage::locked`], held for the
/// storage's lifetime.
pub struct FileStorage {
    dir: PathBuf,
    held: Option<BoardLock>,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage {
            dir: dir.into(),
            held: None,
        }
    }

    /// Storage that keeps the board locked until it is dropped
    pub fn locked(dir: impl Into<PathBuf>) -> Result<Self, LockError> {
        let dir = dir.into();
        let held = BoardLock::acquire_default(&dir)?;
        Ok(FileStorage {
            dir,
            held: Some(held),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    /// `None` when the lock is already held by this storage
    type Guard = Option<BoardLock>;

    fn lock(&self) -> io::Result<Option<BoardLock>> {
        if self.held.is_some() {
            return Ok(None);
        }
        Ok(Some(BoardLock::acquire_default(&self.dir)?))
    }

    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        let result = recovery::atomic_write(&self.path_for(key), value.as_bytes());
        if let Err(e) = &result {
            recovery::log_recovery(
                &self.dir,
                RecoveryEntry::new(RecoveryCategory::Write, "task collection not saved")
                    .field("Namespace", key)
                    .field("Error", e.to_string())
                    .body(value),
            );
        }
        result
    }
}

/// In-process storage, for tests and throwaway boards
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut storage = Self::default();
        storage.entries.insert(key.to_string(), value.to_string());
        storage
    }
}

impl Storage for MemoryStorage {
    type Guard = ();

    fn lock(&self) -> io::Result<()> {
        Ok(())
    }

    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).map(|v| v.clone().into_bytes()))
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Task store
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read stored tasks '{key}': {source}")]
    Read { key: String, source: io::Error },
    #[error("could not lock stored tasks '{key}': {source}")]
    Lock { key: String, source: io::Error },
    #[error("could not save tasks '{key}': {source}")]
    Write { key: String, source: io::Error },
    #[error("could not serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// What [`TaskStore::load`] found in storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A valid collection was read
    Restored,
    /// Nothing was stored; the seed collection was used
    Seeded,
    /// The stored value was unusable and was replaced by the seed collection
    Recovered { raw: String, reason: String },
}

/// Owner of the task collection. Every mutation rewrites the whole
/// collection to storage before returning.
pub struct TaskStore<S: Storage> {
    storage: S,
    namespace: String,
    tasks: Vec<Task>,
    ready: bool,
    last_id_millis: i64,
    clock: fn() -> DateTime<Utc>,
}

impl<S: Storage> TaskStore<S> {
    pub fn new(storage: S, namespace: impl Into<String>) -> Self {
        Self::with_clock(storage, namespace, Utc::now)
    }

    pub fn with_clock(
        storage: S,
        namespace: impl Into<String>,
        clock: fn() -> DateTime<Utc>,
    ) -> Self {
        TaskStore {
            storage,
            namespace: namespace.into(),
            tasks: Vec::new(),
            ready: false,
            last_id_millis: 0,
            clock,
        }
    }

    /// False until the first load has finished, so an empty board can be
    /// told apart from one that has not been read yet.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Read the collection from storage, replacing whatever is in memory.
    /// Missing or unusable data yields the seed collection, which is written
    /// back so later reads see the same board.
    pub fn load(&mut self) -> Result<LoadOutcome, StoreError> {
        let _guard = self.lock()?;
        self.load_locked()
    }

    fn load_locked(&mut self) -> Result<LoadOutcome, StoreError> {
        let outcome = match self.read_stored()? {
            None => {
                self.tasks = seed_tasks();
                LoadOutcome::Seeded
            }
            Some(raw) => match parse_collection(&raw) {
                Ok(tasks) => {
                    self.tasks = tasks;
                    LoadOutcome::Restored
                }
                Err(reason) => {
                    self.tasks = seed_tasks();
                    LoadOutcome::Recovered {
                        raw: String::from_utf8_lossy(&raw).into_owned(),
                        reason,
                    }
                }
            },
        };

        self.ready = true;
        if outcome != LoadOutcome::Restored {
            self.persist()?;
        }
        Ok(outcome)
    }

    /// Pick up a collection written by another process. Returns true when
    /// the stored collection differed from the one in memory. Missing or
    /// unusable data leaves memory as it is.
    pub fn refresh(&mut self) -> Result<bool, StoreError> {
        if !self.ready {
            return Ok(false);
        }
        let Some(raw) = self.read_stored()? else {
            return Ok(false);
        };
        match parse_collection(&raw) {
            Ok(tasks) if tasks != self.tasks => {
                self.tasks = tasks;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn read_stored(&self) -> Result<Option<Vec<u8>>, StoreError> {
        self.storage
            .get(&self.namespace)
            .map_err(|source| StoreError::Read {
                key: self.namespace.clone(),
                source,
            })
    }

    fn lock(&self) -> Result<S::Guard, StoreError> {
        self.storage.lock().map_err(|source| StoreError::Lock {
            key: self.namespace.clone(),
            source,
        })
    }

    /// Lock storage and catch up with it, so the mutation that follows
    /// applies on top of the latest stored collection.
    fn begin_write(&mut self) -> Result<S::Guard, StoreError> {
        let guard = self.lock()?;
        if self.ready {
            self.refresh()?;
        } else {
            self.load_locked()?;
        }
        Ok(guard)
    }

    /// The collection in board order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn lane(&self, status: Status) -> Vec<&Task> {
        reconcile::lane(&self.tasks, status)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Append a new task and return its id. The draft is taken as-is; title
    /// checks belong to the caller.
    pub fn add(&mut self, draft: TaskDraft) -> Result<String, StoreError> {
        let _guard = self.begin_write()?;
        let now = (self.clock)();
        let id = self.next_id(now);
        self.tasks.push(draft.into_task(id.clone(), now));
        self.persist()?;
        Ok(id)
    }

    /// `task-<millis>`, bumped past the last id handed out and past any id
    /// already in the collection.
    fn next_id(&mut self, now: DateTime<Utc>) -> String {
        let taken: HashSet<&str> = self.tasks.iter().map(|t| t.id.as_str()).collect();
        let mut millis = now.timestamp_millis().max(self.last_id_millis + 1);
        let mut id = format!("task-{}", millis);
        while taken.contains(id.as_str()) {
            millis += 1;
            id = format!("task-{}", millis);
        }
        self.last_id_millis = millis;
        id
    }

    /// Replace the task with the same id. Returns false if there is none.
    pub fn update(&mut self, task: Task) -> Result<bool, StoreError> {
        let _guard = self.begin_write()?;
        let Some(idx) = self.position(&task.id) else {
            return Ok(false);
        };
        self.tasks[idx] = task;
        self.persist()?;
        Ok(true)
    }

    pub fn delete(&mut self, id: &str) -> Result<Option<Task>, StoreError> {
        let _guard = self.begin_write()?;
        let Some(idx) = self.position(id) else {
            return Ok(None);
        };
        let removed = self.tasks.remove(idx);
        self.persist()?;
        Ok(Some(removed))
    }

    /// Checkbox semantics: completed when checked, pending otherwise.
    pub fn set_status(&mut self, id: &str, completed: bool) -> Result<bool, StoreError> {
        let status = if completed {
            Status::Completed
        } else {
            Status::Pending
        };
        self.move_to_status(id, status)
    }

    /// Set a task's status without moving it in the collection
    pub fn move_to_status(&mut self, id: &str, status: Status) -> Result<bool, StoreError> {
        let _guard = self.begin_write()?;
        let Some(idx) = self.position(id) else {
            return Ok(false);
        };
        self.tasks[idx].status = status;
        self.persist()?;
        Ok(true)
    }

    /// Move the task at `start` to `end` in the flat collection.
    pub fn reorder(&mut self, start: usize, end: usize) -> Result<bool, StoreError> {
        let _guard = self.begin_write()?;
        let len = self.tasks.len();
        if start >= len || end >= len || start == end {
            return Ok(false);
        }
        let task = self.tasks.remove(start);
        self.tasks.insert(end, task);
        self.persist()?;
        Ok(true)
    }

    pub fn replace_all(&mut self, tasks: Vec<Task>) -> Result<(), StoreError> {
        let _guard = self.begin_write()?;
        self.tasks = tasks;
        self.persist()
    }

    /// Drop `dragged_id` on `target`. Returns false, and writes nothing,
    /// when the drop changes nothing.
    pub fn move_task(&mut self, dragged_id: &str, target: &DropTarget) -> Result<bool, StoreError> {
        let _guard = self.begin_write()?;
        match reconcile::reconcile(&self.tasks, dragged_id, target) {
            Some(tasks) => {
                self.tasks = tasks;
                self.persist()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.tasks)?;
        self.storage
            .set(&self.namespace, &json)
            .map_err(|source| StoreError::Write {
                key: self.namespace.clone(),
                source,
            })
    }
}

/// Parse a stored collection. Anything that is not an array of well-formed
/// tasks with distinct ids is rejected with a reason.
fn parse_collection(raw: &[u8]) -> Result<Vec<Task>, String> {
    let text = std::str::from_utf8(raw).map_err(|e| format!("not UTF-8: {}", e))?;
    let tasks: Vec<Task> = serde_json::from_str(text).map_err(|e| e.to_string())?;
    let mut seen = HashSet::new();
    for task in &tasks {
        if !seen.insert(task.id.as_str()) {
            return Err(format!("duplicate task id {}", task.id));
        }
    }
    Ok(tasks)
}
