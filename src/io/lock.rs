use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Advisory lock held across a read-modify-write of the task collection, so
/// a running TUI and a CLI invocation never interleave their changes. The
/// lock file is never unlinked, so every process locks the same inode.
pub struct BoardLock {
    _file: File,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not lock {path}: another lanes process is writing")]
    Timeout { path: PathBuf },
}

impl From<LockError> for std::io::Error {
    fn from(err: LockError) -> Self {
        match err {
            LockError::Create { source, .. } => source,
            LockError::Timeout { .. } => {
                std::io::Error::new(std::io::ErrorKind::WouldBlock, err.to_string())
            }
        }
    }
}

impl BoardLock {
    /// Lock `lanes_dir`, polling until `timeout` runs out.
    pub fn acquire(lanes_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let lock_path = lanes_dir.join(".lock");
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| LockError::Create {
                path: lock_path.clone(),
                source: e,
            })?;

        let start = Instant::now();
        loop {
            match try_lock(&file) {
                Ok(()) => return Ok(BoardLock { _file: file }),
                Err(_) if start.elapsed() < timeout => {
                    std::thread::sleep(Duration::from_millis(10));
                }
                Err(_) => return Err(LockError::Timeout { path: lock_path }),
            }
        }
    }

    pub fn acquire_default(lanes_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(lanes_dir, Duration::from_secs(5))
    }
}

#[cfg(unix)]
fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let fd = file.as_raw_fd();
    let result = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    Ok(())
}
