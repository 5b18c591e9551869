//! Single-instance process guard for the agent.
//!
//! Pulsewatch takes an exclusive advisory lock on a pidfile at startup so a
//! second invocation refuses to run alongside a live one. The OS releases
//! the lock automatically when the holding process's file descriptor table
//! is torn down (normal exit or crash), so there is no stale-lock recovery
//! logic to get wrong.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    pub pid: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum LockError {
    #[error("pulsewatch is already running (pid {pid})")]
    AlreadyRunning { pid: u32 },

    #[error("lock file I/O error")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize lock info")]
    Serialize(#[from] serde_json::Error),
}

/// An exclusive hold on the agent's pidfile, released on drop.
pub struct AgentLock {
    file: File,
    path: PathBuf,
}

impl AgentLock {
    /// Acquire the lock at `path`, creating parent directories as needed.
    /// Fails with [`LockError::AlreadyRunning`] if another live process
    /// already holds it.
    pub fn acquire(path: &Path) -> Result<Self, LockError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).read(true).write(true).open(path)?;

        if !file.try_lock()? {
            let pid = read_pid(&mut file).unwrap_or(0);
            return Err(LockError::AlreadyRunning { pid });
        }

        let info = LockInfo { pid: std::process::id(), created_at: Utc::now() };
        let json = serde_json::to_vec_pretty(&info)?;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&json)?;
        file.flush()?;
        file.sync_all()?;

        Ok(Self { file, path: path.to_path_buf() })
    }

    /// Release the lock and remove the pidfile. Dropping an [`AgentLock`]
    /// without calling this releases the OS lock but leaves the file (with
    /// stale PID/timestamp content) behind for diagnostics.
    pub fn release(self) -> Result<(), LockError> {
        self.file.unlock()?;
        let _ = std::fs::remove_file(&self.path);
        Ok(())
    }
}

fn read_pid(file: &mut File) -> Option<u32> {
    file.seek(SeekFrom::Start(0)).ok()?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).ok()?;
    serde_json::from_str::<LockInfo>(&contents).ok().map(|info| info.pid)
}
