//! Size-rotated log of non-fatal item failures
//!
//! Each record is one line, `YYYY-MM-DD HH:MM:SS - <message>`, in local time.
//! Before a write, a current file larger than `max_bytes` is moved to the
//! backup name (replacing any older backup), so at most one backup
//! generation exists.

use medoc_common::config::DEFAULT_ERROR_LOG_MAX_BYTES;
use medoc_common::time::log_timestamp;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

pub const ERROR_LOG_FILE: &str = "errors.txt";
pub const ERROR_LOG_BACKUP_FILE: &str = "errors_old.txt";

#[derive(Debug)]
pub struct ErrorLog {
    path: PathBuf,
    backup_path: PathBuf,
    max_bytes: u64,
    // Serializes check-rotate-append across workers
    lock: Mutex<()>,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>, backup_path: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            path: path.into(),
            backup_path: backup_path.into(),
            max_bytes,
            lock: Mutex::new(()),
        }
    }

    /// `errors.txt` / `errors_old.txt` inside `dir`, default size limit
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(
            dir.join(ERROR_LOG_FILE),
            dir.join(ERROR_LOG_BACKUP_FILE),
            DEFAULT_ERROR_LOG_MAX_BYTES,
        )
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Append one record, rotating first if the file is over the limit
    pub fn append(&self, message: &str) -> io::Result<()> {
        // A poisoned lock only means another writer panicked mid-append
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        self.rotate_if_needed()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{} - {}", log_timestamp(), single_line(message))?;
        debug!(path = %self.path.display(), "Appended error record");
        Ok(())
    }

    fn rotate_if_needed(&self) -> io::Result<()> {
        let size = match fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };

        if size <= self.max_bytes {
            return Ok(());
        }

        match fs::remove_file(&self.backup_path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        fs::rename(&self.path, &self.backup_path)?;

        info!(
            path = %self.path.display(),
            backup = %self.backup_path.display(),
            size,
            "Rotated error log"
        );
        Ok(())
    }
}

/// Records are line-oriented; embedded newlines would split one record
fn single_line(message: &str) -> String {
    message.replace(['\r', '\n'], " ")
}
