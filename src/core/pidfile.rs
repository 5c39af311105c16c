use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use super::diagnostics::Diagnostics;
use super::error::{Error, Result};

/// Get the PID file directory
pub fn pid_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PIDKEEPER_PIDDIR") {
        return PathBuf::from(dir);
    }

    if let Ok(xdg_runtime) = std::env::var("XDG_RUNTIME_DIR") {
        return PathBuf::from(xdg_runtime).join("pidkeeper");
    }

    std::env::temp_dir().join("pidkeeper")
}

/// Ensure PID file directory exists
pub fn ensure_pid_dir() -> Result<PathBuf> {
    let dir = pid_dir();
    fs::create_dir_all(&dir)
        .map_err(|e| Error::io(format!("Failed to create pid directory {:?}", dir), e))?;
    Ok(dir)
}

/// Get path to the PID file of a named process
pub fn pid_file_path(name: &str) -> Result<PathBuf> {
    Ok(ensure_pid_dir()?.join(format!("{}.pid", name)))
}

/// Durable single-value storage for the tracked PID.
///
/// The file holds the decimal PID and nothing else. A missing file means no
/// process is tracked.
#[derive(Debug, Clone, Default)]
pub struct PidStore {
    diagnostics: Diagnostics,
}

impl PidStore {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self { diagnostics }
    }

    /// Write `pid` as the whole content of `path`, replacing what was there.
    pub fn write(&self, pid: u32, path: &Path) -> Result<()> {
        self.diagnostics.scope(|| {
            info!("Creating pid file: {:?}", path);
            write_pid(pid, path).map_err(|source| Error::PidFileWrite {
                path: path.to_path_buf(),
                source,
            })
        })
    }

    /// Raw content of the PID file, or `None` if it is absent or unreadable.
    pub fn read(&self, path: &Path) -> Option<String> {
        self.diagnostics.scope(|| {
            if !path.exists() {
                return None;
            }

            match fs::read_to_string(path) {
                Ok(contents) => Some(contents),
                Err(e) => {
                    error!("Failed to read pid file {:?}: {}", path, e);
                    None
                }
            }
        })
    }

    /// Remove the PID file. Returns whether it is gone because of this call.
    pub fn delete(&self, path: &Path) -> bool {
        self.diagnostics.scope(|| match fs::remove_file(path) {
            Ok(()) => {
                debug!("Removed pid file {:?}", path);
                true
            }
            Err(e) => {
                warn!("Could not delete pid file {:?}: {}", path, e);
                false
            }
        })
    }

    pub fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

fn write_pid(pid: u32, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(pid.to_string().as_bytes())?;
    file.sync_all()?;
    Ok(())
}
