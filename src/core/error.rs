//! Error types for the process supervision core.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the supervision core.
///
/// Probe and read failures never show up here: they are logged and turned into
/// `false` / `None` at the call site.
#[derive(Debug, Error)]
pub enum Error {
    /// The host OS is not one of Windows, Linux or macOS.
    #[error("Running on unsupported OS '{0}'! Only Windows, Linux and Mac OS X are currently supported")]
    UnsupportedPlatform(String),

    /// The PID file could not be created or written.
    #[error("Failed to write pid file {path}: {source}")]
    PidFileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An OS command needed to dispatch a request could not be run.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// A process descriptor needs at least the executable.
    #[error("Process command cannot be empty")]
    EmptyCommand,

    /// The base directory could not be derived from the given hint.
    #[error("Cannot derive a base directory from {0}")]
    InvalidBaseDir(PathBuf),

    /// The wait for process exit was cancelled through its token.
    #[error("Wait for process {pid} to stop was cancelled")]
    WaitCancelled { pid: String },

    /// The wait for process exit ran past its deadline.
    #[error("Process {pid} did not stop before the deadline")]
    WaitTimedOut { pid: String },

    /// A duration string could not be parsed.
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
}

impl Error {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_unsupported_platform_message() {
        let err = Error::UnsupportedPlatform("freebsd".to_string());
        assert!(err.to_string().contains("freebsd"));
        assert!(err.to_string().contains("unsupported OS"));
    }

    #[test]
    fn test_pid_file_write_keeps_source() {
        let err = Error::PidFileWrite {
            path: PathBuf::from("/nope/app.pid"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/nope/app.pid"));
        assert!(err.source().is_some());
    }
}
