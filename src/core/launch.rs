//! Launch preparation: turn a command line into a ready-to-start descriptor.
//!
//! Nothing here starts a process. The caller decides how to spawn the
//! descriptor and owns the child's stdio.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

use super::environment::{compose_environment, Environment};
use super::error::{Error, Result};
use super::platform::PlatformKind;

/// A command plus the exact environment it should run with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessDescriptor {
    command: Vec<String>,
    environment: Environment,
}

impl ProcessDescriptor {
    pub fn command(&self) -> &[String] {
        &self.command
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Space-joined command line, for display only.
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }

    /// Build a `Command` whose environment is exactly the composed one.
    ///
    /// Program lookup uses the composed `PATH`, so a bare program name finds
    /// binaries next to the base directory first.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.command[0]);
        cmd.args(&self.command[1..]);
        cmd.env_clear();
        cmd.envs(&self.environment);
        cmd
    }
}

/// Prepare a descriptor for `command`.
///
/// `base_hint` is either the directory holding the executable or the full path
/// of the executable itself, in which case its parent directory is used.
pub fn prepare_process<I, S>(
    platform: PlatformKind,
    base_hint: &Path,
    command: I,
    snapshot: &Environment,
) -> Result<ProcessDescriptor>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let command: Vec<String> = command.into_iter().map(Into::into).collect();
    if command.is_empty() {
        return Err(Error::EmptyCommand);
    }

    let base_dir = base_dir_from_hint(base_hint)?;
    let environment = compose_environment(platform, &base_dir, snapshot);
    let descriptor = ProcessDescriptor {
        command,
        environment,
    };

    debug!("{}", descriptor.command_line());

    Ok(descriptor)
}

fn base_dir_from_hint(hint: &Path) -> Result<PathBuf> {
    if hint.is_dir() {
        return Ok(hint.to_path_buf());
    }

    match hint.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
        _ => Err(Error::InvalidBaseDir(hint.to_path_buf())),
    }
}

/// Make sure `path`, if it exists, can be executed.
///
/// Returns false when the file is missing or its mode could not be changed.
pub fn ensure_executable(path: &Path) -> bool {
    let exists = path.is_file();
    info!("testing {:?} exists: {}", path, exists);
    if !exists {
        return false;
    }

    make_executable(path)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = match std::fs::metadata(path) {
        Ok(meta) => meta.permissions(),
        Err(e) => {
            warn!("Could not stat {:?}: {}", path, e);
            return false;
        }
    };

    if perms.mode() & 0o111 != 0 {
        return true;
    }

    perms.set_mode(perms.mode() | 0o100);
    match std::fs::set_permissions(path, perms) {
        Ok(()) => true,
        Err(e) => {
            warn!("Could not mark {:?} executable: {}", path, e);
            false
        }
    }
}

// No execute bit to flip; existence is all Windows needs.
#[cfg(not(unix))]
fn make_executable(_path: &Path) -> bool {
    true
}
