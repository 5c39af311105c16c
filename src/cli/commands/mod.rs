pub mod env;
pub mod platform;
pub mod start;
pub mod status;
pub mod stop;

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

/// Which PID file a command works on.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct Target {
    /// Process name; its PID file is <pid dir>/<name>.pid
    #[arg(long)]
    pub name: Option<String>,
    /// Explicit PID file path
    #[arg(long)]
    pub pid_file: Option<PathBuf>,
}

impl Target {
    /// PID file path and the name to show in messages
    pub fn resolve(&self) -> Result<(PathBuf, String)> {
        if let Some(path) = &self.pid_file {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            return Ok((path.clone(), name));
        }

        let name = self.name.clone().unwrap_or_default();
        let path = pidkeeper::pid_file_path(&name)
            .with_context(|| format!("Failed to locate pid file for '{}'", name))?;
        Ok((path, name))
    }
}

/// Base-directory hint for a command: an explicit directory, else the program
/// path itself, else the working directory for a bare program name.
pub fn base_hint(base_dir: Option<&Path>, program: &str) -> Result<PathBuf> {
    if let Some(dir) = base_dir {
        return Ok(dir.to_path_buf());
    }

    let program = Path::new(program);
    match program.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(program.to_path_buf()),
        _ => std::env::current_dir().context("Failed to determine current directory"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_explicit_pid_file() {
        let target = Target {
            name: None,
            pid_file: Some(PathBuf::from("/run/geth.pid")),
        };
        let (path, name) = target.resolve().unwrap();
        assert_eq!(path, PathBuf::from("/run/geth.pid"));
        assert_eq!(name, "geth");
    }

    #[test]
    fn test_base_hint() {
        let dir = PathBuf::from("/opt/app");
        assert_eq!(base_hint(Some(&dir), "app").unwrap(), dir);
        assert_eq!(
            base_hint(None, "/opt/app/bin/app").unwrap(),
            PathBuf::from("/opt/app/bin/app")
        );
        assert_eq!(
            base_hint(None, "app").unwrap(),
            std::env::current_dir().unwrap()
        );
    }
}
