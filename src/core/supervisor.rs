//! One-stop facade over the supervision components.
//!
//! The platform is classified and the matching [`ProcessControl`] chosen once,
//! in the constructor. Everything after that goes through the same capability.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use super::control::{self, ProcessControl};
use super::diagnostics::Diagnostics;
use super::environment::{current_environment, Environment};
use super::error::Result;
use super::launch::{prepare_process, ProcessDescriptor};
use super::pidfile::PidStore;
use super::platform::PlatformKind;
use super::terminate::{CancelToken, Terminator};

#[derive(Debug, Clone)]
pub struct ProcessSupervisor {
    platform: PlatformKind,
    control: Arc<dyn ProcessControl>,
    store: PidStore,
    terminator: Terminator,
    diagnostics: Diagnostics,
}

impl ProcessSupervisor {
    /// Supervisor for the host platform, logging to the current subscriber.
    pub fn new() -> Result<Self> {
        Self::with_diagnostics(Diagnostics::inherit())
    }

    pub fn with_diagnostics(diagnostics: Diagnostics) -> Result<Self> {
        let platform = diagnostics.scope(PlatformKind::current)?;
        Self::for_platform(platform, diagnostics)
    }

    pub fn for_platform(platform: PlatformKind, diagnostics: Diagnostics) -> Result<Self> {
        let control = control::for_platform(platform)?;
        Ok(Self::with_control(platform, control, diagnostics))
    }

    /// Supervisor driving an explicit control implementation.
    pub fn with_control(
        platform: PlatformKind,
        control: Arc<dyn ProcessControl>,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            platform,
            terminator: Terminator::new(control.clone(), diagnostics.clone()),
            store: PidStore::new(diagnostics.clone()),
            control,
            diagnostics,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.terminator = self.terminator.with_poll_interval(poll_interval);
        self
    }

    pub fn platform(&self) -> PlatformKind {
        self.platform
    }

    /// Prepare `command` to run with the calling process's environment plus
    /// the base-directory entries.
    pub fn prepare<I, S>(&self, base_hint: &Path, command: I) -> Result<ProcessDescriptor>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prepare_with_env(base_hint, command, &current_environment())
    }

    pub fn prepare_with_env<I, S>(
        &self,
        base_hint: &Path,
        command: I,
        snapshot: &Environment,
    ) -> Result<ProcessDescriptor>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.diagnostics
            .scope(|| prepare_process(self.platform, base_hint, command, snapshot))
    }

    pub fn write_pid(&self, pid: u32, pid_file: &Path) -> Result<()> {
        self.store.write(pid, pid_file)
    }

    pub fn read_pid(&self, pid_file: &Path) -> Option<String> {
        self.store.read(pid_file)
    }

    pub fn delete_pid(&self, pid_file: &Path) -> bool {
        self.store.delete(pid_file)
    }

    pub fn is_running(&self, pid: &str) -> bool {
        self.diagnostics.scope(|| self.control.is_running(pid))
    }

    /// Whether the PID file exists and names a live process.
    pub fn is_tracked_running(&self, pid_file: &Path) -> bool {
        self.read_pid(pid_file)
            .is_some_and(|pid| self.is_running(&pid))
    }

    /// See [`Terminator::kill`]; waits without limit.
    pub fn kill(&self, pid_file: &Path, name: &str) -> Result<bool> {
        self.terminator.kill(pid_file, name)
    }

    pub fn kill_with(&self, pid_file: &Path, name: &str, cancel: &CancelToken) -> Result<bool> {
        self.terminator.kill_with(pid_file, name, cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_supervisor() {
        let supervisor = ProcessSupervisor::with_diagnostics(Diagnostics::silent()).unwrap();
        assert_eq!(supervisor.platform(), PlatformKind::current().unwrap());
        assert!(supervisor.is_running(&std::process::id().to_string()));
        assert!(!supervisor.is_running(""));
    }

    #[test]
    fn test_prepare_with_env_uses_platform() {
        let supervisor = ProcessSupervisor::for_platform(PlatformKind::Windows, Diagnostics::silent())
            .unwrap();
        let mut snapshot = Environment::new();
        snapshot.insert("LD_LIBRARY_PATH".to_string(), "/usr/lib".to_string());

        let descriptor = supervisor
            .prepare_with_env(Path::new("/opt/app/bin/app.exe"), ["app.exe"], &snapshot)
            .unwrap();
        assert_eq!(descriptor.environment()["LD_LIBRARY_PATH"], "/usr/lib");
        assert_eq!(descriptor.environment()["PATH"], "/opt/app/bin");
    }

    #[test]
    fn test_tracked_running() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("self.pid");
        let supervisor = ProcessSupervisor::with_diagnostics(Diagnostics::silent()).unwrap();

        assert!(!supervisor.is_tracked_running(&path));
        supervisor.write_pid(std::process::id(), &path).unwrap();
        assert!(supervisor.is_tracked_running(&path));
        assert!(supervisor.delete_pid(&path));
        assert!(!supervisor.is_tracked_running(&path));
    }
}
