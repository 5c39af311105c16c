//! Stop the process tracked by a PID file and wait until it is really gone.
//!
//! The wait has no built-in limit: [`Terminator::kill`] keeps polling until the
//! liveness probe says the process is gone, so it never reports a process as
//! stopped while it is still alive. Callers that need bounded latency run it on
//! a thread of their own and use [`Terminator::kill_with`] with a
//! [`CancelToken`] carrying a deadline or cancelled from elsewhere.
//!
//! A process that exited but was not yet reaped by its parent still answers
//! the liveness probe. If the caller is that parent it has to reap the child
//! while the wait runs.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::control::ProcessControl;
use super::diagnostics::Diagnostics;
use super::error::{Error, Result};
use super::pidfile::PidStore;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Escape hatch for the wait-for-exit loop.
///
/// Clones share the cancellation flag, so a token handed to the waiting thread
/// can be cancelled from any other thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// A token that only fires when [`CancelToken::cancel`] is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that also fires once `timeout` has elapsed from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Reads the tracked PID, asks the OS to stop it, removes the PID file and
/// waits for the process to disappear.
#[derive(Debug, Clone)]
pub struct Terminator {
    control: Arc<dyn ProcessControl>,
    store: PidStore,
    poll_interval: Duration,
    diagnostics: Diagnostics,
}

impl Terminator {
    pub fn new(control: Arc<dyn ProcessControl>, diagnostics: Diagnostics) -> Self {
        Self {
            control,
            store: PidStore::new(diagnostics.clone()),
            poll_interval: DEFAULT_POLL_INTERVAL,
            diagnostics,
        }
    }

    /// Delay between two liveness probes while waiting for exit.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Stop the process tracked in `pid_file` and wait, without limit, until
    /// it is gone.
    ///
    /// Returns `Ok(false)` if the stop request was refused; the PID file is
    /// then left in place.
    pub fn kill(&self, pid_file: &Path, name: &str) -> Result<bool> {
        self.kill_with(pid_file, name, &CancelToken::new())
    }

    /// Like [`Terminator::kill`], but the wait ends with
    /// [`Error::WaitCancelled`] or [`Error::WaitTimedOut`] when `cancel` fires.
    ///
    /// The PID file has already been removed by then.
    pub fn kill_with(&self, pid_file: &Path, name: &str, cancel: &CancelToken) -> Result<bool> {
        self.diagnostics.scope(|| {
            let pid = self.store.read(pid_file).unwrap_or_default();
            let pid = pid.trim();
            info!("Stopping {} process with pid {}", name, pid);

            if !self.control.terminate(pid)? {
                warn!("Failed to kill process with pid {}", pid);
                return Ok(false);
            }

            // Logged by the store; the wait still decides the outcome
            self.store.delete(pid_file);

            self.wait_for_exit(pid, cancel)
        })
    }

    fn wait_for_exit(&self, pid: &str, cancel: &CancelToken) -> Result<bool> {
        loop {
            if !self.control.is_running(pid) {
                debug!("Process with pid {} has stopped", pid);
                return Ok(true);
            }

            if cancel.is_cancelled() {
                return Err(Error::WaitCancelled {
                    pid: pid.to_string(),
                });
            }
            if cancel.deadline_passed() {
                return Err(Error::WaitTimedOut {
                    pid: pid.to_string(),
                });
            }

            debug!("Process with pid {} hasn't stopped yet, waiting", pid);
            thread::sleep(self.poll_interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    /// In-memory control: a pid stays "running" for a fixed number of probes
    /// after terminate.
    #[derive(Debug, Default)]
    struct FakeControl {
        alive: Mutex<HashSet<String>>,
        refuse: bool,
        probes_until_exit: usize,
        probes: AtomicUsize,
        terminated: Mutex<Vec<String>>,
    }

    impl FakeControl {
        fn with_alive(pid: &str, probes_until_exit: usize) -> Self {
            let fake = Self {
                probes_until_exit,
                ..Self::default()
            };
            fake.alive.lock().unwrap().insert(pid.to_string());
            fake
        }
    }

    impl ProcessControl for FakeControl {
        fn is_running(&self, pid: &str) -> bool {
            let mut alive = self.alive.lock().unwrap();
            if !alive.contains(pid) {
                return false;
            }
            if self.terminated.lock().unwrap().iter().any(|p| p == pid) {
                let seen = self.probes.fetch_add(1, Ordering::SeqCst) + 1;
                if seen >= self.probes_until_exit {
                    alive.remove(pid);
                    return false;
                }
            }
            true
        }

        fn terminate(&self, pid: &str) -> Result<bool> {
            if self.refuse {
                return Ok(false);
            }
            self.terminated.lock().unwrap().push(pid.to_string());
            Ok(true)
        }
    }

    fn terminator(control: Arc<FakeControl>) -> Terminator {
        Terminator::new(control, Diagnostics::silent()).with_poll_interval(Duration::from_millis(1))
    }

    fn pid_file(dir: &tempfile::TempDir, pid: u32) -> std::path::PathBuf {
        let path = dir.path().join("app.pid");
        PidStore::new(Diagnostics::silent()).write(pid, &path).unwrap();
        path
    }

    #[test]
    fn test_kill_waits_until_gone() {
        let dir = tempfile::tempdir().unwrap();
        let path = pid_file(&dir, 4242);
        let control = Arc::new(FakeControl::with_alive("4242", 5));

        assert!(terminator(control.clone()).kill(&path, "app").unwrap());
        assert!(!control.is_running("4242"));
        assert!(control.probes.load(Ordering::SeqCst) >= 5);
        assert!(!path.exists());
        assert_eq!(*control.terminated.lock().unwrap(), vec!["4242".to_string()]);
    }

    #[test]
    fn test_refused_dispatch_keeps_pid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = pid_file(&dir, 4242);
        let control = Arc::new(FakeControl {
            refuse: true,
            ..FakeControl::with_alive("4242", 1)
        });

        assert!(!terminator(control).kill(&path, "app").unwrap());
        assert!(path.exists());
    }

    #[test]
    fn test_missing_pid_file_stops_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.pid");
        let control = Arc::new(FakeControl::default());

        assert!(terminator(control.clone()).kill(&path, "app").unwrap());
        assert_eq!(*control.terminated.lock().unwrap(), vec![String::new()]);
    }

    #[test]
    fn test_deadline_ends_wait() {
        let dir = tempfile::tempdir().unwrap();
        let path = pid_file(&dir, 4242);
        let control = Arc::new(FakeControl::with_alive("4242", usize::MAX));

        let token = CancelToken::with_timeout(Duration::from_millis(20));
        match terminator(control).kill_with(&path, "app", &token) {
            Err(Error::WaitTimedOut { pid }) => assert_eq!(pid, "4242"),
            other => panic!("expected WaitTimedOut, got {:?}", other),
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_cancel_from_other_thread() {
        let dir = tempfile::tempdir().unwrap();
        let path = pid_file(&dir, 4242);
        let control = Arc::new(FakeControl::with_alive("4242", usize::MAX));

        let token = CancelToken::new();
        let remote = token.clone();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            remote.cancel();
        });

        let result = terminator(control).kill_with(&path, "app", &token);
        canceller.join().unwrap();
        assert!(matches!(result, Err(Error::WaitCancelled { .. })));
    }

    #[test]
    fn test_cancel_token() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        assert!(!token.deadline_passed());
        token.clone().cancel();
        assert!(token.is_cancelled());

        assert!(CancelToken::with_timeout(Duration::ZERO).deadline_passed());
        assert!(!CancelToken::with_timeout(Duration::from_secs(3600)).deadline_passed());
    }
}
