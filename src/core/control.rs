//! Platform process control: liveness probing and termination requests.
//!
//! [`ProcessControl`] is the one seam where the supported platforms differ.
//! The variant is picked once through [`for_platform`]; callers never branch
//! on the OS themselves.

use std::fmt;
use std::process::{Command, Stdio};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::error::{Error, Result};
use super::platform::PlatformKind;

/// Point-in-time process queries and stop requests, keyed by PID text.
pub trait ProcessControl: Send + Sync + fmt::Debug {
    /// Whether `pid` currently identifies a running process.
    ///
    /// Blank or malformed PIDs are never running. Probe failures read as
    /// "not running".
    fn is_running(&self, pid: &str) -> bool;

    /// Ask the OS to stop `pid`.
    ///
    /// `Ok(true)` means the request was issued or there was nothing to stop,
    /// not that the process is gone. `Ok(false)` means the request was refused
    /// while the target may still be alive.
    fn terminate(&self, pid: &str) -> Result<bool>;
}

/// Pick the control variant for `platform`.
pub fn for_platform(platform: PlatformKind) -> Result<Arc<dyn ProcessControl>> {
    match platform {
        PlatformKind::Windows => Ok(Arc::new(WindowsProcessControl)),
        #[cfg(unix)]
        PlatformKind::Linux | PlatformKind::MacOsx => Ok(Arc::new(PosixProcessControl)),
        #[cfg(not(unix))]
        other => Err(Error::UnsupportedPlatform(other.to_string())),
    }
}

/// Parse PID text into a positive process id.
///
/// Zero and negative ids address process groups on POSIX and are rejected.
pub(crate) fn parse_pid(pid: &str) -> Option<i32> {
    pid.trim().parse::<i32>().ok().filter(|p| *p > 0)
}

fn is_blank(pid: &str) -> bool {
    pid.trim().is_empty()
}

/// Signal-based control for Linux and macOS.
#[cfg(unix)]
#[derive(Debug, Default, Clone, Copy)]
pub struct PosixProcessControl;

#[cfg(unix)]
impl ProcessControl for PosixProcessControl {
    fn is_running(&self, pid: &str) -> bool {
        use nix::sys::signal::kill;
        use nix::unistd::Pid;

        let Some(raw) = parse_pid(pid) else {
            return false;
        };

        // Signal 0: existence and permission check only
        match kill(Pid::from_raw(raw), None) {
            Ok(()) => true,
            Err(e) => {
                debug!("Zero-signal probe of pid {} failed: {}", raw, e);
                false
            }
        }
    }

    fn terminate(&self, pid: &str) -> Result<bool> {
        use nix::errno::Errno;
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        if is_blank(pid) {
            debug!("No pid to signal");
            return Ok(true);
        }

        let Some(raw) = parse_pid(pid) else {
            warn!("Refusing to signal malformed pid {:?}", pid);
            return Ok(false);
        };

        match kill(Pid::from_raw(raw), Signal::SIGTERM) {
            Ok(()) => {
                debug!("Sent SIGTERM to pid {}", raw);
                Ok(true)
            }
            Err(Errno::ESRCH) => {
                debug!("Process {} already exited", raw);
                Ok(true)
            }
            Err(e) => {
                warn!("Failed to send SIGTERM to pid {}: {}", raw, e);
                Ok(false)
            }
        }
    }
}

/// `tasklist`/`taskkill` based control for Windows.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsProcessControl;

impl ProcessControl for WindowsProcessControl {
    fn is_running(&self, pid: &str) -> bool {
        let Some(raw) = parse_pid(pid) else {
            return false;
        };

        let output = Command::new("tasklist")
            .args(["/FI", &format!("PID eq {}", raw)])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();

        match output {
            Ok(output) => {
                tasklist_lists_pid(&String::from_utf8_lossy(&output.stdout), &raw.to_string())
            }
            Err(e) => {
                error!("Failed to run tasklist for pid {}: {}", raw, e);
                false
            }
        }
    }

    fn terminate(&self, pid: &str) -> Result<bool> {
        if is_blank(pid) {
            debug!("No pid to terminate");
            return Ok(true);
        }

        let Some(raw) = parse_pid(pid) else {
            warn!("Refusing to terminate malformed pid {:?}", pid);
            return Ok(false);
        };

        let status = Command::new("taskkill")
            .args(["/F", "/PID", &raw.to_string()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| Error::io(format!("Failed to run taskkill for pid {}", raw), e))?;

        if status.success() {
            return Ok(true);
        }

        // taskkill also fails for a pid that is already gone
        if self.is_running(pid) {
            warn!("taskkill failed for pid {} ({})", raw, status);
            Ok(false)
        } else {
            Ok(true)
        }
    }
}

/// Whether `tasklist` output has a row for `pid`.
///
/// The PID must appear as a space-delimited token, so `12` never matches a row
/// for `123` or `512`. PID text is matched by value: `"0123"` finds the row
/// for `123`.
pub fn tasklist_lists_pid(output: &str, pid: &str) -> bool {
    let Some(pid) = parse_pid(pid) else {
        return false;
    };

    let needle = format!(" {} ", pid);
    output.lines().any(|line| line.contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASKLIST_HIT: &str = "\r
Image Name                     PID Session Name        Session#    Mem Usage\r
========================= ======== ================ =========== ============\r
geth.exe                       123 Console                    1     52,140 K\r
";

    const TASKLIST_MISS: &str =
        "INFO: No tasks are running which match the specified criteria.\r\n";

    #[test]
    fn test_parse_pid() {
        assert_eq!(parse_pid("123"), Some(123));
        assert_eq!(parse_pid(" 123\n"), Some(123));
        assert_eq!(parse_pid(""), None);
        assert_eq!(parse_pid("0"), None);
        assert_eq!(parse_pid("-1"), None);
        assert_eq!(parse_pid("12a"), None);
        assert_eq!(parse_pid("99999999999"), None);
    }

    #[test]
    fn test_tasklist_match() {
        assert!(tasklist_lists_pid(TASKLIST_HIT, "123"));
        assert!(tasklist_lists_pid(TASKLIST_HIT, "123\n"));
        assert!(!tasklist_lists_pid(TASKLIST_MISS, "123"));
    }

    #[test]
    fn test_tasklist_no_substring_collision() {
        assert!(!tasklist_lists_pid(TASKLIST_HIT, "12"));
        assert!(!tasklist_lists_pid(TASKLIST_HIT, "23"));
        assert!(!tasklist_lists_pid(TASKLIST_HIT, "1234"));
        assert!(!tasklist_lists_pid(TASKLIST_HIT, ""));
    }

    #[test]
    fn test_tasklist_match_non_canonical_pid() {
        assert!(tasklist_lists_pid(TASKLIST_HIT, "0123"));
        assert!(tasklist_lists_pid(TASKLIST_HIT, "+123"));
        assert!(tasklist_lists_pid(TASKLIST_HIT, " 00123 "));
        assert!(!tasklist_lists_pid(TASKLIST_HIT, "abc"));
        assert!(!tasklist_lists_pid(TASKLIST_HIT, "0"));
    }

    #[test]
    fn test_blank_pid_is_never_running() {
        assert!(!WindowsProcessControl.is_running(""));
        assert!(!WindowsProcessControl.is_running("   "));
        #[cfg(unix)]
        {
            assert!(!PosixProcessControl.is_running(""));
            assert!(!PosixProcessControl.is_running("  \n"));
        }
    }

    #[test]
    fn test_windows_terminate_blank_and_malformed() {
        // Neither case reaches taskkill
        assert!(WindowsProcessControl.terminate("").unwrap());
        assert!(!WindowsProcessControl.terminate("not-a-pid").unwrap());
    }

    #[test]
    fn test_for_platform_current() {
        let platform = PlatformKind::current().unwrap();
        let control = for_platform(platform).unwrap();
        assert!(control.is_running(&std::process::id().to_string()));
    }

    #[cfg(unix)]
    mod posix {
        use super::*;

        #[test]
        fn test_own_pid_is_running() {
            assert!(PosixProcessControl.is_running(&std::process::id().to_string()));
        }

        #[test]
        fn test_unused_pid_is_not_running() {
            assert!(!PosixProcessControl.is_running("2147483646"));
        }

        #[test]
        fn test_group_ids_are_never_probed() {
            assert!(!PosixProcessControl.is_running("0"));
            assert!(!PosixProcessControl.is_running("-1"));
        }

        #[test]
        fn test_terminate_gone_process_reports_success() {
            assert!(PosixProcessControl.terminate("2147483646").unwrap());
        }

        #[test]
        fn test_terminate_blank_is_noop() {
            assert!(PosixProcessControl.terminate("").unwrap());
        }

        #[test]
        fn test_terminate_malformed_pid_fails() {
            assert!(!PosixProcessControl.terminate("abc").unwrap());
            assert!(!PosixProcessControl.terminate("-1").unwrap());
        }

        #[test]
        fn test_terminate_running_child() {
            let mut child = std::process::Command::new("sleep")
                .arg("30")
                .spawn()
                .expect("Failed to spawn sleep");
            let pid = child.id().to_string();

            assert!(PosixProcessControl.is_running(&pid));
            assert!(PosixProcessControl.terminate(&pid).unwrap());

            let status = child.wait().expect("Failed to wait for sleep");
            assert!(!status.success());
            assert!(!PosixProcessControl.is_running(&pid));
        }
    }
}
