use anyhow::{bail, Context, Result};
use pidkeeper::{parse_duration, CancelToken, Error, ProcessSupervisor};

use super::Target;
use crate::output::{
    format_duration, format_name, format_pid, print_error, print_info, print_success,
};

pub fn execute(supervisor: &ProcessSupervisor, target: &Target, timeout: Option<&str>) -> Result<()> {
    let (pid_file, name) = target.resolve()?;

    let Some(pid) = supervisor.read_pid(&pid_file) else {
        bail!("'{}' is not tracked (no pid file at {})", name, pid_file.display());
    };

    let token = match timeout {
        Some(t) => {
            let limit =
                parse_duration(t).with_context(|| format!("Invalid timeout: {}", t))?;
            print_info(&format!(
                "Stopping {} (PID: {}), waiting up to {}...",
                format_name(&name),
                format_pid(&pid),
                format_duration(limit)
            ));
            CancelToken::with_timeout(limit)
        }
        None => {
            print_info(&format!(
                "Stopping {} (PID: {})...",
                format_name(&name),
                format_pid(&pid)
            ));
            CancelToken::new()
        }
    };

    match supervisor.kill_with(&pid_file, &name, &token) {
        Ok(true) => {
            print_success(&format!("{} stopped", format_name(&name)));
            Ok(())
        }
        Ok(false) => {
            print_error(&format!("Could not stop {}", format_name(&name)));
            bail!("Stop request for PID {} was refused", pid.trim());
        }
        Err(e @ Error::WaitTimedOut { .. }) => {
            print_error(&format!(
                "{} is still running; its pid file has been removed",
                format_name(&name)
            ));
            Err(e.into())
        }
        Err(e) => Err(e).context(format!("Failed to stop '{}'", name)),
    }
}
