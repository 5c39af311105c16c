use anyhow::{bail, Context, Result};
use pidkeeper::{ensure_executable, ProcessSupervisor};
use std::fs::OpenOptions;
use std::path::Path;
use std::process::Stdio;

use super::{base_hint, Target};
use crate::output::{format_name, format_pid, print_success, print_warning};

/// Launch `command` detached and record its PID
pub fn execute(
    supervisor: &ProcessSupervisor,
    target: &Target,
    base_dir: Option<&Path>,
    log_file: Option<&Path>,
    command: &[String],
) -> Result<()> {
    if command.is_empty() {
        bail!("Command cannot be empty");
    }

    let (pid_file, name) = target.resolve()?;

    // Refuse to launch a second copy; clear a stale record
    if let Some(pid) = supervisor.read_pid(&pid_file) {
        if supervisor.is_running(&pid) {
            bail!(
                "'{}' is already running (PID: {})",
                name,
                pid.trim()
            );
        }
        print_warning(&format!(
            "Removing stale pid file for {} (PID {} is gone)",
            format_name(&name),
            format_pid(&pid)
        ));
        supervisor.delete_pid(&pid_file);
    }

    let program = Path::new(&command[0]);
    if program.is_file() && !ensure_executable(program) {
        print_warning(&format!("{} may not be executable", program.display()));
    }

    let hint = base_hint(base_dir, &command[0])?;
    let descriptor = supervisor
        .prepare(&hint, command.iter().cloned())
        .context("Failed to prepare command")?;

    let mut cmd = descriptor.to_command();
    cmd.stdin(Stdio::null());

    match log_file {
        Some(path) => {
            let log = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            cmd.stdout(log.try_clone()?);
            cmd.stderr(log);
        }
        None => {
            cmd.stdout(Stdio::null());
            cmd.stderr(Stdio::null());
        }
    }

    // Own process group so the child outlives this invocation's terminal signals
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let mut child = cmd
        .spawn()
        .with_context(|| format!("Failed to start '{}'", descriptor.command_line()))?;
    let pid = child.id();

    if let Err(e) = supervisor.write_pid(pid, &pid_file) {
        let _ = child.kill();
        let _ = child.wait();
        return Err(e).context("Failed to record pid, process stopped again");
    }

    print_success(&format!(
        "Started {} (PID: {}, pid file: {})",
        format_name(&name),
        format_pid(&pid.to_string()),
        pid_file.display()
    ));

    Ok(())
}
