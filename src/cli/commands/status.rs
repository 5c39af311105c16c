use anyhow::Result;
use chrono::{DateTime, Utc};
use pidkeeper::ProcessSupervisor;
use serde_json::json;
use std::path::Path;

use super::Target;
use crate::output::{format_name, format_pid, format_state, format_timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedState {
    Running,
    Stale,
    Untracked,
}

impl TrackedState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackedState::Running => "running",
            TrackedState::Stale => "stale",
            TrackedState::Untracked => "untracked",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            TrackedState::Running => 0,
            TrackedState::Stale => 1,
            TrackedState::Untracked => 2,
        }
    }

    pub fn probe(supervisor: &ProcessSupervisor, pid: Option<&str>) -> Self {
        match pid {
            None => TrackedState::Untracked,
            Some(pid) if supervisor.is_running(pid) => TrackedState::Running,
            Some(_) => TrackedState::Stale,
        }
    }
}

fn pid_file_written_at(pid_file: &Path) -> Option<DateTime<Utc>> {
    let modified = std::fs::metadata(pid_file).ok()?.modified().ok()?;
    Some(DateTime::<Utc>::from(modified))
}

pub fn execute(supervisor: &ProcessSupervisor, target: &Target, json_output: bool) -> Result<()> {
    let (pid_file, name) = target.resolve()?;
    let pid = supervisor.read_pid(&pid_file);
    let state = TrackedState::probe(supervisor, pid.as_deref());
    let since = pid_file_written_at(&pid_file);

    if json_output {
        let info = json!({
            "name": name,
            "state": state.as_str(),
            "pid": pid.as_deref().map(str::trim),
            "pid_file": pid_file,
            "since": since,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        match &pid {
            Some(pid) => println!("{} (PID: {})", format_name(&name), format_pid(pid)),
            None => println!("{}", format_name(&name)),
        }
        println!("Status: {}", format_state(&state));
        println!("Pid file: {}", pid_file.display());
        if let Some(since) = since {
            println!("Since: {}", format_timestamp(since.into()));
        }
    }

    std::process::exit(state.exit_code());
}
