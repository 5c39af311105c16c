use anyhow::Result;
use colored::*;
use pidkeeper::{library_path_var, ProcessSupervisor};
use std::path::Path;

use super::base_hint;

/// Print the descriptor `start` would launch, without launching it
pub fn execute(
    supervisor: &ProcessSupervisor,
    base_dir: Option<&Path>,
    json_output: bool,
    command: &[String],
) -> Result<()> {
    let program = command.first().map(String::as_str).unwrap_or_default();
    let hint = base_hint(base_dir, program)?;
    let descriptor = supervisor.prepare(&hint, command.iter().cloned())?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
        return Ok(());
    }

    println!("Command: {}", descriptor.command_line().bright_white());

    let mut vars = vec!["PATH"];
    vars.extend(library_path_var(supervisor.platform()));

    for var in vars {
        let entry = descriptor
            .environment()
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(var));
        match entry {
            Some((key, value)) => println!("{}={}", key.bold(), value),
            None => println!("{}={}", var.bold(), "(unset)".dimmed()),
        }
    }

    Ok(())
}
