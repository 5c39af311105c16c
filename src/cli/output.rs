use colored::*;
use std::time::{Duration, SystemTime};

use crate::commands::status::TrackedState;

/// Print a success message with a green checkmark
pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print a warning message with a yellow warning symbol
pub fn print_warning(msg: &str) {
    println!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print an error message with a red X
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print an info message with a blue info symbol
pub fn print_info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}

/// Format a duration in a human-readable way
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    let secs = duration.as_secs();

    if secs == 0 {
        format!("{}ms", millis)
    } else if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        let mins = secs / 60;
        let secs = secs % 60;
        if secs == 0 {
            format!("{}m", mins)
        } else {
            format!("{}m {}s", mins, secs)
        }
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        if mins == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}m", hours, mins)
        }
    }
}

/// Format a timestamp relative to now
pub fn format_timestamp(time: SystemTime) -> String {
    match time.elapsed() {
        Ok(elapsed) => {
            let secs = elapsed.as_secs();

            if secs < 60 {
                "just now".to_string()
            } else if secs < 3600 {
                format!("{}m ago", secs / 60)
            } else if secs < 86400 {
                format!("{}h ago", secs / 3600)
            } else {
                let days = secs / 86400;
                if days == 1 {
                    "1 day ago".to_string()
                } else {
                    format!("{} days ago", days)
                }
            }
        }
        Err(_) => "in the future".to_string(),
    }
}

/// Format a tracked state with color and symbol
pub fn format_state(state: &TrackedState) -> ColoredString {
    match state {
        TrackedState::Running => "● Running".green(),
        TrackedState::Stale => "⚠ Stale pid file".yellow(),
        TrackedState::Untracked => "✗ Not tracked".red(),
    }
}

/// Format a PID with cyan color
pub fn format_pid(pid: &str) -> ColoredString {
    pid.trim().cyan()
}

/// Format a process name with cyan color
pub fn format_name(name: &str) -> ColoredString {
    name.cyan().bold()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h");
        assert_eq!(format_duration(Duration::from_secs(3660)), "1h 1m");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(SystemTime::now()), "just now");
        let hour_ago = SystemTime::now() - Duration::from_secs(2 * 3600);
        assert_eq!(format_timestamp(hour_ago), "2h ago");
    }

    #[test]
    fn test_format_pid_trims() {
        colored::control::set_override(false);
        assert_eq!(format_pid(" 42\n").to_string(), "42");
    }
}
