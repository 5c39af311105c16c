use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use pidkeeper::ProcessSupervisor;
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

use commands::Target;
use logging::LogLevel;

const LONG_ABOUT: &str = "\
pidkeeper - Launch, track and stop a process through a PID file

Starts a long-running command with the directory of its executable in front of
PATH (and of LD_LIBRARY_PATH on Linux, DYLD_LIBRARY_PATH on macOS), records its
PID in a file, and later stops it and waits until it is really gone.

COMMANDS:
  start       Launch a command and record its PID
  status      Check whether the tracked process is running
  stop        Stop the tracked process and wait for it to exit
  env         Show the command and environment a launch would use
  platform    Show the detected platform
  completion  Generate shell completions

PID files live in $PIDKEEPER_PIDDIR, $XDG_RUNTIME_DIR/pidkeeper or the system
temp directory when selected with --name. Set PIDKEEPER_LOG to control logging.
";

#[derive(Parser)]
#[command(name = "pidkeeper")]
#[command(version, author)]
#[command(about = "Launch, track and stop a process through a PID file")]
#[command(long_about = LONG_ABOUT)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Log level for diagnostics on stderr (overrides PIDKEEPER_LOG)
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,
    /// Shorthand for --log-level debug
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch a command and record its PID
    Start {
        #[command(flatten)]
        target: Target,
        /// Directory holding the executable (defaults to the command's own directory)
        #[arg(long)]
        base_dir: Option<PathBuf>,
        /// Append the process's stdout and stderr to this file
        #[arg(long)]
        log_file: Option<PathBuf>,
        /// Command and arguments
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },
    /// Check whether the tracked process is running
    ///
    /// Exit code is 0 when running, 1 when the PID file is stale and 2 when
    /// nothing is tracked.
    Status {
        #[command(flatten)]
        target: Target,
        /// Output as JSON (for programmatic use)
        #[arg(long)]
        json: bool,
    },
    /// Stop the tracked process and wait for it to exit
    Stop {
        #[command(flatten)]
        target: Target,
        /// Give up waiting after this long (e.g., "500ms", "30s", "5m"); waits forever if omitted
        #[arg(long)]
        timeout: Option<String>,
    },
    /// Show the command and environment a launch would use
    Env {
        /// Directory holding the executable (defaults to the command's own directory)
        #[arg(long)]
        base_dir: Option<PathBuf>,
        /// Output the full descriptor as JSON
        #[arg(long)]
        json: bool,
        /// Command and arguments
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },
    /// Show the detected platform
    Platform {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Some(LogLevel::Debug)
    } else {
        cli.log_level
    };
    logging::init_logging(level)?;

    // Platform is classified once, here
    let supervisor = ProcessSupervisor::new()?;

    match cli.command {
        Commands::Start {
            target,
            base_dir,
            log_file,
            command,
        } => commands::start::execute(
            &supervisor,
            &target,
            base_dir.as_deref(),
            log_file.as_deref(),
            &command,
        ),
        Commands::Status { target, json } => commands::status::execute(&supervisor, &target, json),
        Commands::Stop { target, timeout } => {
            commands::stop::execute(&supervisor, &target, timeout.as_deref())
        }
        Commands::Env {
            base_dir,
            json,
            command,
        } => commands::env::execute(&supervisor, base_dir.as_deref(), json, &command),
        Commands::Platform { json } => commands::platform::execute(&supervisor, json),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
            Ok(())
        }
    }
}
