pub mod control;
pub mod diagnostics;
pub mod duration;
pub mod environment;
pub mod error;
pub mod launch;
pub mod pidfile;
pub mod platform;
pub mod supervisor;
pub mod terminate;

pub use control::{tasklist_lists_pid, ProcessControl, WindowsProcessControl};
#[cfg(unix)]
pub use control::PosixProcessControl;
pub use diagnostics::Diagnostics;
pub use duration::parse_duration;
pub use environment::{
    compose_environment, current_environment, library_path_var, prefix_path, Environment,
    PATH_SEPARATOR,
};
pub use error::{Error, Result};
pub use launch::{ensure_executable, prepare_process, ProcessDescriptor};
pub use pidfile::{ensure_pid_dir, pid_dir, pid_file_path, PidStore};
pub use platform::PlatformKind;
pub use supervisor::ProcessSupervisor;
pub use terminate::{CancelToken, Terminator};
