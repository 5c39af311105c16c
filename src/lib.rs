// Core library modules
pub mod core;

// Re-export commonly used types and functions
pub use core::{
    compose_environment, current_environment, ensure_executable, ensure_pid_dir,
    library_path_var, parse_duration, pid_dir, pid_file_path, prefix_path, prepare_process,
    tasklist_lists_pid, CancelToken, Diagnostics, Environment, Error, PidStore, PlatformKind,
    ProcessControl, ProcessDescriptor, ProcessSupervisor, Result, Terminator,
    WindowsProcessControl, PATH_SEPARATOR,
};

#[cfg(unix)]
pub use core::PosixProcessControl;
