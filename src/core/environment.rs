//! Child environment composition.
//!
//! The child gets the caller's environment plus the executable's directory in
//! front of the search path, and on Linux/macOS in front of the dynamic library
//! path, so sibling binaries and bundled libraries resolve first.

use std::collections::BTreeMap;
use std::path::Path;

use super::platform::PlatformKind;

/// Environment of a child process, name to value.
pub type Environment = BTreeMap<String, String>;

/// Separator between entries of a path-list variable on the host.
#[cfg(windows)]
pub const PATH_SEPARATOR: char = ';';
#[cfg(not(windows))]
pub const PATH_SEPARATOR: char = ':';

const PATH_VAR: &str = "PATH";
const DYLD_LIBRARY_PATH_VAR: &str = "DYLD_LIBRARY_PATH";
const LD_LIBRARY_PATH_VAR: &str = "LD_LIBRARY_PATH";

/// Put `new_entry` in front of a path list.
///
/// A missing or blank `current` yields `new_entry` alone; otherwise the trimmed
/// list is appended after a separator.
pub fn prefix_path(new_entry: &str, current: Option<&str>) -> String {
    match current.map(str::trim) {
        Some(existing) if !existing.is_empty() => {
            format!("{}{}{}", new_entry, PATH_SEPARATOR, existing)
        }
        _ => new_entry.to_string(),
    }
}

/// The library search variable the dynamic loader honours on `platform`.
pub fn library_path_var(platform: PlatformKind) -> Option<&'static str> {
    match platform {
        PlatformKind::MacOsx => Some(DYLD_LIBRARY_PATH_VAR),
        PlatformKind::Linux => Some(LD_LIBRARY_PATH_VAR),
        PlatformKind::Windows => None,
    }
}

/// Build the environment for a child whose executable lives in `base_dir`.
///
/// `snapshot` is left untouched; the composed map is a copy.
pub fn compose_environment(
    platform: PlatformKind,
    base_dir: &Path,
    snapshot: &Environment,
) -> Environment {
    let base = base_dir.to_string_lossy();
    let mut env = snapshot.clone();

    prefix_var(&mut env, platform, PATH_VAR, &base);
    if let Some(var) = library_path_var(platform) {
        prefix_var(&mut env, platform, var, &base);
    }

    env
}

/// Snapshot of the calling process's environment.
///
/// Variables whose name or value is not valid Unicode are skipped.
pub fn current_environment() -> Environment {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

fn prefix_var(env: &mut Environment, platform: PlatformKind, name: &str, entry: &str) {
    let key = resolve_key(env, platform, name);
    let value = prefix_path(entry, env.get(&key).map(String::as_str));
    env.insert(key, value);
}

/// Windows treats variable names case-insensitively (`Path` is `PATH`); keep
/// whatever spelling the snapshot already uses.
fn resolve_key(env: &Environment, platform: PlatformKind, name: &str) -> String {
    if platform.is_windows() {
        if let Some(existing) = env.keys().find(|k| k.eq_ignore_ascii_case(name)) {
            return existing.clone();
        }
    }
    name.to_string()
}
