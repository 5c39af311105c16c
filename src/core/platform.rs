//! Host platform classification.
//!
//! Every platform-dependent decision in the crate goes through [`PlatformKind`],
//! so an unsupported OS is rejected in exactly one place.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;

use super::error::{Error, Result};

/// The operating-system families the supervisor knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Windows,
    Linux,
    MacOsx,
}

impl PlatformKind {
    /// Classify the OS this binary was built for.
    pub fn current() -> Result<Self> {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Classify an OS name as reported by `std::env::consts::OS`.
    ///
    /// A few common spellings of macOS are accepted as well. Anything else is an
    /// [`Error::UnsupportedPlatform`]; there is no fallback.
    pub fn from_os_name(os: &str) -> Result<Self> {
        match os.trim().to_ascii_lowercase().as_str() {
            "windows" => Ok(PlatformKind::Windows),
            "linux" => Ok(PlatformKind::Linux),
            "macos" | "macosx" | "mac os x" | "darwin" => Ok(PlatformKind::MacOsx),
            _ => {
                let err = Error::UnsupportedPlatform(os.to_string());
                error!("{}", err);
                Err(err)
            }
        }
    }

    /// Name of the directory holding this platform's bundled resources.
    pub fn resource_dir(&self) -> &'static str {
        match self {
            PlatformKind::Windows => "win",
            PlatformKind::Linux => "linux",
            PlatformKind::MacOsx => "mac",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKind::Windows => "windows",
            PlatformKind::Linux => "linux",
            PlatformKind::MacOsx => "macosx",
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, PlatformKind::Windows)
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
