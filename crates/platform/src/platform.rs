//! Host platform classification and detection

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// The two host families a package manifest distinguishes between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Posix,
}

impl Platform {
    /// Classify a host platform identifier such as `win32`, `linux` or `darwin`
    ///
    /// Any identifier containing `win` is a Windows host. That includes
    /// `darwin`, so macOS hosts get the Windows values. Everything else,
    /// including empty and unrecognised identifiers, is POSIX.
    pub fn classify(identifier: &str) -> Self {
        let id = identifier.trim().to_ascii_lowercase();
        if id.contains("win") {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }

    /// Detect the platform through the given probe
    pub fn detect(probe: &dyn PlatformProbe) -> Self {
        let identifier = probe.identifier();
        let platform = Self::classify(&identifier);
        debug!(%identifier, %platform, "classified host platform");
        platform
    }

    /// Returns the platform name as used in `platform-*` variant tokens
    pub const fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Posix => "posix",
        }
    }

    /// Separator used between entries of PATH-like variables
    pub const fn path_list_separator(&self) -> char {
        match self {
            Platform::Windows => ';',
            Platform::Posix => ':',
        }
    }

    pub fn is_windows(&self) -> bool {
        *self == Platform::Windows
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Source of the host platform identifier
///
/// Manifest evaluation never reads the environment directly; it asks a probe,
/// so tests and the CLI `--platform` flag can substitute their own answer.
pub trait PlatformProbe {
    /// Returns the raw host platform identifier (e.g. `linux`, `win32`)
    fn identifier(&self) -> String;
}

/// Probe for the machine the process runs on, reporting `std::env::consts::OS`
#[derive(Debug, Clone, Copy, Default)]
pub struct HostProbe;

impl PlatformProbe for HostProbe {
    fn identifier(&self) -> String {
        std::env::consts::OS.to_string()
    }
}

/// Probe that always reports the same identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedProbe(pub String);

impl FixedProbe {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }
}

impl PlatformProbe for FixedProbe {
    fn identifier(&self) -> String {
        self.0.clone()
    }
}
