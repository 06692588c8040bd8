//! Platform detection and system abstractions for pkgdef
//!
//! This crate provides cross-platform abstractions for:
//! - Host platform classification (Windows vs POSIX)
//! - Injectable platform detection
//! - Shell script fragments for environment activation
//! - PATH-like list handling and `~` expansion

mod error;
mod paths;
mod platform;
mod shell;

pub use error::PlatformError;
pub use paths::{expand_path, join_path_list, split_path_list};
pub use platform::{FixedProbe, HostProbe, Platform, PlatformProbe};
pub use shell::Shell;
