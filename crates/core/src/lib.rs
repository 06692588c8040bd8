//! pkgdef-core: Core logic for pkgdef
//!
//! This crate provides the package manifest model and its evaluation:
//! - `Manifest`: identity, requirements, variants and activation commands
//! - `Configured`: the manifest frozen for one host platform
//! - `activate`: pure environment activation over snapshots
//! - `render_script`: materialising an activated environment for a shell

pub mod activation;
mod configure;
mod error;
mod hdcycles;
mod manifest;
mod requirement;
pub mod script;
mod settings;
pub mod template;

pub use activation::{
    ActivationAction, ActivationContext, ActivationPlan, AppendPolicy, EnvChange, EnvOperation,
    Environment, activate,
};
pub use configure::{ConfigScope, Configured, IndexedVariant, ResolveRequest};
pub use error::{ActivationError, Error};
pub use hdcycles::{
    PATH_VAR, PLUGIN_PATH_VAR, PLUGIN_ROOT_VAR, ROOT_VAR, TOOLS_ROOT_VAR, activation_plan,
    hdcycles,
};
pub use manifest::{BuildSystem, ConfigDecl, Manifest, PlatformValue, Variant};
pub use requirement::{Requirement, RequirementError};
pub use script::render_script;
pub use settings::{APPEND_POLICY_ENV, PLATFORM_ENV, Settings};

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;
