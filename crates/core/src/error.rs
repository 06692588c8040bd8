//! Error types for pkgdef-core

use std::path::PathBuf;
use thiserror::Error;

use crate::requirement::RequirementError;
use crate::template::TemplateError;

/// Errors that can occur in core operations
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read manifest '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid manifest: {0}")]
    Invalid(String),

    #[error("Invalid requirement: {0}")]
    Requirement(#[from] RequirementError),

    #[error("Variant index {index} is out of range ({count} variants declared)")]
    VariantOutOfRange { index: usize, count: usize },

    #[error("Activation failed: {0}")]
    Activation(#[from] ActivationError),

    #[error("Invalid value for {name}: {message}")]
    Settings { name: String, message: String },
}

/// Errors raised while applying an activation plan
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivationError {
    #[error("{variable}: {source}")]
    Template {
        variable: String,
        #[source]
        source: TemplateError,
    },
}
