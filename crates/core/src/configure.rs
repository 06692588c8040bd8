//! Host-specific evaluation of a manifest.
//!
//! Evaluation is split in two phases. [`Manifest::configure`] asks the
//! platform probe once and freezes every platform-conditioned value into a
//! [`Configured`]. Resolution inputs are then read from that frozen value
//! through [`Configured::resolve_request`]; nothing in the second phase can
//! re-query the host.

use pkgdef_platform::{Platform, PlatformProbe};
use serde::Serialize;
use tracing::debug;

use crate::activation::{ActivationContext, AppendPolicy};
use crate::manifest::{Manifest, Variant};
use crate::requirement::Requirement;

/// The `config` scope as the package manager sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigScope {
    pub release_packages_path: String,
}

/// A manifest evaluated for one host platform
///
/// Only [`Manifest::configure`] can build one, and its fields cannot be
/// changed afterwards.
#[derive(Debug, Clone)]
pub struct Configured<'m> {
    manifest: &'m Manifest,
    platform: Platform,
    config: ConfigScope,
    private_build_requires: Vec<Requirement>,
}

impl Manifest {
    /// Evaluate the platform-conditioned parts of the manifest
    pub fn configure(&self, probe: &dyn PlatformProbe) -> Configured<'_> {
        let platform = Platform::detect(probe);
        let config = ConfigScope {
            release_packages_path: self.config.release_packages_path.select(platform).clone(),
        };
        let private_build_requires = self.private_build_requires.select(platform).clone();

        debug!(
            package = %self.qualified_name(),
            %platform,
            release_packages_path = %config.release_packages_path,
            build_requires = private_build_requires.len(),
            "configured manifest"
        );

        Configured {
            manifest: self,
            platform,
            config,
            private_build_requires,
        }
    }
}

impl<'m> Configured<'m> {
    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn release_packages_path(&self) -> &str {
        &self.config.release_packages_path
    }

    /// Build-time-only requirements, fixed before resolution starts
    pub fn private_build_requires(&self) -> &[Requirement] {
        &self.private_build_requires
    }

    /// Variants buildable on this host, with their manifest indices
    pub fn compatible_variants(&self) -> Vec<(usize, &'m Variant)> {
        self.manifest
            .variants
            .iter()
            .enumerate()
            .filter(|(_, variant)| variant.supports(self.platform))
            .collect()
    }

    /// Activation context for an install root on this host
    pub fn activation_context(&self, root: impl Into<String>, policy: AppendPolicy) -> ActivationContext {
        ActivationContext::new(root, self.platform).with_policy(policy)
    }

    /// Inputs for the external resolver
    pub fn resolve_request(&self) -> ResolveRequest {
        ResolveRequest {
            package: self.manifest.qualified_name(),
            platform: self.platform,
            config: self.config.clone(),
            requires: self.manifest.requires.clone(),
            private_build_requires: self.private_build_requires.clone(),
            variants: self
                .compatible_variants()
                .into_iter()
                .map(|(index, variant)| IndexedVariant {
                    index,
                    requires: variant.requirements().to_vec(),
                })
                .collect(),
        }
    }
}

/// A variant kept together with its position in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedVariant {
    pub index: usize,
    pub requires: Vec<Requirement>,
}

/// Everything the resolver needs, computed from a [`Configured`] manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveRequest {
    pub package: String,
    pub platform: Platform,
    pub config: ConfigScope,
    pub requires: Vec<Requirement>,
    pub private_build_requires: Vec<Requirement>,
    pub variants: Vec<IndexedVariant>,
}
