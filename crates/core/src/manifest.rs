//! Package manifest types.
//!
//! A [`Manifest`] is the static declaration a package hands to the external
//! package manager: identity, dependencies, build variants, build system,
//! the platform-conditioned values and the activation commands. It is
//! immutable once loaded; evaluating it for a host happens in
//! [`Manifest::configure`].
//!
//! # TOML format
//!
//! ```toml
//! name = "hdcycles"
//! version = "0.7.21"
//! authors = ["benjamin.skinner"]
//! requires = ["usdcycles", "cycles-1.13"]
//! variants = [["platform-windows", "arch-x64"]]
//! build_system = "cmake"
//!
//! [config.release_packages_path]
//! windows = "R:/int"
//! posix = "/r/int"
//!
//! [private_build_requires]
//! windows = ["visual_studio"]
//! posix = ["gcc-7"]
//!
//! [[commands]]
//! op = "set"
//! name = "HDCYCLES_ROOT"
//! value = "{root}"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use pkgdef_platform::Platform;
use semver::Version;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::activation::ActivationPlan;
use crate::error::Error;
use crate::requirement::{Requirement, is_valid_name};
use crate::Result;

/// Build system used to build the package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildSystem {
    Cmake,
    Make,
    Python,
    Custom,
}

impl BuildSystem {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BuildSystem::Cmake => "cmake",
            BuildSystem::Make => "make",
            BuildSystem::Python => "python",
            BuildSystem::Custom => "custom",
        }
    }
}

impl fmt::Display for BuildSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A value that differs between Windows and POSIX hosts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformValue<T> {
    pub windows: T,
    pub posix: T,
}

impl<T> PlatformValue<T> {
    pub fn new(windows: T, posix: T) -> Self {
        Self { windows, posix }
    }

    /// Pick the value for the given platform
    pub fn select(&self, platform: Platform) -> &T {
        match platform {
            Platform::Windows => &self.windows,
            Platform::Posix => &self.posix,
        }
    }
}

/// Declarations in the `config` scope handed to the package manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDecl {
    pub release_packages_path: PlatformValue<String>,
}

/// One admissible combination of constraints the package can be built under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variant(Vec<Requirement>);

impl Variant {
    pub fn new(requirements: Vec<Requirement>) -> Self {
        Self(requirements)
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The range of the `platform-*` constraint, if the variant has one
    pub fn platform(&self) -> Option<&str> {
        self.0
            .iter()
            .find(|req| req.name() == "platform")
            .and_then(|req| req.range())
    }

    /// Whether this variant can be built on the given host
    ///
    /// Variants without a platform constraint fit every host.
    pub fn supports(&self, platform: Platform) -> bool {
        match self.platform() {
            None => true,
            Some(name) => (name == "windows") == platform.is_windows(),
        }
    }

    /// Relative install directory of this variant (`platform-windows/arch-x64/...`)
    pub fn subpath(&self) -> PathBuf {
        self.0.iter().map(|req| req.to_string()).collect()
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", tokens.join(", "))
    }
}

/// The complete package declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub version: Version,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub requires: Vec<Requirement>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    pub build_system: BuildSystem,
    pub config: ConfigDecl,
    pub private_build_requires: PlatformValue<Vec<Requirement>>,
    #[serde(default)]
    pub commands: ActivationPlan,
}

impl Manifest {
    /// Parse and validate a manifest from TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load and validate a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::from_toml_str(&content)?;
        info!(
            path = %path.display(),
            package = %manifest.qualified_name(),
            "loaded manifest"
        );
        Ok(manifest)
    }

    /// `name-version`, the form the package manager uses for installed packages
    pub fn qualified_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    /// Check the structural invariants the type system does not enforce
    pub fn validate(&self) -> Result<()> {
        if !is_valid_name(&self.name) {
            return Err(Error::Invalid(format!(
                "package name '{}' must be non-empty and contain only letters, digits and '_'",
                self.name
            )));
        }

        if self.authors.iter().any(|a| a.trim().is_empty()) {
            return Err(Error::Invalid("author entries must not be empty".to_string()));
        }

        for (index, variant) in self.variants.iter().enumerate() {
            if variant.is_empty() {
                return Err(Error::Invalid(format!("variant {} is empty", index)));
            }
            for req in variant.requirements() {
                req.validate()?;
            }
        }

        let build_requires = self
            .private_build_requires
            .windows
            .iter()
            .chain(&self.private_build_requires.posix);
        for req in self.requires.iter().chain(build_requires) {
            req.validate()?;
        }

        for action in self.commands.actions() {
            let name = &action.name;
            if name.is_empty() || name.contains('=') || name.contains('\0') {
                return Err(Error::Invalid(format!(
                    "invalid environment variable name '{}'",
                    name
                )));
            }
        }

        Ok(())
    }

    pub fn variant(&self, index: usize) -> Option<&Variant> {
        self.variants.get(index)
    }

    /// Install root of the package (or one of its variants) under a packages path
    ///
    /// `<packages_path>/<name>/<version>[/<variant subpath>]`
    pub fn install_root(&self, packages_path: &Path, variant: Option<usize>) -> Result<PathBuf> {
        let base = packages_path.join(&self.name).join(self.version.to_string());
        match variant {
            None => Ok(base),
            Some(index) => {
                let variant = self.variant(index).ok_or(Error::VariantOutOfRange {
                    index,
                    count: self.variants.len(),
                })?;
                Ok(base.join(variant.subpath()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::{ActivationAction, EnvOperation};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
name = "tool"
version = "1.2.0"
build_system = "make"

[config.release_packages_path]
windows = "C:/pkgs"
posix = "/pkgs"

[private_build_requires]
windows = ["msvc"]
posix = ["gcc-9"]
"#;

    fn req(token: &str) -> Requirement {
        Requirement::parse(token).unwrap()
    }

    #[test]
    fn test_minimal_manifest_defaults() {
        let manifest = Manifest::from_toml_str(MINIMAL).unwrap();
        assert_eq!(manifest.name, "tool");
        assert_eq!(manifest.version, Version::new(1, 2, 0));
        assert!(manifest.authors.is_empty());
        assert!(manifest.variants.is_empty());
        assert!(manifest.commands.is_empty());
        assert_eq!(manifest.build_system, BuildSystem::Make);
        assert_eq!(manifest.qualified_name(), "tool-1.2.0");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", MINIMAL).unwrap();

        let manifest = Manifest::load(file.path()).unwrap();
        assert_eq!(manifest.private_build_requires.posix, vec![req("gcc-9")]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Manifest::load(Path::new("/nonexistent/package.toml")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }

    #[test]
    fn test_bad_version_is_parse_error() {
        let content = MINIMAL.replace("1.2.0", "one");
        assert!(matches!(
            Manifest::from_toml_str(&content),
            Err(Error::Toml(_))
        ));
    }

    #[test]
    fn test_rejects_empty_variant() {
        let content = MINIMAL.replace(
            "build_system = \"make\"",
            "build_system = \"make\"\nvariants = [[\"platform-linux\"], []]",
        );
        let err = Manifest::from_toml_str(&content).unwrap_err();
        assert_eq!(err.to_string(), "Invalid manifest: variant 1 is empty");
    }

    #[test]
    fn test_rejects_invalid_name() {
        let content = MINIMAL.replace("name = \"tool\"", "name = \"my-tool\"");
        assert!(matches!(
            Manifest::from_toml_str(&content),
            Err(Error::Invalid(_))
        ));
    }

    #[test]
    fn test_validate_catches_constructed_requirements() {
        let mut manifest = Manifest::from_toml_str(MINIMAL).unwrap();
        manifest.requires.push(Requirement::new("bad name", None));
        assert!(matches!(manifest.validate(), Err(Error::Requirement(_))));
    }

    #[test]
    fn test_validate_catches_bad_variable_name() {
        let mut manifest = Manifest::from_toml_str(MINIMAL).unwrap();
        manifest.commands.push(ActivationAction {
            name: "A=B".to_string(),
            op: EnvOperation::Set,
            value: "x".to_string(),
        });
        assert!(matches!(manifest.validate(), Err(Error::Invalid(_))));
    }

    #[test]
    fn test_variant_platform_and_subpath() {
        let variant = Variant::new(vec![req("platform-windows"), req("arch-x64"), req("usd-19.11-houdini")]);
        assert_eq!(variant.platform(), Some("windows"));
        assert!(variant.supports(Platform::Windows));
        assert!(!variant.supports(Platform::Posix));
        assert_eq!(
            variant.subpath(),
            PathBuf::from("platform-windows").join("arch-x64").join("usd-19.11-houdini")
        );

        let linux = Variant::new(vec![req("platform-linux")]);
        assert!(linux.supports(Platform::Posix));
        assert!(!linux.supports(Platform::Windows));

        let any = Variant::new(vec![req("python-3")]);
        assert_eq!(any.platform(), None);
        assert!(any.supports(Platform::Windows));
        assert!(any.supports(Platform::Posix));
    }

    #[test]
    fn test_install_root() {
        let content = MINIMAL.replace(
            "build_system = \"make\"",
            "build_system = \"make\"\nvariants = [[\"platform-linux\", \"arch-x86_64\"]]",
        );
        let manifest = Manifest::from_toml_str(&content).unwrap();
        let base = Path::new("/pkgs");

        assert_eq!(
            manifest.install_root(base, None).unwrap(),
            PathBuf::from("/pkgs/tool/1.2.0")
        );
        assert_eq!(
            manifest.install_root(base, Some(0)).unwrap(),
            PathBuf::from("/pkgs/tool/1.2.0/platform-linux/arch-x86_64")
        );
        assert!(matches!(
            manifest.install_root(base, Some(1)),
            Err(Error::VariantOutOfRange { index: 1, count: 1 })
        ));
    }

    #[test]
    fn test_platform_value_select() {
        let value = PlatformValue::new("R:/int", "/r/int");
        assert_eq!(*value.select(Platform::Windows), "R:/int");
        assert_eq!(*value.select(Platform::Posix), "/r/int");
    }
}
