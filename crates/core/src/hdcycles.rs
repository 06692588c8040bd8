//! Built-in manifest of the `hdcycles` Hydra render delegate package

use semver::Version;

use crate::activation::{ActivationAction, ActivationPlan};
use crate::manifest::{BuildSystem, ConfigDecl, Manifest, PlatformValue, Variant};
use crate::requirement::Requirement;

pub const ROOT_VAR: &str = "HDCYCLES_ROOT";
pub const PLUGIN_ROOT_VAR: &str = "HDCYCLES_PLUGIN_ROOT";
pub const TOOLS_ROOT_VAR: &str = "HDCYCLES_TOOLS_ROOT";
/// USD plugin search path
pub const PLUGIN_PATH_VAR: &str = "PXR_PLUGINPATH_NAME";
pub const PATH_VAR: &str = "PATH";

fn req(token: &str) -> Requirement {
    match token.split_once('-') {
        Some((name, range)) => Requirement::new(name, Some(range)),
        None => Requirement::new(token, None),
    }
}

fn variant(tokens: &[&str]) -> Variant {
    Variant::new(tokens.iter().copied().map(req).collect())
}

/// Environment mutations applied when the package is activated
pub fn activation_plan() -> ActivationPlan {
    [
        ActivationAction::set(ROOT_VAR, "{root}"),
        ActivationAction::set(PLUGIN_ROOT_VAR, "{root}/plugin"),
        ActivationAction::set(TOOLS_ROOT_VAR, "{root}/tools"),
        ActivationAction::append(
            PLUGIN_PATH_VAR,
            format!("{{env.{}}}/usd/ndrCycles/resources", PLUGIN_ROOT_VAR),
        ),
        ActivationAction::append(
            PLUGIN_PATH_VAR,
            format!("{{env.{}}}/usd/hdCycles/resources", PLUGIN_ROOT_VAR),
        ),
        ActivationAction::append(PATH_VAR, format!("{{env.{}}}", TOOLS_ROOT_VAR)),
    ]
    .into_iter()
    .collect()
}

/// The `hdcycles` package declaration
pub fn hdcycles() -> Manifest {
    Manifest {
        name: "hdcycles".to_string(),
        version: Version::new(0, 7, 21),
        authors: vec!["benjamin.skinner".to_string()],
        requires: vec![req("usdcycles"), req("cycles-1.13")],
        variants: vec![
            variant(&[
                "platform-windows",
                "arch-x64",
                "os-windows-10",
                "usd-20.05-ta.1.2",
                "openvdb-7.0.0",
            ]),
            variant(&[
                "platform-windows",
                "arch-x64",
                "os-windows-10",
                "usd-19.11-houdini",
            ]),
            variant(&[
                "platform-windows",
                "arch-x64",
                "os-windows-10",
                "usd-20.08-houdini",
                "openvdb-7.1.0",
            ]),
        ],
        build_system: BuildSystem::Cmake,
        config: ConfigDecl {
            release_packages_path: PlatformValue::new("R:/int".to_string(), "/r/int".to_string()),
        },
        private_build_requires: PlatformValue::new(vec![req("visual_studio")], vec![req("gcc-7")]),
        commands: activation_plan(),
    }
}
