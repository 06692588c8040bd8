//! Implementation of the `pkgdef env` command.
//!
//! Activates the manifest's environment on top of the current process
//! environment (or an empty one) and prints a script that applies the
//! difference in the chosen shell.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use pkgdef_core::{AppendPolicy, Environment, activate, render_script};
use pkgdef_platform::{Shell, expand_path};
use tracing::debug;

use crate::cmd::Session;
use crate::output::{print_json, print_warning};

#[derive(Debug, Args)]
pub struct EnvArgs {
    /// Install root of the package; derived from the packages path when omitted
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Packages path to derive the install root from (default: config.release_packages_path)
    #[arg(long, conflicts_with = "root")]
    pub packages_path: Option<PathBuf>,

    /// Variant index whose install root to use
    #[arg(long, conflicts_with = "root")]
    pub variant: Option<usize>,

    /// Shell to generate script for (auto-detected if not specified)
    #[arg(short, long)]
    pub shell: Option<String>,

    /// Skip path-list entries that are already present
    #[arg(long, conflicts_with = "allow_duplicates")]
    pub dedup: bool,

    /// Append path-list entries even if already present
    #[arg(long)]
    pub allow_duplicates: bool,

    /// Start from an empty environment instead of the current one
    #[arg(long)]
    pub clean: bool,
}

impl EnvArgs {
    fn policy(&self, default: AppendPolicy) -> AppendPolicy {
        if self.dedup {
            AppendPolicy::Dedup
        } else if self.allow_duplicates {
            AppendPolicy::AllowDuplicates
        } else {
            default
        }
    }
}

pub fn cmd_env(session: &Session, args: &EnvArgs) -> Result<()> {
    let manifest = &session.manifest;
    let probe = session.settings.probe();
    let configured = manifest.configure(probe.as_ref());

    let root = match &args.root {
        Some(root) => expand_path(root)?,
        None => {
            let packages_path = match &args.packages_path {
                Some(path) => expand_path(path)?,
                None => PathBuf::from(configured.release_packages_path()),
            };
            manifest.install_root(&packages_path, args.variant)?
        }
    };
    let root = path_to_string(&root)?;

    let shell = match &args.shell {
        Some(name) => name.parse::<Shell>()?,
        None => Shell::detect(),
    };
    let policy = args.policy(session.settings.append_policy);
    debug!(%root, %shell, %policy, "activating environment");

    let before = if args.clean {
        Environment::new()
    } else {
        Environment::from_process()
    };
    let ctx = configured.activation_context(root, policy);
    let after = activate(&before, &manifest.commands, &ctx)
        .with_context(|| format!("Failed to activate {}", manifest.qualified_name()))?;
    let changes = after.changes_from(&before);

    if session.format.is_json() {
        return print_json(&changes);
    }

    if changes.is_empty() {
        print_warning("Activation does not change the environment");
    }
    print!("{}", render_script(shell, &manifest.qualified_name(), &changes));

    Ok(())
}

fn path_to_string(path: &Path) -> Result<String> {
    path.to_str()
        .map(|s| s.replace('\\', "/"))
        .with_context(|| format!("Install root is not valid unicode: {}", path.display()))
}
