//! Implementation of the `pkgdef config` command.
//!
//! Evaluates the manifest for the host platform and shows the frozen values
//! the resolver would receive.

use anyhow::Result;

use crate::cmd::Session;
use crate::output::{format_list, print_json, print_stat, print_success, symbols};

pub fn cmd_config(session: &Session) -> Result<()> {
    let probe = session.settings.probe();
    let configured = session.manifest.configure(probe.as_ref());
    let request = configured.resolve_request();

    if session.format.is_json() {
        return print_json(&request);
    }

    print_success(&format!("{} on {}", request.package, request.platform));
    print_stat("config.release_packages_path", &request.config.release_packages_path);
    print_stat("Private build requires", &format_list(&request.private_build_requires));
    print_stat("Requires", &format_list(&request.requires));
    print_stat("Compatible variants", &request.variants.len().to_string());

    for variant in &request.variants {
        println!(
            "    {} {} {}",
            symbols::INFO,
            variant.index,
            format_list(&variant.requires)
        );
    }

    Ok(())
}
