use anyhow::Result;

use crate::cmd::Session;
use crate::output::{format_list, print_json, print_stat, print_success, symbols};

pub fn cmd_info(session: &Session) -> Result<()> {
    let manifest = &session.manifest;

    if session.format.is_json() {
        return print_json(manifest);
    }

    print_success(&manifest.qualified_name());
    print_stat("Authors", &format_list(&manifest.authors));
    print_stat("Requires", &format_list(&manifest.requires));
    print_stat("Build system", manifest.build_system.as_str());
    print_stat("Variants", &manifest.variants.len().to_string());

    for (index, variant) in manifest.variants.iter().enumerate() {
        println!("    {} {} {}", symbols::INFO, index, variant);
    }

    Ok(())
}
