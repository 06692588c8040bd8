//! Shell script rendering for activated environments

use pkgdef_platform::Shell;

use crate::activation::EnvChange;

/// Render a script that turns the `before` environment into the `after` one
///
/// Only variables listed in `changes` are emitted, in the order given.
pub fn render_script(shell: Shell, label: &str, changes: &[EnvChange]) -> String {
    let mut lines = vec![
        shell.header().to_string(),
        shell.comment(&format!("Environment for {}", label)),
    ];

    for change in changes {
        match &change.after {
            Some(value) => lines.push(shell.export_var(&change.name, value)),
            None => lines.push(shell.unset_var(&change.name)),
        }
    }

    let mut script = lines.join("\n");
    script.push('\n');
    script
}
