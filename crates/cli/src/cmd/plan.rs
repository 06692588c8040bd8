use anyhow::Result;

use crate::cmd::Session;
use crate::output::{print_info, print_json, symbols};

pub fn cmd_plan(session: &Session) -> Result<()> {
    let plan = &session.manifest.commands;

    if session.format.is_json() {
        return print_json(plan);
    }

    if plan.is_empty() {
        print_info("No activation commands declared");
        return Ok(());
    }

    for (step, action) in plan.actions().iter().enumerate() {
        println!(
            "{:>3}. {:<6} {} {} {}",
            step + 1,
            action.op.to_string(),
            action.name,
            symbols::ARROW,
            action.value
        );
    }

    Ok(())
}
