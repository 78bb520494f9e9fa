use anyhow::Result;

use super::super::args::DiffCommand;
use super::options::{current_dir, resolve_options};
use super::{CommandResult, CommandSummary};
use crate::core::{GitSnapshots, plan_sync};

pub fn diff(cmd: DiffCommand) -> Result<CommandResult> {
    let cwd = current_dir()?;
    let (options, _) = resolve_options(&cwd, &cmd.common, None, true)?;
    let (_, plan) = plan_sync(&options, &GitSnapshots)?;

    Ok(CommandResult {
        summary: CommandSummary::Diff(plan),
    })
}
