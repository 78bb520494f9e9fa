use anyhow::Result;
use tracing::debug;

use super::super::args::SyncCommand;
use super::options::{current_dir, resolve_options};
use super::{CommandResult, CommandSummary};
use crate::backend::{BackendSettings, create_backend};
use crate::core::{FilePlan, GitSnapshots, SyncSummary, plan_sync, run_sync};

pub fn sync(cmd: SyncCommand) -> Result<CommandResult> {
    let cwd = current_dir()?;
    let (options, config) = resolve_options(&cwd, &cmd.common, cmd.batch_size, cmd.quiet)?;

    // Configuration problems surface here, before an API key is required.
    let (_, plan) = plan_sync(&options, &GitSnapshots)?;
    if plan.targets.is_empty() || plan.files.iter().all(FilePlan::is_noop) {
        debug!("nothing to synchronize");
        return Ok(CommandResult {
            summary: CommandSummary::Sync(SyncSummary::default()),
        });
    }

    let provider = cmd.provider.unwrap_or(config.provider);
    let settings = BackendSettings::from_env(provider, cmd.model.or(config.model), config.base_url)?;
    let backend = create_backend(&settings)?;

    let summary = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run_sync(&options, backend.as_ref(), &GitSnapshots))?;

    Ok(CommandResult {
        summary: CommandSummary::Sync(summary),
    })
}
