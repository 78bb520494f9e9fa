use std::path::PathBuf;

use crate::core::{SyncPlan, SyncSummary};

#[derive(Debug)]
pub enum CommandSummary {
    Sync(SyncSummary),
    Diff(SyncPlan),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct InitSummary {
    pub path: PathBuf,
}

/// Result of running synclang commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
}
