//! Dispatch a parsed command to its handler.

use super::{
    args::{Arguments, Command},
    commands::CommandResult,
    commands::{diff::diff, init::init, sync::sync},
};
use anyhow::Result;

pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Sync(cmd)) => sync(cmd),
        Some(Command::Diff(cmd)) => diff(cmd),
        Some(Command::Init) => init(),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
