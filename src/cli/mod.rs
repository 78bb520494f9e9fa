//! Command-line layer: argument parsing, command handlers and console output.

use anyhow::Result;

mod args;
mod commands;
mod exit_status;
mod logging;
mod report;
mod run;

pub use args::{Arguments, Command, CommonArgs, DiffCommand, SyncCommand};
pub use exit_status::ExitStatus;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    logging::init(args.verbose());

    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    let result = run::run(args)?;
    report::print(&result);

    Ok(ExitStatus::Success)
}
