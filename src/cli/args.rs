//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `sync`: translate what changed and write every locale file
//! - `diff`: show what `sync` would translate, without calling a backend
//! - `init`: create a `.synclangrc.json` configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::backend::Provider;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Sync(cmd)) => cmd.common.verbose,
            Some(Command::Diff(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by `sync` and `diff`.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Directory with the locale folders or files (overrides config file)
    #[arg(long)]
    pub source_dir: Option<PathBuf>,

    /// Authoritative locale (overrides config file)
    #[arg(long)]
    pub main_locale: Option<String>,

    /// Re-translate every key instead of only what changed since the last commit
    #[arg(long)]
    pub force: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct SyncCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Keys per translation request (overrides config file)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Translation provider (overrides config file)
    #[arg(long, value_enum)]
    pub provider: Option<Provider>,

    /// Model name (overrides config file)
    #[arg(long)]
    pub model: Option<String>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Args)]
pub struct DiffCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Translate changed and missing keys and update every locale file
    Sync(SyncCommand),
    /// Show changed, deleted and missing keys without translating anything
    Diff(DiffCommand),
    /// Initialize a new .synclangrc.json configuration file
    Init,
}
