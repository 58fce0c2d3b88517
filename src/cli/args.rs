//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `wrap`: Rewrite Chinese literals into translation calls (dry-run by default)
//! - `check`: Report Chinese literals that are not wrapped yet
//! - `init`: Create a default configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

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
            Some(Command::Wrap(cmd)) => cmd.common.verbose,
            Some(Command::Check(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by `wrap` and `check`.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Files or directories to process, relative to the source root
    /// (default: `includes` from the config file)
    pub paths: Vec<PathBuf>,

    /// Source code root directory (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Key manifest path (overrides config file)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct WrapCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Write rewritten files and the manifest (default is dry-run)
    #[arg(long)]
    pub apply: bool,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Wrap Chinese literals in translation calls and record their keys
    Wrap(WrapCommand),
    /// Report Chinese literals that are not wrapped in translation calls
    Check(CheckCommand),
    /// Initialize a new .zhwraprc.json configuration file
    Init,
}
