//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `guildcopy`.
#[derive(Debug, Parser)]
#[command(name = "guildcopy", version, about = "Back up, restore, or clone a guild's structure")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serialize the source guild into a snapshot file and stop.
    Backup {
        /// Snapshot file name; `.json` is appended when no extension is
        /// given. Defaults to `guildData.json`.
        file: Option<String>,
    },
    /// Rebuild the target guild from a persisted snapshot file.
    Restore {
        /// Snapshot file name; `.json` is appended when no extension is
        /// given. Defaults to `guildData.json`.
        file: Option<String>,
    },
    /// Serialize the source guild live and rebuild the target from it.
    Clone {
        /// Snapshot file name; `.json` is appended when no extension is
        /// given. Defaults to `guildData.json`.
        file: Option<String>,
    },
}
