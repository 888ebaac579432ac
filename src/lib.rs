//! Core library entry for the `guildcopy` CLI.
//!
//! One-shot tool that copies a guild's structural configuration (roles,
//! categories, channels, emojis, bans) between servers via the remote
//! platform's API: `backup` serializes to a JSON snapshot, `restore`
//! replays a snapshot onto a target guild, `clone` does both in one run.

pub mod adapters;
pub mod cli;
pub mod context;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod ports;
pub mod settings;
pub mod store;

use std::path::Path;

use clap::Parser;

use crate::cli::{Cli, Command};
use crate::context::ServiceContext;
use crate::pipeline::Mode;
use crate::settings::Settings;

/// File the run configuration is loaded from.
pub const SETTINGS_FILE: &str = "settings.json";

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing, settings loading, or
/// the pipeline fails; the caller prints it and exits non-zero.
pub async fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).map_err(|err| err.to_string())?;

    // Optional .env file for the token override; absence is fine.
    dotenvy::dotenv().ok();
    let settings = Settings::load(Path::new(SETTINGS_FILE))?;
    let ctx = ServiceContext::live(&settings);

    let (mode, file) = match cli.command {
        Command::Backup { file } => (Mode::Backup, file),
        Command::Restore { file } => (Mode::Restore, file),
        Command::Clone { file } => (Mode::Clone, file),
    };
    let snapshot_path = store::resolve_snapshot_path(file.as_deref());

    match pipeline::execute(&ctx, &settings, mode, &snapshot_path).await {
        Ok(()) => Ok(()),
        Err(err) => {
            let message = err.to_string();
            // File-log the failure; the binary prints it exactly once.
            ctx.reporter.error(&message);
            Err(message)
        }
    }
}
