//! Error taxonomy for the copy pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::ports::platform::RemoteError;

/// A pre-flight contract violation detected before any mutation.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// Source and target settings point at the same guild.
    #[error("source and target guild ids are identical")]
    IdenticalGuilds,

    /// The credential belongs to a user account instead of a bot.
    #[error("the configured token belongs to a user account; a bot account is required")]
    UserAccountToken,

    /// The source guild is not among the bot's guilds.
    #[error("source guild {0} was not found; check the id in the settings")]
    SourceNotFound(String),

    /// The bot is not a member of the target guild.
    #[error("the bot is not a member of target guild {0}")]
    TargetNotJoined(String),

    /// Ban copying is enabled but the bot may not read the ban list.
    #[error("the bot lacks ban privileges on guild {0}, required to copy bans")]
    MissingBanPermission(String),

    /// No admin-marker role was found by id or by the fallback name.
    #[error("no admin role found on the target guild, neither by the configured id nor by the name \"{0}\"")]
    AdminRoleMissing(String),

    /// The admin-marker role lacks administrative privilege.
    #[error("admin role \"{0}\" does not carry the administrator permission")]
    AdminRoleNotAdministrator(String),

    /// The admin-marker role is not the single highest role.
    #[error("admin role \"{0}\" must be the highest role on the target guild")]
    AdminRoleNotHighest(String),

    /// The bot's member record does not carry the admin-marker role.
    #[error("the bot does not hold the admin role \"{0}\"")]
    AdminRoleNotAssigned(String),
}

/// Top-level pipeline error. The controller is the only place that
/// matches on this broadly; components return the variant they hit and
/// propagate with `?`.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A pre-flight check failed; nothing was mutated.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The platform reports the guild as temporarily unavailable.
    #[error("guild {0} is currently unavailable, please try again later")]
    UnavailableGuild(String),

    /// Restore mode was started without a snapshot file.
    #[error("no snapshot file found at {}", .0.display())]
    MissingBackup(PathBuf),

    /// The snapshot could not be written, read, or understood.
    #[error("snapshot persistence failed: {0}")]
    Persistence(String),

    /// A remote create/delete/update/fetch call failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}
