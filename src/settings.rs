//! Run configuration loaded once at startup from `settings.json`.

use std::path::Path;

use serde::Deserialize;

/// Environment variable that overrides the settings-file token, so the
/// credential can stay out of version-controlled JSON.
pub const TOKEN_ENV_VAR: &str = "GUILDCOPY_TOKEN";

/// How much console output the run produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLevel {
    /// Progress messages, sub-steps, and errors.
    #[default]
    All,
    /// Errors only.
    Error,
    /// Nothing; the exit code is the only signal.
    None,
}

/// All run configuration, read-only after startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Id of the guild to serialize.
    pub source_guild_id: String,
    /// Id of the guild to rebuild.
    pub target_guild_id: String,
    /// Id of the admin-marker role on the target guild. May be left
    /// empty; validation then falls back to discovery by role name.
    pub admin_role_id: String,
    /// Copy guild-wide settings (name, icon, moderation levels).
    pub copy_general: bool,
    /// Copy roles, categories, and channels.
    pub copy_structure: bool,
    /// Copy custom emojis.
    pub copy_emojis: bool,
    /// Copy the ban list.
    pub copy_bans: bool,
    /// Console verbosity.
    pub output_level: OutputLevel,
    /// Delay inserted after each throttled remote call, in milliseconds.
    pub throttle_ms: u64,
    /// Display language for progress messages.
    pub language: String,
    /// Bot credential. Overridden by `GUILDCOPY_TOKEN` when set.
    pub token: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_guild_id: String::new(),
            target_guild_id: String::new(),
            admin_role_id: String::new(),
            copy_general: true,
            copy_structure: true,
            copy_emojis: false,
            copy_bans: false,
            output_level: OutputLevel::All,
            throttle_ms: 250,
            language: "en".to_string(),
            token: String::new(),
        }
    }
}

impl Settings {
    /// Loads settings from a JSON file and applies the token override
    /// from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error string when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings file {}: {e}", path.display()))?;
        let mut settings: Self = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse settings file {}: {e}", path.display()))?;
        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            settings.token = token;
        }
        Ok(settings)
    }
}
