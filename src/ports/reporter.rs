//! Operator-facing progress sink.
//!
//! The pipeline never formats human-readable text itself; it emits a
//! message identifier plus positional arguments and lets the adapter
//! look up the template for the configured language.

/// Identifiers for every progress and sub-step message the pipeline
/// emits. Adapters own the per-language templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    /// Serializing guild-wide settings.
    SerializingGeneral,
    /// Serializing the role list.
    SerializingRoles,
    /// Serializing categories.
    SerializingCategories,
    /// Serializing text channels.
    SerializingTextChannels,
    /// Serializing voice channels.
    SerializingVoiceChannels,
    /// Serializing emojis.
    SerializingEmojis,
    /// Serializing the ban list.
    SerializingBans,
    /// Writing the snapshot file. Args: path.
    SavingSnapshot,
    /// Serialization finished and the snapshot is on disk.
    SerializationFinished,
    /// A snapshot file was loaded. Args: path.
    SnapshotLoaded,
    /// Deleting all channels on the target.
    DeletingChannels,
    /// Deleting all non-protected roles on the target.
    DeletingRoles,
    /// Deleting all emojis on the target.
    DeletingEmojis,
    /// Lifting all existing bans on the target.
    LiftingBans,
    /// Target cleanup finished.
    CleanupFinished,
    /// Applying guild-wide settings to the target.
    SettingGeneral,
    /// Creating roles.
    CreatingRoles,
    /// Creating categories.
    CreatingCategories,
    /// Creating text channels.
    CreatingTextChannels,
    /// Creating voice channels.
    CreatingVoiceChannels,
    /// Creating emojis.
    CreatingEmojis,
    /// Replaying the ban list.
    CreatingBans,
    /// The completion announcement was posted. Args: admin role name.
    CopyFinishedPosted,
    /// No text channel exists; completion goes to the log. Args: admin
    /// role name.
    CopyFinishedNoChannel,
    /// The whole run is done.
    Done,
    /// Sub-step: serialized N roles. Args: count.
    SerializedRoles,
    /// Sub-step: serialized N categories. Args: count.
    SerializedCategories,
    /// Sub-step: serialized N text channels. Args: count.
    SerializedTextChannels,
    /// Sub-step: serialized N voice channels. Args: count.
    SerializedVoiceChannels,
    /// Sub-step: serialized N emojis. Args: count.
    SerializedEmojis,
    /// Sub-step: serialized N bans. Args: count.
    SerializedBans,
    /// Sub-step: creating one role. Args: name.
    CreatingRole,
    /// Sub-step: applied the stored bitfield to the everyone role.
    UpdatedEveryoneRole,
    /// Sub-step: creating one category. Args: name.
    CreatingCategory,
    /// Sub-step: creating one text channel. Args: name.
    CreatingTextChannel,
    /// Sub-step: creating one voice channel. Args: name.
    CreatingVoiceChannel,
    /// Sub-step: setting a channel topic. Args: channel name.
    SettingTopic,
    /// Sub-step: marked the system channel. Args: channel name.
    SystemChannelSet,
    /// Sub-step: configured the AFK channel and timeout.
    AfkConfigured,
    /// Sub-step: creating one emoji. Args: name.
    CreatingEmoji,
    /// Sub-step: banning one user. Args: user id.
    BanningUser,
}

/// Emits progress messages and records errors for the operator.
///
/// `progress` and `detail` are numbered with the pipeline's step counter
/// (`detail` adds a sub-counter, `3.1`-style). `error` records a fatal
/// failure; console output of the failure itself is the binary's job so
/// the reason is printed exactly once.
pub trait Reporter: Send + Sync {
    /// Emits a numbered top-level progress message.
    fn progress(&self, step: u64, key: MessageKey, args: &[&str]);

    /// Emits a numbered sub-step message below the current step.
    fn detail(&self, step: u64, sub: u64, key: MessageKey, args: &[&str]);

    /// Records a fatal error.
    fn error(&self, message: &str);
}
