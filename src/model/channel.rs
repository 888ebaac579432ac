//! Serialized category and channel records.

use serde::{Deserialize, Serialize};

/// A per-channel permission rule for one role.
///
/// Only role-type overwrites are serialized; member-type overwrites are
/// dropped at capture time, as are overwrites whose role no longer exists
/// on the source guild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionOverwrite {
    /// Id the targeted role had on the source guild.
    pub role_id: String,
    /// Allowed-permission bitfield as a decimal string.
    pub allow: String,
    /// Denied-permission bitfield as a decimal string.
    pub deny: String,
}

/// A channel category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Id the category had on the source guild.
    pub id: String,
    /// Category name.
    pub name: String,
    /// Display position among categories.
    pub position: i64,
    /// Absolute position as reported by the platform.
    pub raw_position: i64,
    /// Inherits parent permissions; no explicit overwrites are emitted.
    pub perm_locked: bool,
    /// Role permission overwrites (empty when `perm_locked`).
    pub overwrites: Vec<PermissionOverwrite>,
}

/// A text channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChannel {
    /// Id the channel had on the source guild.
    pub id: String,
    /// Channel name.
    pub name: String,
    /// Channel topic, applied in a second pass after creation.
    pub topic: Option<String>,
    /// Whether the channel is age-restricted.
    pub nsfw: bool,
    /// Whether this was the guild's system channel.
    pub system_channel: bool,
    /// Display position among text channels.
    pub position: i64,
    /// Absolute position as reported by the platform.
    pub raw_position: i64,
    /// Old id of the parent category, remapped at replay time.
    pub parent: Option<String>,
    /// Inherits parent permissions; no explicit overwrites are emitted.
    pub perm_locked: bool,
    /// Role permission overwrites (empty when `perm_locked`).
    pub overwrites: Vec<PermissionOverwrite>,
}

/// A voice channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceChannel {
    /// Id the channel had on the source guild.
    pub id: String,
    /// Channel name.
    pub name: String,
    /// Bitrate in bits per second, clamped to the target tier at replay.
    pub bitrate: u32,
    /// User limit (0 = unlimited), clamped to [0, 99] at replay.
    pub user_limit: i64,
    /// Preferred voice region, if pinned.
    pub rtc_region: Option<String>,
    /// Whether this was the guild's AFK channel.
    pub afk_channel: bool,
    /// Display position among voice channels.
    pub position: i64,
    /// Absolute position as reported by the platform.
    pub raw_position: i64,
    /// Old id of the parent category, remapped at replay time.
    pub parent: Option<String>,
    /// Inherits parent permissions; no explicit overwrites are emitted.
    pub perm_locked: bool,
    /// Role permission overwrites (empty when `perm_locked`).
    pub overwrites: Vec<PermissionOverwrite>,
}
