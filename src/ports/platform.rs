//! Chat platform port: guild CRUD against the remote service.
//!
//! The pipeline core never touches a live platform handle; everything it
//! learns about a guild arrives as one of the typed records below, and
//! every mutation goes through [`ChatPlatform`]. The trait stays
//! dyn-compatible by returning boxed futures through [`PlatformFuture`].

use std::future::Future;
use std::pin::Pin;

use bitflags::bitflags;
use thiserror::Error;

/// Boxed future type alias used by [`ChatPlatform`] to keep the trait
/// dyn-compatible.
pub type PlatformFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, RemoteError>> + Send + 'a>>;

/// A failed create/delete/update/fetch call against the platform.
#[derive(Debug, Clone, Error)]
#[error("remote operation `{operation}` failed: {detail}")]
pub struct RemoteError {
    /// Name of the operation that failed (e.g. `create_role`).
    pub operation: String,
    /// Platform- or transport-level failure detail.
    pub detail: String,
}

impl RemoteError {
    /// Creates a new remote error for the named operation.
    #[must_use]
    pub fn new(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { operation: operation.into(), detail: detail.into() }
    }
}

bitflags! {
    /// The few named permission bits the pipeline inspects directly.
    ///
    /// Snapshot bitfields stay decimal strings end to end; these flags
    /// exist only for validation checks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Permissions: u64 {
        /// May ban members.
        const BAN_MEMBERS = 1 << 2;
        /// Implies every other permission.
        const ADMINISTRATOR = 1 << 3;
    }
}

/// Who the credential authenticates as.
#[derive(Debug, Clone)]
pub struct BotIdentity {
    /// The account's user id.
    pub user_id: String,
    /// Whether the account is a bot account.
    pub is_bot: bool,
}

/// The bot's own member record on one guild.
#[derive(Debug, Clone)]
pub struct BotMembership {
    /// Ids of the roles the bot holds on the guild.
    pub role_ids: Vec<String>,
    /// Aggregate permission bitfield across those roles.
    pub permissions: u64,
}

/// Guild-level facts needed by serialization and validation.
#[derive(Debug, Clone)]
pub struct GuildFacts {
    /// Guild id.
    pub id: String,
    /// Guild name.
    pub name: String,
    /// Whether the platform currently reports the guild as available.
    pub available: bool,
    /// CDN URL of the guild icon.
    pub icon_url: Option<String>,
    /// CDN URL of the invite splash image.
    pub splash_url: Option<String>,
    /// CDN URL of the guild banner.
    pub banner_url: Option<String>,
    /// Verification level (0–4).
    pub verification_level: u8,
    /// Explicit content filter level (0–2).
    pub explicit_content_filter: u8,
    /// AFK timeout in seconds.
    pub afk_timeout: u32,
    /// Id of the AFK voice channel, if configured.
    pub afk_channel_id: Option<String>,
    /// Id of the system channel, if configured.
    pub system_channel_id: Option<String>,
    /// System channel flags bitfield.
    pub system_channel_flags: u64,
    /// Boost tier (0–3), gating emoji quota, bitrate ceiling, splash and
    /// banner.
    pub premium_tier: u8,
    /// Id of the implicit everyone role.
    pub everyone_role_id: String,
}

/// One role as the platform reports it.
#[derive(Debug, Clone)]
pub struct LiveRole {
    /// Role id.
    pub id: String,
    /// Role name.
    pub name: String,
    /// Packed RGB color (0 = none).
    pub color: u32,
    /// Hoisted in the member list.
    pub hoist: bool,
    /// Mentionable by anyone.
    pub mentionable: bool,
    /// Sort rank; higher is more privileged.
    pub position: i64,
    /// Permission bitfield.
    pub permissions: u64,
}

/// Channel kinds the pipeline copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveChannelKind {
    /// A channel category.
    Category,
    /// A text channel.
    Text,
    /// A voice channel.
    Voice,
}

/// Whether an overwrite targets a role or an individual member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OverwriteKind {
    /// Targets a role.
    Role,
    /// Targets a single member.
    Member,
}

/// One permission overwrite as the platform reports it.
#[derive(Debug, Clone)]
pub struct LiveOverwrite {
    /// Id of the targeted role or member.
    pub target_id: String,
    /// Role or member overwrite.
    pub kind: OverwriteKind,
    /// Allowed-permission bitfield.
    pub allow: u64,
    /// Denied-permission bitfield.
    pub deny: u64,
}

/// One channel or category as the platform reports it.
#[derive(Debug, Clone)]
pub struct LiveChannel {
    /// Channel id.
    pub id: String,
    /// Channel kind.
    pub kind: LiveChannelKind,
    /// Channel name.
    pub name: String,
    /// Display position within the channel's kind.
    pub position: i64,
    /// Absolute position as reported by the platform.
    pub raw_position: i64,
    /// Id of the parent category, if any.
    pub parent_id: Option<String>,
    /// Topic (text channels only).
    pub topic: Option<String>,
    /// Age restriction flag (text channels only).
    pub nsfw: bool,
    /// Bitrate in bits per second (voice channels only).
    pub bitrate: Option<u32>,
    /// User limit (voice channels only).
    pub user_limit: Option<i64>,
    /// Pinned voice region (voice channels only).
    pub rtc_region: Option<String>,
    /// Permission overwrites, both role- and member-typed.
    pub overwrites: Vec<LiveOverwrite>,
}

/// One custom emoji as the platform reports it.
#[derive(Debug, Clone)]
pub struct LiveEmoji {
    /// Emoji id.
    pub id: String,
    /// Emoji name.
    pub name: String,
    /// CDN URL of the emoji image.
    pub url: String,
    /// Whether the emoji is animated.
    pub animated: bool,
}

/// One ban-list entry as the platform reports it.
#[derive(Debug, Clone)]
pub struct LiveBan {
    /// Id of the banned user.
    pub user_id: String,
    /// Audit-log reason, if recorded.
    pub reason: Option<String>,
}

/// One guild member as the platform reports it.
#[derive(Debug, Clone)]
pub struct LiveMember {
    /// The member's user id.
    pub user_id: String,
    /// The member's username.
    pub username: String,
    /// Whether the member is a bot account.
    pub bot: bool,
}

/// Options for creating a role.
#[derive(Debug, Clone)]
pub struct RoleCreate {
    /// Role name.
    pub name: String,
    /// Packed RGB color.
    pub color: u32,
    /// Hoist flag.
    pub hoist: bool,
    /// Mentionable flag.
    pub mentionable: bool,
    /// Permission bitfield.
    pub permissions: u64,
    /// Requested initial sort position. Kept low so freshly created
    /// roles never land above the admin-marker role.
    pub position: i64,
}

/// A permission overwrite with the role id already remapped to the
/// target guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverwriteApply {
    /// Id of the role on the target guild.
    pub role_id: String,
    /// Allowed-permission bitfield.
    pub allow: u64,
    /// Denied-permission bitfield.
    pub deny: u64,
}

/// Options for creating a category.
#[derive(Debug, Clone)]
pub struct CategoryCreate {
    /// Category name.
    pub name: String,
    /// Remapped permission overwrites.
    pub overwrites: Vec<OverwriteApply>,
}

/// Options for creating a text channel.
#[derive(Debug, Clone)]
pub struct TextChannelCreate {
    /// Channel name.
    pub name: String,
    /// Age restriction flag.
    pub nsfw: bool,
    /// Id of the parent category on the target guild.
    pub parent_id: Option<String>,
    /// Remapped overwrites; `None` inherits the parent's permissions.
    pub overwrites: Option<Vec<OverwriteApply>>,
}

/// Options for creating a voice channel.
#[derive(Debug, Clone)]
pub struct VoiceChannelCreate {
    /// Channel name.
    pub name: String,
    /// Bitrate in bits per second, already clamped to the target tier.
    pub bitrate: u32,
    /// User limit, already clamped to [0, 99].
    pub user_limit: u16,
    /// Pinned voice region, if any.
    pub rtc_region: Option<String>,
    /// Id of the parent category on the target guild.
    pub parent_id: Option<String>,
    /// Remapped overwrites; `None` inherits the parent's permissions.
    pub overwrites: Option<Vec<OverwriteApply>>,
}

/// Guild-wide settings update issued during the general stage.
#[derive(Debug, Clone)]
pub struct GuildUpdate {
    /// New guild name.
    pub name: String,
    /// Icon image URL to fetch and apply, if any.
    pub icon_url: Option<String>,
    /// Invite splash image URL, if any (tier-gated by the caller).
    pub splash_url: Option<String>,
    /// Banner image URL, if any (tier-gated by the caller).
    pub banner_url: Option<String>,
    /// Verification level.
    pub verification_level: u8,
    /// Explicit content filter level.
    pub explicit_content_filter: u8,
}

/// Create/read/update/delete operations against the remote platform.
///
/// Fetch methods are read-only; mutation methods map one-to-one onto
/// platform API calls so the pipeline's call ordering is observable in
/// tests.
pub trait ChatPlatform: Send + Sync {
    /// Resolves who the configured credential authenticates as.
    fn identity(&self) -> PlatformFuture<'_, BotIdentity>;

    /// Fetches guild-level facts, or `None` when the bot is not a member
    /// of the guild.
    fn guild(&self, guild_id: &str) -> PlatformFuture<'_, Option<GuildFacts>>;

    /// Lists all roles of a guild.
    fn roles(&self, guild_id: &str) -> PlatformFuture<'_, Vec<LiveRole>>;

    /// Lists all categories and channels of a guild.
    fn channels(&self, guild_id: &str) -> PlatformFuture<'_, Vec<LiveChannel>>;

    /// Lists all custom emojis of a guild.
    fn emojis(&self, guild_id: &str) -> PlatformFuture<'_, Vec<LiveEmoji>>;

    /// Lists the ban list of a guild. Requires ban privileges.
    fn bans(&self, guild_id: &str) -> PlatformFuture<'_, Vec<LiveBan>>;

    /// Lists all members of a guild.
    fn members(&self, guild_id: &str) -> PlatformFuture<'_, Vec<LiveMember>>;

    /// Fetches the bot's own member record on a guild.
    fn bot_membership(&self, guild_id: &str) -> PlatformFuture<'_, BotMembership>;

    /// Applies guild-wide settings.
    fn update_guild(&self, guild_id: &str, update: GuildUpdate) -> PlatformFuture<'_, ()>;

    /// Creates a role and returns its new id.
    fn create_role(&self, guild_id: &str, role: RoleCreate) -> PlatformFuture<'_, String>;

    /// Replaces a role's permission bitfield (used for the everyone
    /// role, which is never created).
    fn set_role_permissions(
        &self,
        guild_id: &str,
        role_id: &str,
        permissions: u64,
    ) -> PlatformFuture<'_, ()>;

    /// Creates a category and returns its new id.
    fn create_category(
        &self,
        guild_id: &str,
        category: CategoryCreate,
    ) -> PlatformFuture<'_, String>;

    /// Creates a text channel and returns its new id.
    fn create_text_channel(
        &self,
        guild_id: &str,
        channel: TextChannelCreate,
    ) -> PlatformFuture<'_, String>;

    /// Creates a voice channel and returns its new id.
    fn create_voice_channel(
        &self,
        guild_id: &str,
        channel: VoiceChannelCreate,
    ) -> PlatformFuture<'_, String>;

    /// Sets a text channel's topic. A separate affordance from creation
    /// on purpose; the channel must already exist.
    fn set_topic(&self, channel_id: &str, topic: &str) -> PlatformFuture<'_, ()>;

    /// Marks a channel as the guild's system channel and applies the
    /// stored system channel flags.
    fn set_system_channel(
        &self,
        guild_id: &str,
        channel_id: &str,
        flags: u64,
    ) -> PlatformFuture<'_, ()>;

    /// Sets the AFK channel (or clears it) and the AFK timeout.
    fn set_afk(
        &self,
        guild_id: &str,
        channel_id: Option<&str>,
        timeout: u32,
    ) -> PlatformFuture<'_, ()>;

    /// Uploads a custom emoji from an image URL.
    fn create_emoji(
        &self,
        guild_id: &str,
        name: &str,
        image_url: &str,
    ) -> PlatformFuture<'_, ()>;

    /// Deletes a channel or category.
    fn delete_channel(&self, channel_id: &str) -> PlatformFuture<'_, ()>;

    /// Deletes a role.
    fn delete_role(&self, guild_id: &str, role_id: &str) -> PlatformFuture<'_, ()>;

    /// Deletes a custom emoji.
    fn delete_emoji(&self, guild_id: &str, emoji_id: &str) -> PlatformFuture<'_, ()>;

    /// Bans a user, with an optional audit-log reason.
    fn ban(
        &self,
        guild_id: &str,
        user_id: &str,
        reason: Option<&str>,
    ) -> PlatformFuture<'_, ()>;

    /// Lifts a ban.
    fn unban(&self, guild_id: &str, user_id: &str) -> PlatformFuture<'_, ()>;

    /// Posts a message to a text channel.
    fn send_message(&self, channel_id: &str, content: &str) -> PlatformFuture<'_, ()>;
}
