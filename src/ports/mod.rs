//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the pipeline core and an
//! external system (the remote chat platform, the filesystem, the
//! operator-facing progress sink). Implementations live in
//! `src/adapters/`.

pub mod filesystem;
pub mod platform;
pub mod reporter;

pub use filesystem::FileSystem;
pub use platform::{
    BotIdentity, BotMembership, CategoryCreate, ChatPlatform, GuildFacts, GuildUpdate, LiveBan,
    LiveChannel, LiveChannelKind, LiveEmoji, LiveMember, LiveOverwrite, LiveRole, OverwriteApply,
    OverwriteKind, Permissions, PlatformFuture, RemoteError, RoleCreate, TextChannelCreate,
    VoiceChannelCreate,
};
pub use reporter::{MessageKey, Reporter};
