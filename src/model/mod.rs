//! Typed snapshot records.
//!
//! These structs are the contract between serialization and
//! reconstruction: the serializer builds them from live platform data,
//! the store round-trips them through JSON, and the creator replays them
//! against the target guild. Permission bitfields are kept as decimal
//! strings so values beyond 2^53 survive a round trip through any JSON
//! tooling an operator might point at the snapshot file.

pub mod ban;
pub mod channel;
pub mod emoji;
pub mod role;
pub mod snapshot;

pub use ban::Ban;
pub use channel::{Category, PermissionOverwrite, TextChannel, VoiceChannel};
pub use emoji::Emoji;
pub use role::Role;
pub use snapshot::{GeneralData, Snapshot};
