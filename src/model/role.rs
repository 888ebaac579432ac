//! Serialized role record.

use serde::{Deserialize, Serialize};

/// One role as captured from the source guild.
///
/// `position` is the platform-native sort rank; the serializer orders the
/// role list by descending position so the most privileged role replays
/// first. The implicit everyone role is recorded like any other role but
/// flagged `default_role`: it is never created on the target, its
/// permission bitfield is applied to the target's own everyone role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    /// Id the role had on the source guild.
    pub id: String,
    /// Role name.
    pub name: String,
    /// Display color as a packed RGB integer (0 = no color).
    pub color: u32,
    /// Whether members with this role are listed separately.
    pub hoist: bool,
    /// Whether the role can be mentioned by anyone.
    pub mentionable: bool,
    /// Sort rank on the source guild; higher means more privileged.
    pub position: i64,
    /// Permission bitfield as a decimal string.
    pub permissions: String,
    /// Marks the implicit everyone role.
    pub default_role: bool,
}
