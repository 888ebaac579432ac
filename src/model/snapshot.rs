//! The snapshot root and the guild-wide general settings it carries.

use serde::{Deserialize, Serialize};

use super::{Ban, Category, Emoji, Role, TextChannel, VoiceChannel};

/// Portable representation of one guild's structural configuration.
///
/// Entity lists keep the replay order the serializer established: roles
/// descending by position, categories and channels ascending by raw
/// position. The step counter that numbers progress output is not part
/// of the snapshot; it lives in the pipeline as a plain value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Guild-wide settings (name, icon, moderation levels, AFK timeout).
    pub general: GeneralData,
    /// Roles, sorted by descending position.
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Categories, sorted by ascending position.
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Text channels, sorted by ascending raw position.
    #[serde(default)]
    pub text_channels: Vec<TextChannel>,
    /// Voice channels, sorted by ascending raw position.
    #[serde(default)]
    pub voice_channels: Vec<VoiceChannel>,
    /// Custom emojis.
    #[serde(default)]
    pub emojis: Vec<Emoji>,
    /// Ban list, present only when ban copying was enabled.
    #[serde(default)]
    pub bans: Vec<Ban>,
}

/// Guild-wide settings captured from the source guild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralData {
    /// Guild name.
    pub name: String,
    /// CDN URL of the guild icon, if one is set.
    pub icon: Option<String>,
    /// CDN URL of the invite splash image, if one is set.
    pub splash: Option<String>,
    /// CDN URL of the guild banner, if one is set.
    pub banner: Option<String>,
    /// Verification level (0–4).
    pub verification_level: u8,
    /// Explicit content filter level (0–2).
    pub explicit_content_filter: u8,
    /// AFK timeout in seconds.
    pub afk_timeout: u32,
    /// System channel flags bitfield.
    pub system_channel_flags: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Ban, Category, Emoji, PermissionOverwrite, Role, TextChannel, VoiceChannel};

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            general: GeneralData {
                name: "Test Guild".into(),
                icon: Some("https://cdn.example/icons/1/abc.png?size=2048".into()),
                splash: None,
                banner: None,
                verification_level: 2,
                explicit_content_filter: 1,
                afk_timeout: 300,
                system_channel_flags: 0,
            },
            roles: vec![
                Role {
                    id: "200".into(),
                    name: "Mods".into(),
                    color: 0x00ff_7700,
                    hoist: true,
                    mentionable: false,
                    position: 1,
                    // Deliberately larger than 2^53 to cover the
                    // precision contract.
                    permissions: "4503599627370495123".into(),
                    default_role: false,
                },
                Role {
                    id: "100".into(),
                    name: "@everyone".into(),
                    color: 0,
                    hoist: false,
                    mentionable: false,
                    position: 0,
                    permissions: "104324673".into(),
                    default_role: true,
                },
            ],
            categories: vec![Category {
                id: "300".into(),
                name: "general".into(),
                position: 0,
                raw_position: 0,
                perm_locked: false,
                overwrites: vec![PermissionOverwrite {
                    role_id: "200".into(),
                    allow: "1024".into(),
                    deny: "2048".into(),
                }],
            }],
            text_channels: vec![TextChannel {
                id: "400".into(),
                name: "chat".into(),
                topic: Some("general chatter".into()),
                nsfw: false,
                system_channel: true,
                position: 0,
                raw_position: 0,
                parent: Some("300".into()),
                perm_locked: true,
                overwrites: Vec::new(),
            }],
            voice_channels: vec![VoiceChannel {
                id: "500".into(),
                name: "Voice".into(),
                bitrate: 64000,
                user_limit: 10,
                rtc_region: None,
                afk_channel: false,
                position: 0,
                raw_position: 1,
                parent: None,
                perm_locked: false,
                overwrites: Vec::new(),
            }],
            emojis: vec![Emoji {
                name: "party".into(),
                url: "https://cdn.example/emojis/600.png".into(),
                animated: false,
            }],
            bans: vec![Ban { user_id: "700".into(), reason: Some("spam".into()) }],
        }
    }

    #[test]
    fn json_round_trip_is_lossless() {
        let snapshot = sample_snapshot();
        let json = serde_json::to_string(&snapshot).expect("serialize");
        let restored: Snapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(snapshot, restored);
    }

    #[test]
    fn large_bitfields_survive_as_exact_decimal_strings() {
        let snapshot = sample_snapshot();
        let json = serde_json::to_string(&snapshot).expect("serialize");
        // The value must appear quoted, never as a JSON number.
        assert!(json.contains("\"4503599627370495123\""));
        let restored: Snapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored.roles[0].permissions, "4503599627370495123");
    }

    #[test]
    fn missing_entity_lists_default_to_empty() {
        let json = r#"{
            "general": {
                "name": "Bare",
                "icon": null,
                "splash": null,
                "banner": null,
                "verification_level": 0,
                "explicit_content_filter": 0,
                "afk_timeout": 300,
                "system_channel_flags": 0
            }
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).expect("deserialize");
        assert!(snapshot.roles.is_empty());
        assert!(snapshot.bans.is_empty());
    }
}
