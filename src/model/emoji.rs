//! Serialized emoji record.

use serde::{Deserialize, Serialize};

/// One custom emoji.
///
/// Before replay the emoji list is split into normal and animated
/// subsets, each truncated to the target guild's tier-dependent quota.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emoji {
    /// Emoji name.
    pub name: String,
    /// CDN URL of the emoji image.
    pub url: String,
    /// Whether the emoji is animated.
    pub animated: bool,
}
