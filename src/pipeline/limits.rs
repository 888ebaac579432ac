//! Tier-dependent quotas and clamps applied before creation calls.

/// Lowest bitrate the platform accepts, in bits per second.
const BITRATE_FLOOR: u32 = 8_000;

/// Clamps a voice channel bitrate to the target guild's tier ceiling.
///
/// Out-of-range values are clamped, never rejected; a snapshot captured
/// from a boosted guild must still replay onto an unboosted target.
#[must_use]
pub fn clamp_bitrate(bitrate: u32, premium_tier: u8) -> u32 {
    let ceiling = match premium_tier {
        0 => 96_000,
        1 => 128_000,
        2 => 256_000,
        _ => 384_000,
    };
    bitrate.clamp(BITRATE_FLOOR, ceiling)
}

/// Clamps a voice channel user limit to the platform range [0, 99].
#[must_use]
pub fn clamp_user_limit(user_limit: i64) -> u16 {
    u16::try_from(user_limit.clamp(0, 99)).unwrap_or(0)
}

/// Per-tier quota for each emoji subset (normal and animated count
/// against the same number separately).
#[must_use]
pub fn emoji_quota(premium_tier: u8) -> usize {
    match premium_tier {
        0 => 50,
        1 => 100,
        2 => 150,
        _ => 250,
    }
}
