//! Serializer: reads a live source guild into a portable snapshot.
//!
//! Pure extraction; nothing here mutates the source. Extraction order is
//! fixed (general, roles, categories, text channels, voice channels,
//! emojis, bans) and the snapshot is written to disk before any
//! target-side step runs, so a failed run never leaves the operator
//! without the captured data.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::path::Path;

use crate::context::ServiceContext;
use crate::error::{PipelineError, ValidationError};
use crate::model::{
    Ban, Category, Emoji, GeneralData, PermissionOverwrite, Role, Snapshot, TextChannel,
    VoiceChannel,
};
use crate::pipeline::StepTracker;
use crate::ports::platform::{
    GuildFacts, LiveBan, LiveChannel, LiveChannelKind, OverwriteKind,
};
use crate::ports::reporter::MessageKey;
use crate::store::SnapshotStore;

/// Serializes the source guild and writes the snapshot to `path`.
///
/// `bans` is the pre-fetched ban collection when ban copying is enabled;
/// fetching it up front keeps the permission failure ahead of any
/// extraction work.
///
/// # Errors
///
/// Fails with [`PipelineError::UnavailableGuild`] when the platform
/// flags the source unavailable, [`PipelineError::Validation`] when the
/// source guild cannot be found, [`PipelineError::Remote`] when a fetch
/// fails, and [`PipelineError::Persistence`] when the snapshot cannot be
/// written.
pub async fn serialize_guild(
    ctx: &ServiceContext,
    source_id: &str,
    bans: Option<Vec<LiveBan>>,
    path: &Path,
    steps: StepTracker,
) -> Result<(Snapshot, StepTracker), PipelineError> {
    let facts = ctx
        .platform
        .guild(source_id)
        .await?
        .ok_or_else(|| ValidationError::SourceNotFound(source_id.to_string()))?;
    if !facts.available {
        return Err(PipelineError::UnavailableGuild(source_id.to_string()));
    }

    let (step, steps) = steps.advance();
    ctx.reporter.progress(step, MessageKey::SerializingGeneral, &[]);
    let general = serialize_general(&facts);

    let (step, steps) = steps.advance();
    ctx.reporter.progress(step, MessageKey::SerializingRoles, &[]);
    let roles = serialize_roles(ctx, &facts).await?;
    if !roles.is_empty() {
        let count = roles.len().to_string();
        ctx.reporter.detail(step, 1, MessageKey::SerializedRoles, &[&count]);
    }
    let role_ids: HashSet<String> = roles.iter().map(|r| r.id.clone()).collect();

    let channels = ctx.platform.channels(source_id).await?;

    let (step, steps) = steps.advance();
    ctx.reporter.progress(step, MessageKey::SerializingCategories, &[]);
    let categories = serialize_categories(&channels, &role_ids);
    if !categories.is_empty() {
        let count = categories.len().to_string();
        ctx.reporter.detail(step, 1, MessageKey::SerializedCategories, &[&count]);
    }

    let (step, steps) = steps.advance();
    ctx.reporter.progress(step, MessageKey::SerializingTextChannels, &[]);
    let text_channels = serialize_text_channels(&channels, &role_ids, &facts);
    if !text_channels.is_empty() {
        let count = text_channels.len().to_string();
        ctx.reporter.detail(step, 1, MessageKey::SerializedTextChannels, &[&count]);
    }

    let (step, steps) = steps.advance();
    ctx.reporter.progress(step, MessageKey::SerializingVoiceChannels, &[]);
    let voice_channels = serialize_voice_channels(&channels, &role_ids, &facts);
    if !voice_channels.is_empty() {
        let count = voice_channels.len().to_string();
        ctx.reporter.detail(step, 1, MessageKey::SerializedVoiceChannels, &[&count]);
    }

    let (step, steps) = steps.advance();
    ctx.reporter.progress(step, MessageKey::SerializingEmojis, &[]);
    let emojis: Vec<Emoji> = ctx
        .platform
        .emojis(source_id)
        .await?
        .into_iter()
        .map(|e| Emoji { name: e.name, url: e.url, animated: e.animated })
        .collect();
    if !emojis.is_empty() {
        let count = emojis.len().to_string();
        ctx.reporter.detail(step, 1, MessageKey::SerializedEmojis, &[&count]);
    }

    let mut steps = steps;
    let bans: Vec<Ban> = match bans {
        None => Vec::new(),
        Some(bans) => {
            let (step, next) = steps.advance();
            steps = next;
            ctx.reporter.progress(step, MessageKey::SerializingBans, &[]);
            let records: Vec<Ban> = bans
                .into_iter()
                .map(|b| Ban { user_id: b.user_id, reason: b.reason })
                .collect();
            if !records.is_empty() {
                let count = records.len().to_string();
                ctx.reporter.detail(step, 1, MessageKey::SerializedBans, &[&count]);
            }
            records
        }
    };

    let snapshot =
        Snapshot { general, roles, categories, text_channels, voice_channels, emojis, bans };

    let (step, steps) = steps.advance();
    let path_display = path.display().to_string();
    ctx.reporter.progress(step, MessageKey::SavingSnapshot, &[&path_display]);
    SnapshotStore::new(ctx).save(path, &snapshot)?;

    let (step, steps) = steps.advance();
    ctx.reporter.progress(step, MessageKey::SerializationFinished, &[]);

    Ok((snapshot, steps))
}

fn serialize_general(facts: &GuildFacts) -> GeneralData {
    GeneralData {
        name: facts.name.clone(),
        icon: facts.icon_url.clone(),
        splash: facts.splash_url.clone(),
        banner: facts.banner_url.clone(),
        verification_level: facts.verification_level,
        explicit_content_filter: facts.explicit_content_filter,
        afk_timeout: facts.afk_timeout,
        system_channel_flags: facts.system_channel_flags,
    }
}

/// Roles sorted by descending position so the most privileged role
/// replays first; that ordering is the replay contract.
async fn serialize_roles(
    ctx: &ServiceContext,
    facts: &GuildFacts,
) -> Result<Vec<Role>, PipelineError> {
    let mut live = ctx.platform.roles(&facts.id).await?;
    live.sort_by_key(|r| Reverse(r.position));
    Ok(live
        .into_iter()
        .map(|r| Role {
            default_role: r.id == facts.everyone_role_id,
            id: r.id,
            name: r.name,
            color: r.color,
            hoist: r.hoist,
            mentionable: r.mentionable,
            position: r.position,
            permissions: r.permissions.to_string(),
        })
        .collect())
}

fn serialize_categories(channels: &[LiveChannel], role_ids: &HashSet<String>) -> Vec<Category> {
    let mut categories: Vec<&LiveChannel> =
        channels.iter().filter(|c| c.kind == LiveChannelKind::Category).collect();
    categories.sort_by_key(|c| c.position);
    categories
        .into_iter()
        .map(|c| Category {
            id: c.id.clone(),
            name: c.name.clone(),
            position: c.position,
            raw_position: c.raw_position,
            perm_locked: false,
            overwrites: role_overwrites(c, role_ids),
        })
        .collect()
}

fn serialize_text_channels(
    channels: &[LiveChannel],
    role_ids: &HashSet<String>,
    facts: &GuildFacts,
) -> Vec<TextChannel> {
    let mut text: Vec<&LiveChannel> =
        channels.iter().filter(|c| c.kind == LiveChannelKind::Text).collect();
    text.sort_by_key(|c| c.raw_position);
    text.into_iter()
        .map(|c| {
            let perm_locked = is_perm_locked(c, channels);
            TextChannel {
                id: c.id.clone(),
                name: c.name.clone(),
                topic: c.topic.clone(),
                nsfw: c.nsfw,
                system_channel: facts.system_channel_id.as_deref() == Some(c.id.as_str()),
                position: c.position,
                raw_position: c.raw_position,
                parent: c.parent_id.clone(),
                perm_locked,
                overwrites: if perm_locked { Vec::new() } else { role_overwrites(c, role_ids) },
            }
        })
        .collect()
}

fn serialize_voice_channels(
    channels: &[LiveChannel],
    role_ids: &HashSet<String>,
    facts: &GuildFacts,
) -> Vec<VoiceChannel> {
    let mut voice: Vec<&LiveChannel> =
        channels.iter().filter(|c| c.kind == LiveChannelKind::Voice).collect();
    voice.sort_by_key(|c| c.raw_position);
    voice
        .into_iter()
        .map(|c| {
            let perm_locked = is_perm_locked(c, channels);
            VoiceChannel {
                id: c.id.clone(),
                name: c.name.clone(),
                bitrate: c.bitrate.unwrap_or(64_000),
                user_limit: c.user_limit.unwrap_or(0),
                rtc_region: c.rtc_region.clone(),
                afk_channel: facts.afk_channel_id.as_deref() == Some(c.id.as_str()),
                position: c.position,
                raw_position: c.raw_position,
                parent: c.parent_id.clone(),
                perm_locked,
                overwrites: if perm_locked { Vec::new() } else { role_overwrites(c, role_ids) },
            }
        })
        .collect()
}

/// Keeps role-type overwrites whose role still exists on the source.
/// Member overwrites and overwrites for deleted roles are dropped.
fn role_overwrites(channel: &LiveChannel, role_ids: &HashSet<String>) -> Vec<PermissionOverwrite> {
    channel
        .overwrites
        .iter()
        .filter(|o| o.kind == OverwriteKind::Role && role_ids.contains(&o.target_id))
        .map(|o| PermissionOverwrite {
            role_id: o.target_id.clone(),
            allow: o.allow.to_string(),
            deny: o.deny.to_string(),
        })
        .collect()
}

/// A channel is permission-locked when it has a parent category and its
/// overwrite set matches the parent's exactly; such channels inherit and
/// no explicit overwrites are serialized.
fn is_perm_locked(channel: &LiveChannel, channels: &[LiveChannel]) -> bool {
    let Some(parent_id) = channel.parent_id.as_deref() else {
        return false;
    };
    let Some(parent) = channels.iter().find(|c| c.id == parent_id) else {
        return false;
    };
    let normalize = |ch: &LiveChannel| {
        let mut set: Vec<(String, OverwriteKind, u64, u64)> = ch
            .overwrites
            .iter()
            .map(|o| (o.target_id.clone(), o.kind, o.allow, o.deny))
            .collect();
        set.sort();
        set
    };
    normalize(channel) == normalize(parent)
}
