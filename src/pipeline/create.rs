//! Creator: replays a snapshot against a blank target guild.
//!
//! Strictly sequential state machine: general, roles, categories, text
//! channels, voice channels, emojis, bans. Each stage only runs when the
//! snapshot has entities of its kind, and each creation loop inserts a
//! fixed inter-call delay to stay inside the platform's rate limits.
//! Any failed creation aborts the run; a half-created guild is surfaced
//! to the operator through the error, never silently cleaned up.

use std::time::Duration;

use crate::context::ServiceContext;
use crate::error::{PipelineError, ValidationError};
use crate::model::Snapshot;
use crate::pipeline::limits::{clamp_bitrate, clamp_user_limit, emoji_quota};
use crate::pipeline::reference::{parse_bitfield, ReferenceMap};
use crate::pipeline::StepTracker;
use crate::ports::platform::{
    CategoryCreate, GuildFacts, GuildUpdate, LiveChannelKind, RoleCreate, TextChannelCreate,
    VoiceChannelCreate,
};
use crate::ports::reporter::MessageKey;

/// Initial sort position for created roles. Keeping it at the bottom
/// prevents fresh roles from landing above the admin-marker role, which
/// would put them out of the bot's reach.
const INITIAL_ROLE_POSITION: i64 = 1;

/// Fixed inter-call delay policy for throttled creation loops.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    delay: Duration,
}

impl Throttle {
    /// Creates a throttle with the given delay in milliseconds.
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self { delay: Duration::from_millis(millis) }
    }

    /// Sleeps for the configured delay.
    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Configuration slice the creator needs.
#[derive(Debug, Clone, Copy)]
pub struct CreateOptions {
    /// Apply guild-wide settings.
    pub copy_general: bool,
    /// Recreate roles, categories, and channels.
    pub copy_structure: bool,
    /// Recreate emojis.
    pub copy_emojis: bool,
    /// Replay the ban list.
    pub copy_bans: bool,
    /// Inter-call delay for throttled loops.
    pub throttle: Throttle,
}

/// Recreates every recorded entity on the target guild and returns the
/// populated reference map.
///
/// # Errors
///
/// Returns [`PipelineError::Remote`] on the first failed creation call,
/// [`PipelineError::Validation`] when the target guild cannot be
/// fetched, and [`PipelineError::Persistence`] when the snapshot holds a
/// malformed bitfield or a dangling parent reference.
pub async fn create_guild(
    ctx: &ServiceContext,
    snapshot: &Snapshot,
    target_id: &str,
    options: CreateOptions,
    steps: StepTracker,
) -> Result<(ReferenceMap, StepTracker), PipelineError> {
    let facts = ctx
        .platform
        .guild(target_id)
        .await?
        .ok_or_else(|| ValidationError::TargetNotJoined(target_id.to_string()))?;

    let mut references = ReferenceMap::new();
    let mut steps = steps;

    if options.copy_general {
        let (step, next) = steps.advance();
        steps = next;
        ctx.reporter.progress(step, MessageKey::SettingGeneral, &[]);
        apply_general(ctx, snapshot, target_id, &facts).await?;
    }

    if options.copy_structure {
        if !snapshot.roles.is_empty() {
            let (step, next) = steps.advance();
            steps = next;
            ctx.reporter.progress(step, MessageKey::CreatingRoles, &[]);
            create_roles(ctx, snapshot, target_id, &facts, &options, step, &mut references)
                .await?;
        }

        if !snapshot.categories.is_empty() {
            let (step, next) = steps.advance();
            steps = next;
            ctx.reporter.progress(step, MessageKey::CreatingCategories, &[]);
            create_categories(ctx, snapshot, target_id, &options, step, &mut references).await?;
        }

        if !snapshot.text_channels.is_empty() {
            let (step, next) = steps.advance();
            steps = next;
            ctx.reporter.progress(step, MessageKey::CreatingTextChannels, &[]);
            create_text_channels(ctx, snapshot, target_id, &options, step, &references).await?;
        }

        if !snapshot.voice_channels.is_empty() {
            let (step, next) = steps.advance();
            steps = next;
            ctx.reporter.progress(step, MessageKey::CreatingVoiceChannels, &[]);
            create_voice_channels(ctx, snapshot, target_id, &facts, &options, step, &references)
                .await?;
        }
    }

    if options.copy_emojis && !snapshot.emojis.is_empty() {
        let (step, next) = steps.advance();
        steps = next;
        ctx.reporter.progress(step, MessageKey::CreatingEmojis, &[]);
        create_emojis(ctx, snapshot, target_id, &facts, &options, step).await?;
    }

    if options.copy_bans && !snapshot.bans.is_empty() {
        let (step, next) = steps.advance();
        steps = next;
        ctx.reporter.progress(step, MessageKey::CreatingBans, &[]);
        create_bans(ctx, snapshot, target_id, &options, step).await?;
    }

    Ok((references, steps))
}

/// Applies name, icon, moderation levels, and the tier-gated splash and
/// banner. Splash needs tier 1, banner tier 2.
async fn apply_general(
    ctx: &ServiceContext,
    snapshot: &Snapshot,
    target_id: &str,
    facts: &GuildFacts,
) -> Result<(), PipelineError> {
    let general = &snapshot.general;
    let update = GuildUpdate {
        name: general.name.clone(),
        icon_url: general.icon.clone(),
        splash_url: if facts.premium_tier >= 1 { general.splash.clone() } else { None },
        banner_url: if facts.premium_tier >= 2 { general.banner.clone() } else { None },
        verification_level: general.verification_level,
        explicit_content_filter: general.explicit_content_filter,
    };
    ctx.platform.update_guild(target_id, update).await?;
    Ok(())
}

/// Creates roles in the snapshot's descending-position order. The
/// everyone entry is never created; its bitfield is applied to the
/// target's own everyone role instead.
async fn create_roles(
    ctx: &ServiceContext,
    snapshot: &Snapshot,
    target_id: &str,
    facts: &GuildFacts,
    options: &CreateOptions,
    step: u64,
    references: &mut ReferenceMap,
) -> Result<(), PipelineError> {
    let mut sub = 0;
    for role in &snapshot.roles {
        let permissions = parse_bitfield(&role.permissions)?;
        sub += 1;
        if role.default_role {
            ctx.reporter.detail(step, sub, MessageKey::UpdatedEveryoneRole, &[]);
            ctx.platform
                .set_role_permissions(target_id, &facts.everyone_role_id, permissions)
                .await?;
            references.insert_role(role.clone(), facts.everyone_role_id.clone());
        } else {
            ctx.reporter.detail(step, sub, MessageKey::CreatingRole, &[&role.name]);
            let new_id = ctx
                .platform
                .create_role(
                    target_id,
                    RoleCreate {
                        name: role.name.clone(),
                        color: role.color,
                        hoist: role.hoist,
                        mentionable: role.mentionable,
                        permissions,
                        position: INITIAL_ROLE_POSITION,
                    },
                )
                .await?;
            references.insert_role(role.clone(), new_id);
        }
        options.throttle.pause().await;
    }
    Ok(())
}

async fn create_categories(
    ctx: &ServiceContext,
    snapshot: &Snapshot,
    target_id: &str,
    options: &CreateOptions,
    step: u64,
    references: &mut ReferenceMap,
) -> Result<(), PipelineError> {
    let mut sub = 0;
    for category in &snapshot.categories {
        sub += 1;
        ctx.reporter.detail(step, sub, MessageKey::CreatingCategory, &[&category.name]);
        let overwrites = references.translate_overwrites(&category.overwrites)?;
        let new_id = ctx
            .platform
            .create_category(
                target_id,
                CategoryCreate { name: category.name.clone(), overwrites },
            )
            .await?;
        references.insert_category(category.clone(), new_id);
        options.throttle.pause().await;
    }
    Ok(())
}

/// Creates text channels, then applies topics in a second pass once
/// every channel exists, then marks the remembered system channel.
async fn create_text_channels(
    ctx: &ServiceContext,
    snapshot: &Snapshot,
    target_id: &str,
    options: &CreateOptions,
    step: u64,
    references: &ReferenceMap,
) -> Result<(), PipelineError> {
    let mut sub = 0;
    let mut pending_topics: Vec<(String, String, String)> = Vec::new();
    let mut system_channel: Option<String> = None;

    for channel in &snapshot.text_channels {
        sub += 1;
        ctx.reporter.detail(step, sub, MessageKey::CreatingTextChannel, &[&channel.name]);
        let parent_id = references.resolve_parent(channel.parent.as_deref())?;
        let overwrites = if channel.perm_locked {
            None
        } else {
            Some(references.translate_overwrites(&channel.overwrites)?)
        };
        let new_id = ctx
            .platform
            .create_text_channel(
                target_id,
                TextChannelCreate {
                    name: channel.name.clone(),
                    nsfw: channel.nsfw,
                    parent_id,
                    overwrites,
                },
            )
            .await?;
        if let Some(topic) = &channel.topic {
            pending_topics.push((new_id.clone(), topic.clone(), channel.name.clone()));
        }
        if channel.system_channel {
            system_channel = Some(new_id);
        }
        options.throttle.pause().await;
    }

    for (channel_id, topic, name) in pending_topics {
        sub += 1;
        ctx.reporter.detail(step, sub, MessageKey::SettingTopic, &[&name]);
        ctx.platform.set_topic(&channel_id, &topic).await?;
        options.throttle.pause().await;
    }

    if let Some(channel_id) = system_channel {
        sub += 1;
        ctx.reporter.detail(step, sub, MessageKey::SystemChannelSet, &[&channel_id]);
        ctx.platform
            .set_system_channel(target_id, &channel_id, snapshot.general.system_channel_flags)
            .await?;
    }

    Ok(())
}

/// Creates voice channels with tier-clamped bitrate and user limit,
/// then configures the AFK channel and timeout. The timeout is applied
/// even when no AFK channel was recorded.
async fn create_voice_channels(
    ctx: &ServiceContext,
    snapshot: &Snapshot,
    target_id: &str,
    facts: &GuildFacts,
    options: &CreateOptions,
    step: u64,
    references: &ReferenceMap,
) -> Result<(), PipelineError> {
    let mut sub = 0;
    let mut afk_channel: Option<String> = None;

    for channel in &snapshot.voice_channels {
        sub += 1;
        ctx.reporter.detail(step, sub, MessageKey::CreatingVoiceChannel, &[&channel.name]);
        let parent_id = references.resolve_parent(channel.parent.as_deref())?;
        let overwrites = if channel.perm_locked {
            None
        } else {
            Some(references.translate_overwrites(&channel.overwrites)?)
        };
        let new_id = ctx
            .platform
            .create_voice_channel(
                target_id,
                VoiceChannelCreate {
                    name: channel.name.clone(),
                    bitrate: clamp_bitrate(channel.bitrate, facts.premium_tier),
                    user_limit: clamp_user_limit(channel.user_limit),
                    rtc_region: channel.rtc_region.clone(),
                    parent_id,
                    overwrites,
                },
            )
            .await?;
        if channel.afk_channel {
            afk_channel = Some(new_id);
        }
        options.throttle.pause().await;
    }

    sub += 1;
    ctx.reporter.detail(step, sub, MessageKey::AfkConfigured, &[]);
    ctx.platform
        .set_afk(target_id, afk_channel.as_deref(), snapshot.general.afk_timeout)
        .await?;

    Ok(())
}

/// Creates emojis, normal before animated, each subset truncated to the
/// target tier's quota.
async fn create_emojis(
    ctx: &ServiceContext,
    snapshot: &Snapshot,
    target_id: &str,
    facts: &GuildFacts,
    options: &CreateOptions,
    step: u64,
) -> Result<(), PipelineError> {
    let quota = emoji_quota(facts.premium_tier);
    let normal = snapshot.emojis.iter().filter(|e| !e.animated).take(quota);
    let animated = snapshot.emojis.iter().filter(|e| e.animated).take(quota);

    let mut sub = 0;
    for emoji in normal.chain(animated) {
        sub += 1;
        ctx.reporter.detail(step, sub, MessageKey::CreatingEmoji, &[&emoji.name]);
        ctx.platform.create_emoji(target_id, &emoji.name, &emoji.url).await?;
        options.throttle.pause().await;
    }
    Ok(())
}

async fn create_bans(
    ctx: &ServiceContext,
    snapshot: &Snapshot,
    target_id: &str,
    options: &CreateOptions,
    step: u64,
) -> Result<(), PipelineError> {
    let mut sub = 0;
    for ban in &snapshot.bans {
        sub += 1;
        ctx.reporter.detail(step, sub, MessageKey::BanningUser, &[&ban.user_id]);
        ctx.platform.ban(target_id, &ban.user_id, ban.reason.as_deref()).await?;
        options.throttle.pause().await;
    }
    Ok(())
}

/// Posts the completion announcement into the target's first text
/// channel, naming the admin-marker role the operator must now delete,
/// with invite links for every bot member of the source guild. The
/// invite list is best-effort: when the source guild is no longer
/// reachable it is skipped without failing the run. Without any text
/// channel the announcement degrades to a progress message.
///
/// # Errors
///
/// Returns [`PipelineError::Remote`] when the target cannot be listed or
/// the announcement cannot be posted.
pub async fn finalize(
    ctx: &ServiceContext,
    source_id: &str,
    target_id: &str,
    admin_role_id: &str,
    steps: StepTracker,
) -> Result<StepTracker, PipelineError> {
    let roles = ctx.platform.roles(target_id).await?;
    let admin_role_name = roles
        .iter()
        .find(|r| r.id == admin_role_id)
        .map_or_else(|| admin_role_id.to_string(), |r| r.name.clone());

    let mut content = format!(
        "@everyone Guild copy finished! The last thing to do is to delete the role `{admin_role_name}`."
    );
    match ctx.platform.members(source_id).await {
        Ok(members) => {
            let bots: Vec<_> = members.into_iter().filter(|m| m.bot).collect();
            if !bots.is_empty() {
                content.push_str("\nBots from the original guild can be re-invited:");
                for bot in bots {
                    content.push_str(&format!(
                        "\n{}: https://discord.com/oauth2/authorize?client_id={}&scope=bot",
                        bot.username, bot.user_id
                    ));
                }
            }
        }
        Err(err) => {
            tracing::debug!("skipping bot invite list, source guild not reachable: {err}");
        }
    }

    let channels = ctx.platform.channels(target_id).await?;
    let announce_channel = channels
        .iter()
        .filter(|c| c.kind == LiveChannelKind::Text)
        .min_by_key(|c| c.raw_position);

    let (step, steps) = steps.advance();
    match announce_channel {
        Some(channel) => {
            ctx.platform.send_message(&channel.id, &content).await?;
            ctx.reporter.progress(step, MessageKey::CopyFinishedPosted, &[&admin_role_name]);
        }
        None => {
            ctx.reporter.progress(step, MessageKey::CopyFinishedNoChannel, &[&admin_role_name]);
        }
    }
    Ok(steps)
}
