//! Cleaner: empties the target guild before reconstruction.
//!
//! Deletion order is fixed: channels, roles, emojis, bans. Channels go
//! first because their permission overwrites reference roles. Within a
//! category the deletions run as one concurrent batch and the step waits
//! for the whole batch; one failed deletion fails the step.

use futures_util::future::try_join_all;

use crate::context::ServiceContext;
use crate::error::{PipelineError, ValidationError};
use crate::pipeline::StepTracker;
use crate::ports::reporter::MessageKey;

/// Which optional cleanup categories run.
#[derive(Debug, Clone, Copy)]
pub struct CleanOptions {
    /// Also delete all emojis.
    pub clear_emojis: bool,
    /// Also lift all existing bans.
    pub clear_bans: bool,
}

/// Removes all channels, all roles except the admin-marker role and the
/// implicit everyone role, and optionally all emojis and bans.
///
/// # Errors
///
/// Returns [`PipelineError::Remote`] when any deletion fails, or
/// [`PipelineError::Validation`] when the target guild cannot be
/// fetched.
pub async fn clean_guild(
    ctx: &ServiceContext,
    target_id: &str,
    admin_role_id: &str,
    options: CleanOptions,
    steps: StepTracker,
) -> Result<StepTracker, PipelineError> {
    let facts = ctx
        .platform
        .guild(target_id)
        .await?
        .ok_or_else(|| ValidationError::TargetNotJoined(target_id.to_string()))?;

    let (step, steps) = steps.advance();
    ctx.reporter.progress(step, MessageKey::DeletingChannels, &[]);
    let channels = ctx.platform.channels(target_id).await?;
    try_join_all(channels.iter().map(|c| ctx.platform.delete_channel(&c.id))).await?;

    let (step, steps) = steps.advance();
    ctx.reporter.progress(step, MessageKey::DeletingRoles, &[]);
    let roles = ctx.platform.roles(target_id).await?;
    try_join_all(
        roles
            .iter()
            .filter(|r| r.id != admin_role_id && r.id != facts.everyone_role_id)
            .map(|r| ctx.platform.delete_role(target_id, &r.id)),
    )
    .await?;

    let mut steps = steps;
    if options.clear_emojis {
        let (step, next) = steps.advance();
        steps = next;
        ctx.reporter.progress(step, MessageKey::DeletingEmojis, &[]);
        let emojis = ctx.platform.emojis(target_id).await?;
        try_join_all(emojis.iter().map(|e| ctx.platform.delete_emoji(target_id, &e.id))).await?;
    }

    if options.clear_bans {
        let (step, next) = steps.advance();
        steps = next;
        ctx.reporter.progress(step, MessageKey::LiftingBans, &[]);
        let bans = ctx.platform.bans(target_id).await?;
        try_join_all(bans.iter().map(|b| ctx.platform.unban(target_id, &b.user_id))).await?;
    }

    let (step, steps) = steps.advance();
    ctx.reporter.progress(step, MessageKey::CleanupFinished, &[]);
    Ok(steps)
}
