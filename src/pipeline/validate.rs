//! Pre-flight validation: everything here runs before any mutation.

use crate::context::ServiceContext;
use crate::error::{PipelineError, ValidationError};
use crate::ports::platform::Permissions;

/// Well-known role name used to discover the admin-marker role when the
/// configured id does not match any role on the target.
pub const FALLBACK_ADMIN_ROLE_NAME: &str = "guildcopy";

/// Outcome of target validation: the admin-marker role id that the rest
/// of the run must use. Differs from the configured id when discovery by
/// name kicked in.
#[derive(Debug, Clone)]
pub struct TargetValidation {
    /// Effective admin-marker role id.
    pub admin_role_id: String,
}

/// Validates the source side: the credential is a bot account, the
/// source guild exists and is available, and ban privileges are present
/// when ban copying is enabled.
///
/// # Errors
///
/// Returns [`PipelineError::Validation`] on any failed check,
/// [`PipelineError::UnavailableGuild`] when the source is flagged
/// unavailable, and [`PipelineError::Remote`] when a fetch fails.
pub async fn validate_source(
    ctx: &ServiceContext,
    source_id: &str,
    copy_bans: bool,
) -> Result<(), PipelineError> {
    let identity = ctx.platform.identity().await?;
    if !identity.is_bot {
        return Err(ValidationError::UserAccountToken.into());
    }

    let facts = ctx
        .platform
        .guild(source_id)
        .await?
        .ok_or_else(|| ValidationError::SourceNotFound(source_id.to_string()))?;
    if !facts.available {
        return Err(PipelineError::UnavailableGuild(source_id.to_string()));
    }

    if copy_bans {
        let membership = ctx.platform.bot_membership(source_id).await?;
        let permissions = Permissions::from_bits_retain(membership.permissions);
        if !permissions.intersects(Permissions::BAN_MEMBERS | Permissions::ADMINISTRATOR) {
            return Err(ValidationError::MissingBanPermission(source_id.to_string()).into());
        }
    }

    Ok(())
}

/// Validates the target side and resolves the admin-marker role.
///
/// Checks, in order: source and target differ, the bot is a member of an
/// available target, an admin-marker role exists (by configured id, or
/// discovered by [`FALLBACK_ADMIN_ROLE_NAME`]), that role carries the
/// administrator permission, it is the single highest role, and the
/// bot's own member record holds it. The highest-role check guarantees
/// every role the creator makes can be positioned below the bot's.
///
/// # Errors
///
/// Returns [`PipelineError::Validation`] on any failed check,
/// [`PipelineError::UnavailableGuild`] when the target is flagged
/// unavailable, and [`PipelineError::Remote`] when a fetch fails.
pub async fn validate_target(
    ctx: &ServiceContext,
    source_id: &str,
    target_id: &str,
    configured_admin_role_id: &str,
) -> Result<TargetValidation, PipelineError> {
    let identity = ctx.platform.identity().await?;
    if !identity.is_bot {
        return Err(ValidationError::UserAccountToken.into());
    }

    if source_id == target_id {
        return Err(ValidationError::IdenticalGuilds.into());
    }

    let facts = ctx
        .platform
        .guild(target_id)
        .await?
        .ok_or_else(|| ValidationError::TargetNotJoined(target_id.to_string()))?;
    if !facts.available {
        return Err(PipelineError::UnavailableGuild(target_id.to_string()));
    }

    let roles = ctx.platform.roles(target_id).await?;
    let admin_role = roles
        .iter()
        .find(|r| r.id == configured_admin_role_id)
        .or_else(|| {
            roles.iter().find(|r| r.name.eq_ignore_ascii_case(FALLBACK_ADMIN_ROLE_NAME))
        })
        .ok_or_else(|| {
            ValidationError::AdminRoleMissing(FALLBACK_ADMIN_ROLE_NAME.to_string())
        })?;

    let permissions = Permissions::from_bits_retain(admin_role.permissions);
    if !permissions.contains(Permissions::ADMINISTRATOR) {
        return Err(ValidationError::AdminRoleNotAdministrator(admin_role.name.clone()).into());
    }

    let is_highest =
        roles.iter().all(|r| r.id == admin_role.id || r.position < admin_role.position);
    if !is_highest {
        return Err(ValidationError::AdminRoleNotHighest(admin_role.name.clone()).into());
    }

    let membership = ctx.platform.bot_membership(target_id).await?;
    if !membership.role_ids.iter().any(|id| id == &admin_role.id) {
        return Err(ValidationError::AdminRoleNotAssigned(admin_role.name.clone()).into());
    }

    Ok(TargetValidation { admin_role_id: admin_role.id.clone() })
}
