//! The guild-copy pipeline: validate, serialize, clean, create,
//! finalize.
//!
//! Stages run strictly in sequence and communicate through values: the
//! snapshot, the reference map, and the step tracker below. The
//! controller in this module is the only place that selects stages per
//! mode and the only broad catch point for reporting.

pub mod clean;
pub mod create;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod limits;
pub mod reference;
pub mod serialize;
pub mod validate;

use std::path::Path;

use crate::context::ServiceContext;
use crate::error::PipelineError;
use crate::ports::platform::LiveBan;
use crate::ports::reporter::MessageKey;
use crate::settings::Settings;
use crate::store::SnapshotStore;

pub use clean::{clean_guild, CleanOptions};
pub use create::{create_guild, finalize, CreateOptions, Throttle};
pub use reference::ReferenceMap;
pub use serialize::serialize_guild;
pub use validate::{validate_source, validate_target, TargetValidation};

/// Progress counter for the numbered operator output.
///
/// A plain value: each stage receives a tracker, returns the advanced
/// one, and the number printed with each message falls out of
/// [`StepTracker::advance`]. No shared mutable state.
#[derive(Debug, Clone, Copy)]
pub struct StepTracker {
    next: u64,
}

impl StepTracker {
    /// Starts counting at step 1.
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Returns the current step number and the tracker for the next one.
    #[must_use]
    pub fn advance(self) -> (u64, Self) {
        (self.next, Self { next: self.next + 1 })
    }
}

impl Default for StepTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Which linear path through the pipeline a run takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Serialize the source guild and stop.
    Backup,
    /// Rebuild the target from a persisted snapshot.
    Restore,
    /// Serialize the source live and rebuild the target from it.
    Clone,
}

/// Runs one full pipeline pass in the selected mode.
///
/// # Errors
///
/// Propagates the first error of any stage; see [`PipelineError`] for
/// the taxonomy. Nothing on the target is mutated unless validation
/// passed and the snapshot (loaded or freshly captured) is safely in
/// hand.
pub async fn execute(
    ctx: &ServiceContext,
    settings: &Settings,
    mode: Mode,
    snapshot_path: &Path,
) -> Result<(), PipelineError> {
    let steps = StepTracker::new();

    match mode {
        Mode::Backup => {
            validate_source(ctx, &settings.source_guild_id, settings.copy_bans).await?;
            let bans = fetch_bans(ctx, settings).await?;
            let (_, steps) =
                serialize_guild(ctx, &settings.source_guild_id, bans, snapshot_path, steps)
                    .await?;
            finish(ctx, steps);
            Ok(())
        }
        Mode::Restore => {
            let snapshot = SnapshotStore::new(ctx).load(snapshot_path)?;
            let (step, steps) = steps.advance();
            let path_display = snapshot_path.display().to_string();
            ctx.reporter.progress(step, MessageKey::SnapshotLoaded, &[&path_display]);

            let validation = validate_target(
                ctx,
                &settings.source_guild_id,
                &settings.target_guild_id,
                &settings.admin_role_id,
            )
            .await?;
            let steps = rebuild(ctx, settings, &snapshot, &validation, steps).await?;
            finish(ctx, steps);
            Ok(())
        }
        Mode::Clone => {
            validate_source(ctx, &settings.source_guild_id, settings.copy_bans).await?;
            let validation = validate_target(
                ctx,
                &settings.source_guild_id,
                &settings.target_guild_id,
                &settings.admin_role_id,
            )
            .await?;

            let bans = fetch_bans(ctx, settings).await?;
            let (snapshot, steps) =
                serialize_guild(ctx, &settings.source_guild_id, bans, snapshot_path, steps)
                    .await?;
            let steps = rebuild(ctx, settings, &snapshot, &validation, steps).await?;
            finish(ctx, steps);
            Ok(())
        }
    }
}

/// The shared clean → create → finalize tail of restore and clone.
async fn rebuild(
    ctx: &ServiceContext,
    settings: &Settings,
    snapshot: &crate::model::Snapshot,
    validation: &TargetValidation,
    steps: StepTracker,
) -> Result<StepTracker, PipelineError> {
    let steps = clean_guild(
        ctx,
        &settings.target_guild_id,
        &validation.admin_role_id,
        CleanOptions { clear_emojis: settings.copy_emojis, clear_bans: settings.copy_bans },
        steps,
    )
    .await?;

    let (_references, steps) = create_guild(
        ctx,
        snapshot,
        &settings.target_guild_id,
        CreateOptions {
            copy_general: settings.copy_general,
            copy_structure: settings.copy_structure,
            copy_emojis: settings.copy_emojis,
            copy_bans: settings.copy_bans,
            throttle: Throttle::from_millis(settings.throttle_ms),
        },
        steps,
    )
    .await?;

    finalize(
        ctx,
        &settings.source_guild_id,
        &settings.target_guild_id,
        &validation.admin_role_id,
        steps,
    )
    .await
}

async fn fetch_bans(
    ctx: &ServiceContext,
    settings: &Settings,
) -> Result<Option<Vec<LiveBan>>, PipelineError> {
    if settings.copy_bans {
        Ok(Some(ctx.platform.bans(&settings.source_guild_id).await?))
    } else {
        Ok(None)
    }
}

fn finish(ctx: &ServiceContext, steps: StepTracker) {
    let (step, _) = steps.advance();
    ctx.reporter.progress(step, MessageKey::Done, &[]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::pipeline::fixtures::{
        category_channel, facts, role, test_context, text_channel, MockPlatform,
    };
    use crate::ports::platform::{BotMembership, LiveOverwrite, OverwriteKind, Permissions};

    /// Source guild per the end-to-end scenario: an everyone role, a
    /// "Mods" role with ADMINISTRATOR, one category, one text channel
    /// under it carrying a topic.
    fn scenario_platform() -> MockPlatform {
        let mut platform = MockPlatform::default();

        let mut source = facts("src");
        source.everyone_role_id = "everyone".into();
        platform.add_guild(source);
        platform.set_roles(
            "src",
            vec![
                role("everyone", "@everyone", 0, 104_324_673),
                role("mods", "Mods", 1, Permissions::ADMINISTRATOR.bits()),
            ],
        );
        let mut cat = category_channel("c1", "General", 0);
        cat.overwrites = vec![LiveOverwrite {
            target_id: "mods".into(),
            kind: OverwriteKind::Role,
            allow: 1024,
            deny: 0,
        }];
        let mut chat = text_channel("t1", "chat", 1, Some("c1"));
        chat.topic = Some("general chatter".into());
        platform.set_channels("src", vec![cat, chat]);

        let mut target = facts("tgt");
        target.everyone_role_id = "t-everyone".into();
        platform.add_guild(target);
        platform.set_roles(
            "tgt",
            vec![
                role("t-everyone", "@everyone", 0, 0),
                role("admin", "guildcopy", 1, Permissions::ADMINISTRATOR.bits()),
            ],
        );
        platform.set_membership(
            "tgt",
            BotMembership { role_ids: vec!["admin".into()], permissions: 8 },
        );
        platform
    }

    fn scenario_settings() -> Settings {
        Settings {
            source_guild_id: "src".into(),
            target_guild_id: "tgt".into(),
            admin_role_id: "admin".into(),
            throttle_ms: 0,
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn clone_scenario_rebuilds_the_target_with_remapped_references() {
        let platform = scenario_platform();
        let probe = platform.clone();
        let ctx = test_context(platform);
        let settings = scenario_settings();
        let path = std::path::Path::new("guildData.json");

        // Drive the stages directly so the reference map is observable.
        validate_source(&ctx, "src", false).await.unwrap();
        let validation = validate_target(&ctx, "src", "tgt", "admin").await.unwrap();
        let (snapshot, steps) =
            serialize_guild(&ctx, "src", None, path, StepTracker::new()).await.unwrap();
        let steps = clean_guild(
            &ctx,
            "tgt",
            &validation.admin_role_id,
            CleanOptions { clear_emojis: false, clear_bans: false },
            steps,
        )
        .await
        .unwrap();
        let (references, steps) = create_guild(
            &ctx,
            &snapshot,
            "tgt",
            CreateOptions {
                copy_general: settings.copy_general,
                copy_structure: settings.copy_structure,
                copy_emojis: false,
                copy_bans: false,
                throttle: Throttle::from_millis(0),
            },
            steps,
        )
        .await
        .unwrap();
        finalize(&ctx, "src", "tgt", &validation.admin_role_id, steps).await.unwrap();

        // Exactly two role entries (everyone remapped, Mods created)
        // and one category entry.
        assert_eq!(references.role_count(), 2);
        assert_eq!(references.category_count(), 1);
        assert_eq!(references.role("everyone").unwrap().new_id, "t-everyone");

        // The recreated text channel hangs under the recreated
        // category, and its topic was set strictly after creation.
        let new_category_id = references.category("c1").unwrap().new_id.clone();
        let channels = probe.channels_of("tgt");
        let chat = channels.iter().find(|c| c.name == "chat").unwrap();
        assert_eq!(chat.parent_id.as_deref(), Some(new_category_id.as_str()));
        assert_eq!(chat.topic.as_deref(), Some("general chatter"));
        let created = probe.call_index("create_text_channel:chat").unwrap();
        let topic_set = probe.call_index("set_topic").unwrap();
        assert!(topic_set > created);
    }

    #[tokio::test]
    async fn identical_guilds_abort_before_any_mutation() {
        let platform = scenario_platform();
        let probe = platform.clone();
        let ctx = test_context(platform);
        let mut settings = scenario_settings();
        settings.target_guild_id = "src".into();

        let err = execute(&ctx, &settings, Mode::Clone, std::path::Path::new("guildData.json"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation(ValidationError::IdenticalGuilds)
        ));
        // The mock records mutations only; zero means the target was
        // never touched.
        assert!(probe.recorded_calls().is_empty());
    }

    #[tokio::test]
    async fn backup_mode_serializes_and_stops() {
        let platform = scenario_platform();
        let probe = platform.clone();
        let ctx = test_context(platform);
        let settings = scenario_settings();
        let path = std::path::Path::new("backup.json");

        execute(&ctx, &settings, Mode::Backup, path).await.unwrap();

        assert!(ctx.fs.exists(path));
        assert!(probe.recorded_calls().is_empty());
    }

    #[tokio::test]
    async fn restore_without_a_snapshot_file_fails_up_front() {
        let platform = scenario_platform();
        let probe = platform.clone();
        let ctx = test_context(platform);
        let settings = scenario_settings();

        let err = execute(&ctx, &settings, Mode::Restore, std::path::Path::new("missing.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::MissingBackup(_)));
        assert!(probe.recorded_calls().is_empty());
    }

    #[tokio::test]
    async fn clone_mode_end_to_end_via_the_controller() {
        let platform = scenario_platform();
        let probe = platform.clone();
        let ctx = test_context(platform);
        let settings = scenario_settings();
        let path = std::path::Path::new("guildData.json");

        execute(&ctx, &settings, Mode::Clone, path).await.unwrap();

        // Snapshot persisted before the target was touched.
        assert!(ctx.fs.exists(path));
        // The old target structure is gone and the copy exists.
        let channels = probe.channels_of("tgt");
        assert!(channels.iter().any(|c| c.name == "General"));
        assert!(channels.iter().any(|c| c.name == "chat"));
        // Completion announcement went to the recreated text channel.
        assert!(probe.call_index("send_message").is_some());
    }

    #[test]
    fn step_tracker_counts_as_a_value() {
        let steps = StepTracker::new();
        let (first, steps) = steps.advance();
        let (second, _) = steps.advance();
        assert_eq!((first, second), (1, 2));
    }
}
