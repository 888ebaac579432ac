//! In-memory port fakes shared by the pipeline unit tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::context::ServiceContext;
use crate::ports::filesystem::FileSystem;
use crate::ports::platform::{
    BotIdentity, BotMembership, CategoryCreate, ChatPlatform, GuildFacts, GuildUpdate, LiveBan,
    LiveChannel, LiveChannelKind, LiveEmoji, LiveMember, LiveRole, PlatformFuture, RemoteError,
    RoleCreate, TextChannelCreate, VoiceChannelCreate,
};
use crate::ports::reporter::{MessageKey, Reporter};

/// Mutable world state behind the mock platform.
#[derive(Debug, Default)]
pub struct MockState {
    pub guilds: HashMap<String, GuildFacts>,
    pub roles: HashMap<String, Vec<LiveRole>>,
    pub channels: HashMap<String, Vec<LiveChannel>>,
    pub emojis: HashMap<String, Vec<LiveEmoji>>,
    pub ban_lists: HashMap<String, Vec<LiveBan>>,
    pub member_lists: HashMap<String, Vec<LiveMember>>,
    pub memberships: HashMap<String, BotMembership>,
    pub identity: Option<BotIdentity>,
    counter: u64,
}

impl MockState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{prefix}-{}", self.counter)
    }
}

/// Scripted platform fake. Reads serve configured state; mutations
/// update it and append an entry to `calls`, so tests can assert both
/// the resulting world and the exact call order. Cloning shares the
/// underlying state, which lets a test keep a probe handle after the
/// platform moves into a context.
#[derive(Clone, Default)]
pub struct MockPlatform {
    /// Shared world state.
    pub state: Arc<Mutex<MockState>>,
    /// Every mutation call, in issue order, formatted `op:detail`.
    pub calls: Arc<Mutex<Vec<String>>>,
    /// When set, any call whose operation name matches fails.
    pub fail_op: Option<String>,
}

impl MockPlatform {
    pub fn add_guild(&mut self, facts: GuildFacts) {
        let mut state = self.state.lock().unwrap();
        state.guilds.insert(facts.id.clone(), facts);
    }

    pub fn set_roles(&mut self, guild_id: &str, roles: Vec<LiveRole>) {
        self.state.lock().unwrap().roles.insert(guild_id.to_string(), roles);
    }

    pub fn set_channels(&mut self, guild_id: &str, channels: Vec<LiveChannel>) {
        self.state.lock().unwrap().channels.insert(guild_id.to_string(), channels);
    }

    pub fn set_emojis(&mut self, guild_id: &str, emojis: Vec<LiveEmoji>) {
        self.state.lock().unwrap().emojis.insert(guild_id.to_string(), emojis);
    }

    pub fn set_bans(&mut self, guild_id: &str, bans: Vec<LiveBan>) {
        self.state.lock().unwrap().ban_lists.insert(guild_id.to_string(), bans);
    }

    pub fn set_members(&mut self, guild_id: &str, members: Vec<LiveMember>) {
        self.state.lock().unwrap().member_lists.insert(guild_id.to_string(), members);
    }

    pub fn set_membership(&mut self, guild_id: &str, membership: BotMembership) {
        self.state.lock().unwrap().memberships.insert(guild_id.to_string(), membership);
    }

    pub fn set_identity(&mut self, identity: BotIdentity) {
        self.state.lock().unwrap().identity = Some(identity);
    }

    /// Channels currently present on a guild.
    pub fn channels_of(&self, guild_id: &str) -> Vec<LiveChannel> {
        self.state.lock().unwrap().channels.get(guild_id).cloned().unwrap_or_default()
    }

    /// Roles currently present on a guild.
    pub fn roles_of(&self, guild_id: &str) -> Vec<LiveRole> {
        self.state.lock().unwrap().roles.get(guild_id).cloned().unwrap_or_default()
    }

    /// Snapshot of the recorded mutation calls.
    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Index of the first recorded call starting with `prefix`.
    pub fn call_index(&self, prefix: &str) -> Option<usize> {
        self.calls.lock().unwrap().iter().position(|c| c.starts_with(prefix))
    }

    fn check(&self, operation: &str) -> Result<(), RemoteError> {
        match &self.fail_op {
            Some(op) if op == operation => {
                Err(RemoteError::new(operation, "scripted failure"))
            }
            _ => Ok(()),
        }
    }

    fn record(&self, entry: String) {
        self.calls.lock().unwrap().push(entry);
    }

    fn ready<T: Send + 'static>(value: Result<T, RemoteError>) -> PlatformFuture<'static, T> {
        Box::pin(async move { value })
    }
}

impl ChatPlatform for MockPlatform {
    fn identity(&self) -> PlatformFuture<'_, BotIdentity> {
        let result = self.check("identity").map(|()| {
            self.state.lock().unwrap().identity.clone().unwrap_or(BotIdentity {
                user_id: "bot-user".to_string(),
                is_bot: true,
            })
        });
        Self::ready(result)
    }

    fn guild(&self, guild_id: &str) -> PlatformFuture<'_, Option<GuildFacts>> {
        let result = self
            .check("guild")
            .map(|()| self.state.lock().unwrap().guilds.get(guild_id).cloned());
        Self::ready(result)
    }

    fn roles(&self, guild_id: &str) -> PlatformFuture<'_, Vec<LiveRole>> {
        let result = self
            .check("roles")
            .map(|()| self.state.lock().unwrap().roles.get(guild_id).cloned().unwrap_or_default());
        Self::ready(result)
    }

    fn channels(&self, guild_id: &str) -> PlatformFuture<'_, Vec<LiveChannel>> {
        let result = self.check("channels").map(|()| {
            self.state.lock().unwrap().channels.get(guild_id).cloned().unwrap_or_default()
        });
        Self::ready(result)
    }

    fn emojis(&self, guild_id: &str) -> PlatformFuture<'_, Vec<LiveEmoji>> {
        let result = self
            .check("emojis")
            .map(|()| self.state.lock().unwrap().emojis.get(guild_id).cloned().unwrap_or_default());
        Self::ready(result)
    }

    fn bans(&self, guild_id: &str) -> PlatformFuture<'_, Vec<LiveBan>> {
        let result = self.check("bans").map(|()| {
            self.state.lock().unwrap().ban_lists.get(guild_id).cloned().unwrap_or_default()
        });
        Self::ready(result)
    }

    fn members(&self, guild_id: &str) -> PlatformFuture<'_, Vec<LiveMember>> {
        let result = self.check("members").map(|()| {
            self.state.lock().unwrap().member_lists.get(guild_id).cloned().unwrap_or_default()
        });
        Self::ready(result)
    }

    fn bot_membership(&self, guild_id: &str) -> PlatformFuture<'_, BotMembership> {
        let result = self.check("bot_membership").map(|()| {
            self.state
                .lock()
                .unwrap()
                .memberships
                .get(guild_id)
                .cloned()
                .unwrap_or(BotMembership { role_ids: Vec::new(), permissions: 0 })
        });
        Self::ready(result)
    }

    fn update_guild(&self, guild_id: &str, update: GuildUpdate) -> PlatformFuture<'_, ()> {
        let result = self.check("update_guild").map(|()| {
            self.record(format!("update_guild:{}", update.name));
            if let Some(facts) = self.state.lock().unwrap().guilds.get_mut(guild_id) {
                facts.name.clone_from(&update.name);
                facts.verification_level = update.verification_level;
                facts.explicit_content_filter = update.explicit_content_filter;
            }
        });
        Self::ready(result)
    }

    fn create_role(&self, guild_id: &str, role: RoleCreate) -> PlatformFuture<'_, String> {
        let result = self.check("create_role").map(|()| {
            self.record(format!("create_role:{}", role.name));
            let mut state = self.state.lock().unwrap();
            let id = state.next_id("role");
            state.roles.entry(guild_id.to_string()).or_default().push(LiveRole {
                id: id.clone(),
                name: role.name,
                color: role.color,
                hoist: role.hoist,
                mentionable: role.mentionable,
                position: role.position,
                permissions: role.permissions,
            });
            id
        });
        Self::ready(result)
    }

    fn set_role_permissions(
        &self,
        guild_id: &str,
        role_id: &str,
        permissions: u64,
    ) -> PlatformFuture<'_, ()> {
        let result = self.check("set_role_permissions").map(|()| {
            self.record(format!("set_role_permissions:{role_id}={permissions}"));
            let mut state = self.state.lock().unwrap();
            if let Some(roles) = state.roles.get_mut(guild_id) {
                if let Some(role) = roles.iter_mut().find(|r| r.id == role_id) {
                    role.permissions = permissions;
                }
            }
        });
        Self::ready(result)
    }

    fn create_category(
        &self,
        guild_id: &str,
        category: CategoryCreate,
    ) -> PlatformFuture<'_, String> {
        let result = self.check("create_category").map(|()| {
            self.record(format!(
                "create_category:{}(overwrites={})",
                category.name,
                category.overwrites.len()
            ));
            let mut state = self.state.lock().unwrap();
            let id = state.next_id("cat");
            let raw_position =
                i64::try_from(state.channels.get(guild_id).map_or(0, Vec::len)).unwrap_or(0);
            state.channels.entry(guild_id.to_string()).or_default().push(LiveChannel {
                id: id.clone(),
                kind: LiveChannelKind::Category,
                name: category.name,
                position: raw_position,
                raw_position,
                parent_id: None,
                topic: None,
                nsfw: false,
                bitrate: None,
                user_limit: None,
                rtc_region: None,
                overwrites: Vec::new(),
            });
            id
        });
        Self::ready(result)
    }

    fn create_text_channel(
        &self,
        guild_id: &str,
        channel: TextChannelCreate,
    ) -> PlatformFuture<'_, String> {
        let result = self.check("create_text_channel").map(|()| {
            self.record(format!("create_text_channel:{}", channel.name));
            let mut state = self.state.lock().unwrap();
            let id = state.next_id("text");
            let raw_position =
                i64::try_from(state.channels.get(guild_id).map_or(0, Vec::len)).unwrap_or(0);
            state.channels.entry(guild_id.to_string()).or_default().push(LiveChannel {
                id: id.clone(),
                kind: LiveChannelKind::Text,
                name: channel.name,
                position: raw_position,
                raw_position,
                parent_id: channel.parent_id,
                topic: None,
                nsfw: channel.nsfw,
                bitrate: None,
                user_limit: None,
                rtc_region: None,
                overwrites: Vec::new(),
            });
            id
        });
        Self::ready(result)
    }

    fn create_voice_channel(
        &self,
        guild_id: &str,
        channel: VoiceChannelCreate,
    ) -> PlatformFuture<'_, String> {
        let result = self.check("create_voice_channel").map(|()| {
            self.record(format!(
                "create_voice_channel:{}(bitrate={},limit={})",
                channel.name, channel.bitrate, channel.user_limit
            ));
            let mut state = self.state.lock().unwrap();
            let id = state.next_id("voice");
            let raw_position =
                i64::try_from(state.channels.get(guild_id).map_or(0, Vec::len)).unwrap_or(0);
            state.channels.entry(guild_id.to_string()).or_default().push(LiveChannel {
                id: id.clone(),
                kind: LiveChannelKind::Voice,
                name: channel.name,
                position: raw_position,
                raw_position,
                parent_id: channel.parent_id,
                topic: None,
                nsfw: false,
                bitrate: Some(channel.bitrate),
                user_limit: Some(i64::from(channel.user_limit)),
                rtc_region: channel.rtc_region,
                overwrites: Vec::new(),
            });
            id
        });
        Self::ready(result)
    }

    fn set_topic(&self, channel_id: &str, topic: &str) -> PlatformFuture<'_, ()> {
        let result = self.check("set_topic").map(|()| {
            self.record(format!("set_topic:{channel_id}={topic}"));
            let mut state = self.state.lock().unwrap();
            for channels in state.channels.values_mut() {
                if let Some(channel) = channels.iter_mut().find(|c| c.id == channel_id) {
                    channel.topic = Some(topic.to_string());
                }
            }
        });
        Self::ready(result)
    }

    fn set_system_channel(
        &self,
        guild_id: &str,
        channel_id: &str,
        flags: u64,
    ) -> PlatformFuture<'_, ()> {
        let result = self.check("set_system_channel").map(|()| {
            self.record(format!("set_system_channel:{channel_id}(flags={flags})"));
            if let Some(facts) = self.state.lock().unwrap().guilds.get_mut(guild_id) {
                facts.system_channel_id = Some(channel_id.to_string());
                facts.system_channel_flags = flags;
            }
        });
        Self::ready(result)
    }

    fn set_afk(
        &self,
        guild_id: &str,
        channel_id: Option<&str>,
        timeout: u32,
    ) -> PlatformFuture<'_, ()> {
        let result = self.check("set_afk").map(|()| {
            self.record(format!(
                "set_afk:{}@{timeout}",
                channel_id.unwrap_or("none")
            ));
            if let Some(facts) = self.state.lock().unwrap().guilds.get_mut(guild_id) {
                facts.afk_channel_id = channel_id.map(String::from);
                facts.afk_timeout = timeout;
            }
        });
        Self::ready(result)
    }

    fn create_emoji(
        &self,
        guild_id: &str,
        name: &str,
        image_url: &str,
    ) -> PlatformFuture<'_, ()> {
        let result = self.check("create_emoji").map(|()| {
            self.record(format!("create_emoji:{name}"));
            let mut state = self.state.lock().unwrap();
            let id = state.next_id("emoji");
            state.emojis.entry(guild_id.to_string()).or_default().push(LiveEmoji {
                id,
                name: name.to_string(),
                url: image_url.to_string(),
                animated: image_url.ends_with(".gif"),
            });
        });
        Self::ready(result)
    }

    fn delete_channel(&self, channel_id: &str) -> PlatformFuture<'_, ()> {
        let result = self.check("delete_channel").map(|()| {
            self.record(format!("delete_channel:{channel_id}"));
            let mut state = self.state.lock().unwrap();
            for channels in state.channels.values_mut() {
                channels.retain(|c| c.id != channel_id);
            }
        });
        Self::ready(result)
    }

    fn delete_role(&self, guild_id: &str, role_id: &str) -> PlatformFuture<'_, ()> {
        let result = self.check("delete_role").map(|()| {
            self.record(format!("delete_role:{role_id}"));
            let mut state = self.state.lock().unwrap();
            if let Some(roles) = state.roles.get_mut(guild_id) {
                roles.retain(|r| r.id != role_id);
            }
        });
        Self::ready(result)
    }

    fn delete_emoji(&self, guild_id: &str, emoji_id: &str) -> PlatformFuture<'_, ()> {
        let result = self.check("delete_emoji").map(|()| {
            self.record(format!("delete_emoji:{emoji_id}"));
            let mut state = self.state.lock().unwrap();
            if let Some(emojis) = state.emojis.get_mut(guild_id) {
                emojis.retain(|e| e.id != emoji_id);
            }
        });
        Self::ready(result)
    }

    fn ban(
        &self,
        guild_id: &str,
        user_id: &str,
        reason: Option<&str>,
    ) -> PlatformFuture<'_, ()> {
        let result = self.check("ban").map(|()| {
            self.record(format!("ban:{user_id}({})", reason.unwrap_or("-")));
            let mut state = self.state.lock().unwrap();
            state.ban_lists.entry(guild_id.to_string()).or_default().push(LiveBan {
                user_id: user_id.to_string(),
                reason: reason.map(String::from),
            });
        });
        Self::ready(result)
    }

    fn unban(&self, guild_id: &str, user_id: &str) -> PlatformFuture<'_, ()> {
        let result = self.check("unban").map(|()| {
            self.record(format!("unban:{user_id}"));
            let mut state = self.state.lock().unwrap();
            if let Some(bans) = state.ban_lists.get_mut(guild_id) {
                bans.retain(|b| b.user_id != user_id);
            }
        });
        Self::ready(result)
    }

    fn send_message(&self, channel_id: &str, content: &str) -> PlatformFuture<'_, ()> {
        let result = self.check("send_message").map(|()| {
            self.record(format!("send_message:{channel_id}:{content}"));
        });
        Self::ready(result)
    }
}

/// In-memory filesystem fake.
#[derive(Default)]
pub struct MemFs {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl FileSystem for MemFs {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| format!("file not found: {}", path.display()).into())
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.files.lock().unwrap().insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }
}

/// Reporter fake collecting every emitted line.
#[derive(Clone, Default)]
pub struct CollectingReporter {
    /// Formatted lines, `step:key` or `step.sub:key`.
    pub lines: Arc<Mutex<Vec<String>>>,
}

impl Reporter for CollectingReporter {
    fn progress(&self, step: u64, key: MessageKey, args: &[&str]) {
        self.lines.lock().unwrap().push(format!("{step}:{key:?}:{}", args.join(",")));
    }

    fn detail(&self, step: u64, sub: u64, key: MessageKey, args: &[&str]) {
        self.lines.lock().unwrap().push(format!("{step}.{sub}:{key:?}:{}", args.join(",")));
    }

    fn error(&self, message: &str) {
        self.lines.lock().unwrap().push(format!("error:{message}"));
    }
}

/// Builds a context from a mock platform, an in-memory filesystem, and a
/// collecting reporter.
pub fn test_context(platform: MockPlatform) -> ServiceContext {
    ServiceContext {
        platform: Box::new(platform),
        fs: Box::new(MemFs::default()),
        reporter: Box::new(CollectingReporter::default()),
    }
}

/// Guild facts with sensible defaults for tests.
pub fn facts(id: &str) -> GuildFacts {
    GuildFacts {
        id: id.to_string(),
        name: format!("Guild {id}"),
        available: true,
        icon_url: None,
        splash_url: None,
        banner_url: None,
        verification_level: 1,
        explicit_content_filter: 0,
        afk_timeout: 300,
        afk_channel_id: None,
        system_channel_id: None,
        system_channel_flags: 0,
        premium_tier: 0,
        everyone_role_id: "everyone".to_string(),
    }
}

/// A live role with the given rank and permission bits.
pub fn role(id: &str, name: &str, position: i64, permissions: u64) -> LiveRole {
    LiveRole {
        id: id.to_string(),
        name: name.to_string(),
        color: 0,
        hoist: false,
        mentionable: false,
        position,
        permissions,
    }
}

fn channel(id: &str, kind: LiveChannelKind, name: &str, raw_position: i64) -> LiveChannel {
    LiveChannel {
        id: id.to_string(),
        kind,
        name: name.to_string(),
        position: raw_position,
        raw_position,
        parent_id: None,
        topic: None,
        nsfw: false,
        bitrate: None,
        user_limit: None,
        rtc_region: None,
        overwrites: Vec::new(),
    }
}

/// A live category.
pub fn category_channel(id: &str, name: &str, raw_position: i64) -> LiveChannel {
    channel(id, LiveChannelKind::Category, name, raw_position)
}

/// A live text channel.
pub fn text_channel(id: &str, name: &str, raw_position: i64, parent: Option<&str>) -> LiveChannel {
    let mut ch = channel(id, LiveChannelKind::Text, name, raw_position);
    ch.parent_id = parent.map(String::from);
    ch
}

/// A live voice channel.
pub fn voice_channel(id: &str, name: &str, raw_position: i64, parent: Option<&str>) -> LiveChannel {
    let mut ch = channel(id, LiveChannelKind::Voice, name, raw_position);
    ch.parent_id = parent.map(String::from);
    ch.bitrate = Some(64_000);
    ch.user_limit = Some(0);
    ch
}
