//! Live adapter for the `ChatPlatform` port against the Discord REST
//! API (v10).
//!
//! One method per platform affordance, authenticated with the bot
//! token. A 429 response is logged and waited out a bounded number of
//! times before the call is reissued; the pipeline above never retries
//! on its own.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::ports::platform::{
    BotIdentity, BotMembership, CategoryCreate, ChatPlatform, GuildFacts, GuildUpdate, LiveBan,
    LiveChannel, LiveChannelKind, LiveEmoji, LiveMember, LiveOverwrite, LiveRole, OverwriteApply,
    OverwriteKind, PlatformFuture, RemoteError, RoleCreate, TextChannelCreate,
    VoiceChannelCreate,
};

const API_BASE: &str = "https://discord.com/api/v10";
const CDN_BASE: &str = "https://cdn.discordapp.com";

/// Page size for member and ban listing.
const PAGE_SIZE: usize = 1000;

/// How often a single call waits out a rate limit before giving up.
const MAX_RATE_LIMIT_WAITS: u32 = 5;

/// Live platform adapter over the Discord REST API.
pub struct LivePlatform {
    http: Client,
    token: String,
}

impl LivePlatform {
    /// Creates an adapter authenticating with the given bot token.
    #[must_use]
    pub fn new(token: String) -> Self {
        Self { http: Client::new(), token }
    }

    /// Issues one API call, waiting out rate limits, and returns the
    /// final status and body.
    async fn send(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        reason: Option<String>,
    ) -> Result<(StatusCode, String), RemoteError> {
        let url = format!("{API_BASE}{path}");
        let mut waits = 0;
        loop {
            let mut request = self
                .http
                .request(method.clone(), &url)
                .header("Authorization", format!("Bot {}", self.token));
            if let Some(body) = &body {
                request = request.json(body);
            }
            if let Some(reason) = &reason {
                request = request.header("X-Audit-Log-Reason", reason.clone());
            }

            tracing::debug!(operation, %path, "issuing request");
            let response = request
                .send()
                .await
                .map_err(|e| RemoteError::new(operation, format!("request failed: {e}")))?;
            let status = response.status();
            let text = response.text().await.map_err(|e| {
                RemoteError::new(operation, format!("failed to read response: {e}"))
            })?;

            if status == StatusCode::TOO_MANY_REQUESTS && waits < MAX_RATE_LIMIT_WAITS {
                waits += 1;
                let retry_after = serde_json::from_str::<RateLimitDto>(&text)
                    .map_or(1.0, |r| r.retry_after);
                tracing::warn!(%path, retry_after, waits, "rate limited, waiting");
                tokio::time::sleep(Duration::from_secs_f64(retry_after)).await;
                continue;
            }

            return Ok((status, text));
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, RemoteError> {
        let (status, text) = self.send(operation, method, path, body, None).await?;
        if !status.is_success() {
            return Err(api_error(operation, status, &text));
        }
        parse(operation, &text)
    }

    async fn request_unit(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        reason: Option<String>,
    ) -> Result<(), RemoteError> {
        let (status, text) = self.send(operation, method, path, body, reason).await?;
        if !status.is_success() {
            return Err(api_error(operation, status, &text));
        }
        Ok(())
    }

    /// Downloads an image and re-encodes it as a base64 data URI, the
    /// form the API expects for icons and emojis.
    async fn fetch_image(
        &self,
        operation: &'static str,
        url: &str,
    ) -> Result<String, RemoteError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| RemoteError::new(operation, format!("image download failed: {e}")))?;
        if !response.status().is_success() {
            return Err(RemoteError::new(
                operation,
                format!("image download failed: {}", response.status().as_u16()),
            ));
        }
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/png")
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RemoteError::new(operation, format!("image download failed: {e}")))?;
        Ok(format!("data:{content_type};base64,{}", STANDARD.encode(&bytes)))
    }

    async fn fetch_identity(&self) -> Result<BotIdentity, RemoteError> {
        let user: UserDto =
            self.request("identity", Method::GET, "/users/@me", None).await?;
        Ok(BotIdentity { user_id: user.id, is_bot: user.bot.unwrap_or(false) })
    }

    async fn fetch_guild(&self, guild_id: &str) -> Result<Option<GuildFacts>, RemoteError> {
        let path = format!("/guilds/{guild_id}");
        let (status, text) = self.send("guild", Method::GET, &path, None, None).await?;
        if status == StatusCode::NOT_FOUND || status == StatusCode::FORBIDDEN {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(api_error("guild", status, &text));
        }
        let dto: GuildDto = parse("guild", &text)?;
        Ok(Some(dto.into_facts()))
    }

    async fn fetch_roles(&self, guild_id: &str) -> Result<Vec<LiveRole>, RemoteError> {
        let path = format!("/guilds/{guild_id}/roles");
        let dtos: Vec<RoleDto> = self.request("roles", Method::GET, &path, None).await?;
        dtos.into_iter().map(|dto| dto.into_role("roles")).collect()
    }

    async fn fetch_channels(&self, guild_id: &str) -> Result<Vec<LiveChannel>, RemoteError> {
        let path = format!("/guilds/{guild_id}/channels");
        let dtos: Vec<ChannelDto> = self.request("channels", Method::GET, &path, None).await?;
        let mut channels: Vec<LiveChannel> =
            dtos.into_iter().filter_map(ChannelDto::into_channel).collect();

        // The API reports one absolute position per kind; derive the
        // display index the same way the client UI does.
        for kind in [LiveChannelKind::Category, LiveChannelKind::Text, LiveChannelKind::Voice] {
            let mut of_kind: Vec<&mut LiveChannel> =
                channels.iter_mut().filter(|c| c.kind == kind).collect();
            of_kind.sort_by(|a, b| {
                a.raw_position.cmp(&b.raw_position).then_with(|| a.id.cmp(&b.id))
            });
            for (index, channel) in of_kind.into_iter().enumerate() {
                channel.position = i64::try_from(index).unwrap_or(i64::MAX);
            }
        }
        Ok(channels)
    }

    async fn fetch_emojis(&self, guild_id: &str) -> Result<Vec<LiveEmoji>, RemoteError> {
        let path = format!("/guilds/{guild_id}/emojis");
        let dtos: Vec<EmojiDto> = self.request("emojis", Method::GET, &path, None).await?;
        Ok(dtos
            .into_iter()
            .filter_map(|dto| {
                let id = dto.id?;
                let name = dto.name?;
                let animated = dto.animated.unwrap_or(false);
                let ext = if animated { "gif" } else { "png" };
                let url = format!("{CDN_BASE}/emojis/{id}.{ext}");
                Some(LiveEmoji { id, name, url, animated })
            })
            .collect())
    }

    async fn fetch_bans(&self, guild_id: &str) -> Result<Vec<LiveBan>, RemoteError> {
        let mut bans = Vec::new();
        let mut after: Option<String> = None;
        loop {
            let mut path = format!("/guilds/{guild_id}/bans?limit={PAGE_SIZE}");
            if let Some(after) = &after {
                path.push_str(&format!("&after={after}"));
            }
            let page: Vec<BanDto> = self.request("bans", Method::GET, &path, None).await?;
            let fetched = page.len();
            after = page.last().map(|b| b.user.id.clone());
            bans.extend(
                page.into_iter()
                    .map(|b| LiveBan { user_id: b.user.id, reason: b.reason }),
            );
            if fetched < PAGE_SIZE {
                break;
            }
        }
        Ok(bans)
    }

    async fn fetch_members(&self, guild_id: &str) -> Result<Vec<LiveMember>, RemoteError> {
        let mut members = Vec::new();
        let mut after: Option<String> = None;
        loop {
            let mut path = format!("/guilds/{guild_id}/members?limit={PAGE_SIZE}");
            if let Some(after) = &after {
                path.push_str(&format!("&after={after}"));
            }
            let page: Vec<MemberDto> = self.request("members", Method::GET, &path, None).await?;
            let fetched = page.len();
            after = page.last().and_then(|m| m.user.as_ref()).map(|u| u.id.clone());
            members.extend(page.into_iter().filter_map(|m| {
                let user = m.user?;
                Some(LiveMember {
                    user_id: user.id,
                    username: user.username.unwrap_or_default(),
                    bot: user.bot.unwrap_or(false),
                })
            }));
            if fetched < PAGE_SIZE {
                break;
            }
        }
        Ok(members)
    }

    /// The member object carries no permission field outside of
    /// interactions, so the bitfield is aggregated from the bot's roles
    /// plus the everyone role.
    async fn fetch_bot_membership(&self, guild_id: &str) -> Result<BotMembership, RemoteError> {
        let identity = self.fetch_identity().await?;
        let path = format!("/guilds/{guild_id}/members/{}", identity.user_id);
        let member: MemberDto =
            self.request("bot_membership", Method::GET, &path, None).await?;
        let roles = self.fetch_roles(guild_id).await?;

        let mut permissions = 0u64;
        for role in &roles {
            if role.id == guild_id || member.roles.contains(&role.id) {
                permissions |= role.permissions;
            }
        }
        Ok(BotMembership { role_ids: member.roles, permissions })
    }

    async fn apply_guild_update(
        &self,
        guild_id: &str,
        update: GuildUpdate,
    ) -> Result<(), RemoteError> {
        let mut body = json!({
            "name": update.name,
            "verification_level": update.verification_level,
            "explicit_content_filter": update.explicit_content_filter,
        });
        if let Some(icon_url) = &update.icon_url {
            body["icon"] = json!(self.fetch_image("update_guild", icon_url).await?);
        }
        if let Some(splash_url) = &update.splash_url {
            body["splash"] = json!(self.fetch_image("update_guild", splash_url).await?);
        }
        if let Some(banner_url) = &update.banner_url {
            body["banner"] = json!(self.fetch_image("update_guild", banner_url).await?);
        }
        let path = format!("/guilds/{guild_id}");
        self.request_unit("update_guild", Method::PATCH, &path, Some(body), None).await
    }

    async fn apply_create_role(
        &self,
        guild_id: &str,
        role: RoleCreate,
    ) -> Result<String, RemoteError> {
        let path = format!("/guilds/{guild_id}/roles");
        let body = json!({
            "name": role.name,
            "color": role.color,
            "hoist": role.hoist,
            "mentionable": role.mentionable,
            "permissions": role.permissions.to_string(),
        });
        let created: IdDto =
            self.request("create_role", Method::POST, &path, Some(body)).await?;

        // Creation ignores positions; pin the fresh role low in a
        // follow-up call so it stays below the admin-marker role.
        let positions = json!([{ "id": created.id, "position": role.position }]);
        self.request_unit("create_role", Method::PATCH, &path, Some(positions), None).await?;
        Ok(created.id)
    }

    async fn apply_create_channel(
        &self,
        operation: &'static str,
        guild_id: &str,
        body: serde_json::Value,
    ) -> Result<String, RemoteError> {
        let path = format!("/guilds/{guild_id}/channels");
        let created: IdDto = self.request(operation, Method::POST, &path, Some(body)).await?;
        Ok(created.id)
    }

    async fn apply_create_emoji(
        &self,
        guild_id: &str,
        name: &str,
        image_url: &str,
    ) -> Result<(), RemoteError> {
        let image = self.fetch_image("create_emoji", image_url).await?;
        let path = format!("/guilds/{guild_id}/emojis");
        let body = json!({ "name": name, "image": image });
        self.request_unit("create_emoji", Method::POST, &path, Some(body), None).await
    }
}

fn api_error(operation: &'static str, status: StatusCode, text: &str) -> RemoteError {
    let detail = serde_json::from_str::<ApiErrorDto>(text)
        .map_or_else(|_| text.to_string(), |e| e.message);
    RemoteError::new(operation, format!("{}: {detail}", status.as_u16()))
}

fn parse<T: DeserializeOwned>(operation: &'static str, text: &str) -> Result<T, RemoteError> {
    serde_json::from_str(text)
        .map_err(|e| RemoteError::new(operation, format!("unexpected response: {e}")))
}

fn parse_bits(operation: &'static str, value: &str) -> Result<u64, RemoteError> {
    value
        .parse::<u64>()
        .map_err(|_| RemoteError::new(operation, format!("unexpected bitfield `{value}`")))
}

fn overwrite_bodies(overwrites: &[OverwriteApply]) -> serde_json::Value {
    json!(overwrites
        .iter()
        .map(|o| json!({
            "id": o.role_id,
            "type": 0,
            "allow": o.allow.to_string(),
            "deny": o.deny.to_string(),
        }))
        .collect::<Vec<_>>())
}

// --- Response DTOs ---

#[derive(Deserialize)]
struct RateLimitDto {
    retry_after: f64,
}

#[derive(Deserialize)]
struct ApiErrorDto {
    message: String,
}

#[derive(Deserialize)]
struct IdDto {
    id: String,
}

#[derive(Deserialize)]
struct UserDto {
    id: String,
    username: Option<String>,
    bot: Option<bool>,
}

#[derive(Deserialize)]
struct GuildDto {
    id: String,
    name: String,
    icon: Option<String>,
    splash: Option<String>,
    banner: Option<String>,
    verification_level: u8,
    explicit_content_filter: u8,
    afk_timeout: u32,
    afk_channel_id: Option<String>,
    system_channel_id: Option<String>,
    #[serde(default)]
    system_channel_flags: u64,
    #[serde(default)]
    premium_tier: u8,
    #[serde(default)]
    unavailable: bool,
}

impl GuildDto {
    fn into_facts(self) -> GuildFacts {
        let icon_url = self
            .icon
            .as_ref()
            .map(|hash| format!("{CDN_BASE}/icons/{}/{hash}.png?size=2048", self.id));
        let splash_url = self
            .splash
            .as_ref()
            .map(|hash| format!("{CDN_BASE}/splashes/{}/{hash}.png?size=2048", self.id));
        let banner_url = self
            .banner
            .as_ref()
            .map(|hash| format!("{CDN_BASE}/banners/{}/{hash}.png?size=2048", self.id));
        GuildFacts {
            everyone_role_id: self.id.clone(),
            id: self.id,
            name: self.name,
            available: !self.unavailable,
            icon_url,
            splash_url,
            banner_url,
            verification_level: self.verification_level,
            explicit_content_filter: self.explicit_content_filter,
            afk_timeout: self.afk_timeout,
            afk_channel_id: self.afk_channel_id,
            system_channel_id: self.system_channel_id,
            system_channel_flags: self.system_channel_flags,
            premium_tier: self.premium_tier,
        }
    }
}

#[derive(Deserialize)]
struct RoleDto {
    id: String,
    name: String,
    color: u32,
    hoist: bool,
    mentionable: bool,
    position: i64,
    permissions: String,
}

impl RoleDto {
    fn into_role(self, operation: &'static str) -> Result<LiveRole, RemoteError> {
        let permissions = parse_bits(operation, &self.permissions)?;
        Ok(LiveRole {
            id: self.id,
            name: self.name,
            color: self.color,
            hoist: self.hoist,
            mentionable: self.mentionable,
            position: self.position,
            permissions,
        })
    }
}

#[derive(Deserialize)]
struct OverwriteDto {
    id: String,
    #[serde(rename = "type")]
    kind: u8,
    allow: String,
    deny: String,
}

#[derive(Deserialize)]
struct ChannelDto {
    id: String,
    #[serde(rename = "type")]
    kind: u8,
    name: Option<String>,
    position: Option<i64>,
    parent_id: Option<String>,
    topic: Option<String>,
    nsfw: Option<bool>,
    bitrate: Option<u32>,
    user_limit: Option<i64>,
    rtc_region: Option<String>,
    #[serde(default)]
    permission_overwrites: Vec<OverwriteDto>,
}

impl ChannelDto {
    /// Maps the kinds the pipeline copies; announcement, stage, forum,
    /// and thread channels are skipped.
    fn into_channel(self) -> Option<LiveChannel> {
        let kind = match self.kind {
            0 => LiveChannelKind::Text,
            2 => LiveChannelKind::Voice,
            4 => LiveChannelKind::Category,
            _ => return None,
        };
        let overwrites = self
            .permission_overwrites
            .into_iter()
            .filter_map(|o| {
                let kind = match o.kind {
                    0 => OverwriteKind::Role,
                    1 => OverwriteKind::Member,
                    _ => return None,
                };
                Some(LiveOverwrite {
                    target_id: o.id,
                    kind,
                    allow: o.allow.parse().unwrap_or(0),
                    deny: o.deny.parse().unwrap_or(0),
                })
            })
            .collect();
        let raw_position = self.position.unwrap_or(0);
        Some(LiveChannel {
            id: self.id,
            kind,
            name: self.name.unwrap_or_default(),
            position: raw_position,
            raw_position,
            parent_id: self.parent_id,
            topic: self.topic,
            nsfw: self.nsfw.unwrap_or(false),
            bitrate: self.bitrate,
            user_limit: self.user_limit,
            rtc_region: self.rtc_region,
            overwrites,
        })
    }
}

#[derive(Deserialize)]
struct EmojiDto {
    id: Option<String>,
    name: Option<String>,
    animated: Option<bool>,
}

#[derive(Deserialize)]
struct BanDto {
    reason: Option<String>,
    user: UserDto,
}

#[derive(Deserialize)]
struct MemberDto {
    user: Option<UserDto>,
    #[serde(default)]
    roles: Vec<String>,
}

impl ChatPlatform for LivePlatform {
    fn identity(&self) -> PlatformFuture<'_, BotIdentity> {
        Box::pin(async move { self.fetch_identity().await })
    }

    fn guild(&self, guild_id: &str) -> PlatformFuture<'_, Option<GuildFacts>> {
        let guild_id = guild_id.to_string();
        Box::pin(async move { self.fetch_guild(&guild_id).await })
    }

    fn roles(&self, guild_id: &str) -> PlatformFuture<'_, Vec<LiveRole>> {
        let guild_id = guild_id.to_string();
        Box::pin(async move { self.fetch_roles(&guild_id).await })
    }

    fn channels(&self, guild_id: &str) -> PlatformFuture<'_, Vec<LiveChannel>> {
        let guild_id = guild_id.to_string();
        Box::pin(async move { self.fetch_channels(&guild_id).await })
    }

    fn emojis(&self, guild_id: &str) -> PlatformFuture<'_, Vec<LiveEmoji>> {
        let guild_id = guild_id.to_string();
        Box::pin(async move { self.fetch_emojis(&guild_id).await })
    }

    fn bans(&self, guild_id: &str) -> PlatformFuture<'_, Vec<LiveBan>> {
        let guild_id = guild_id.to_string();
        Box::pin(async move { self.fetch_bans(&guild_id).await })
    }

    fn members(&self, guild_id: &str) -> PlatformFuture<'_, Vec<LiveMember>> {
        let guild_id = guild_id.to_string();
        Box::pin(async move { self.fetch_members(&guild_id).await })
    }

    fn bot_membership(&self, guild_id: &str) -> PlatformFuture<'_, BotMembership> {
        let guild_id = guild_id.to_string();
        Box::pin(async move { self.fetch_bot_membership(&guild_id).await })
    }

    fn update_guild(&self, guild_id: &str, update: GuildUpdate) -> PlatformFuture<'_, ()> {
        let guild_id = guild_id.to_string();
        Box::pin(async move { self.apply_guild_update(&guild_id, update).await })
    }

    fn create_role(&self, guild_id: &str, role: RoleCreate) -> PlatformFuture<'_, String> {
        let guild_id = guild_id.to_string();
        Box::pin(async move { self.apply_create_role(&guild_id, role).await })
    }

    fn set_role_permissions(
        &self,
        guild_id: &str,
        role_id: &str,
        permissions: u64,
    ) -> PlatformFuture<'_, ()> {
        let path = format!("/guilds/{guild_id}/roles/{role_id}");
        Box::pin(async move {
            let body = json!({ "permissions": permissions.to_string() });
            self.request_unit("set_role_permissions", Method::PATCH, &path, Some(body), None)
                .await
        })
    }

    fn create_category(
        &self,
        guild_id: &str,
        category: CategoryCreate,
    ) -> PlatformFuture<'_, String> {
        let guild_id = guild_id.to_string();
        Box::pin(async move {
            let body = json!({
                "name": category.name,
                "type": 4,
                "permission_overwrites": overwrite_bodies(&category.overwrites),
            });
            self.apply_create_channel("create_category", &guild_id, body).await
        })
    }

    fn create_text_channel(
        &self,
        guild_id: &str,
        channel: TextChannelCreate,
    ) -> PlatformFuture<'_, String> {
        let guild_id = guild_id.to_string();
        Box::pin(async move {
            let mut body = json!({
                "name": channel.name,
                "type": 0,
                "nsfw": channel.nsfw,
            });
            if let Some(parent_id) = &channel.parent_id {
                body["parent_id"] = json!(parent_id);
            }
            if let Some(overwrites) = &channel.overwrites {
                body["permission_overwrites"] = overwrite_bodies(overwrites);
            }
            self.apply_create_channel("create_text_channel", &guild_id, body).await
        })
    }

    fn create_voice_channel(
        &self,
        guild_id: &str,
        channel: VoiceChannelCreate,
    ) -> PlatformFuture<'_, String> {
        let guild_id = guild_id.to_string();
        Box::pin(async move {
            let mut body = json!({
                "name": channel.name,
                "type": 2,
                "bitrate": channel.bitrate,
                "user_limit": channel.user_limit,
            });
            if let Some(rtc_region) = &channel.rtc_region {
                body["rtc_region"] = json!(rtc_region);
            }
            if let Some(parent_id) = &channel.parent_id {
                body["parent_id"] = json!(parent_id);
            }
            if let Some(overwrites) = &channel.overwrites {
                body["permission_overwrites"] = overwrite_bodies(overwrites);
            }
            self.apply_create_channel("create_voice_channel", &guild_id, body).await
        })
    }

    fn set_topic(&self, channel_id: &str, topic: &str) -> PlatformFuture<'_, ()> {
        let path = format!("/channels/{channel_id}");
        let topic = topic.to_string();
        Box::pin(async move {
            let body = json!({ "topic": topic });
            self.request_unit("set_topic", Method::PATCH, &path, Some(body), None).await
        })
    }

    fn set_system_channel(
        &self,
        guild_id: &str,
        channel_id: &str,
        flags: u64,
    ) -> PlatformFuture<'_, ()> {
        let path = format!("/guilds/{guild_id}");
        let channel_id = channel_id.to_string();
        Box::pin(async move {
            let body = json!({
                "system_channel_id": channel_id,
                "system_channel_flags": flags,
            });
            self.request_unit("set_system_channel", Method::PATCH, &path, Some(body), None).await
        })
    }

    fn set_afk(
        &self,
        guild_id: &str,
        channel_id: Option<&str>,
        timeout: u32,
    ) -> PlatformFuture<'_, ()> {
        let path = format!("/guilds/{guild_id}");
        let channel_id = channel_id.map(String::from);
        Box::pin(async move {
            let body = json!({
                "afk_channel_id": channel_id,
                "afk_timeout": timeout,
            });
            self.request_unit("set_afk", Method::PATCH, &path, Some(body), None).await
        })
    }

    fn create_emoji(
        &self,
        guild_id: &str,
        name: &str,
        image_url: &str,
    ) -> PlatformFuture<'_, ()> {
        let guild_id = guild_id.to_string();
        let name = name.to_string();
        let image_url = image_url.to_string();
        Box::pin(async move { self.apply_create_emoji(&guild_id, &name, &image_url).await })
    }

    fn delete_channel(&self, channel_id: &str) -> PlatformFuture<'_, ()> {
        let path = format!("/channels/{channel_id}");
        Box::pin(async move {
            self.request_unit("delete_channel", Method::DELETE, &path, None, None).await
        })
    }

    fn delete_role(&self, guild_id: &str, role_id: &str) -> PlatformFuture<'_, ()> {
        let path = format!("/guilds/{guild_id}/roles/{role_id}");
        Box::pin(async move {
            self.request_unit("delete_role", Method::DELETE, &path, None, None).await
        })
    }

    fn delete_emoji(&self, guild_id: &str, emoji_id: &str) -> PlatformFuture<'_, ()> {
        let path = format!("/guilds/{guild_id}/emojis/{emoji_id}");
        Box::pin(async move {
            self.request_unit("delete_emoji", Method::DELETE, &path, None, None).await
        })
    }

    fn ban(
        &self,
        guild_id: &str,
        user_id: &str,
        reason: Option<&str>,
    ) -> PlatformFuture<'_, ()> {
        let path = format!("/guilds/{guild_id}/bans/{user_id}");
        let reason = reason.map(String::from);
        Box::pin(async move {
            self.request_unit("ban", Method::PUT, &path, Some(json!({})), reason).await
        })
    }

    fn unban(&self, guild_id: &str, user_id: &str) -> PlatformFuture<'_, ()> {
        let path = format!("/guilds/{guild_id}/bans/{user_id}");
        Box::pin(async move {
            self.request_unit("unban", Method::DELETE, &path, None, None).await
        })
    }

    fn send_message(&self, channel_id: &str, content: &str) -> PlatformFuture<'_, ()> {
        let path = format!("/channels/{channel_id}/messages");
        let content = content.to_string();
        Box::pin(async move {
            let body = json!({ "content": content });
            self.request_unit("send_message", Method::POST, &path, Some(body), None).await
        })
    }
}
