//! Discord REST client for forum channels.
//!
//! Only the handful of endpoints the relay needs:
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | fetch forum | `GET /channels/{id}` |
//! | active threads | `GET /guilds/{guild}/threads/active` |
//! | archived threads | `GET /channels/{id}/threads/archived/public` |
//! | create thread | `POST /channels/{id}/threads` |
//! | post message | `POST /channels/{thread}/messages` |
//!
//! Every call is a single attempt with a request timeout. Rate limits are
//! reported as errors, not waited out.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, RequestBuilder};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::effects::ChatPlatform;
use crate::types::{ChannelId, Forum, GuildId, Thread, ThreadStatus};

use super::error::DiscordApiError;

/// Discord REST API v10.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

const USER_AGENT: &str = concat!(
    "DiscordBot (https://github.com/forum-relay/forum-relay, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Channel types that hold threads as posts: GUILD_FORUM and GUILD_MEDIA.
const FORUM_CHANNEL_TYPES: [u8; 2] = [15, 16];

/// Largest page Discord serves for archived threads.
const ARCHIVED_PAGE_SIZE: u32 = 100;

/// A Discord bot client authenticated with a bot token.
#[derive(Clone)]
pub struct DiscordClient {
    http: Client,
    api_base: String,
    token: String,
}

impl DiscordClient {
    /// Creates a client against the public Discord API.
    pub fn new(token: impl Into<String>) -> Result<Self, DiscordApiError> {
        Self::with_api_base(token, DEFAULT_API_BASE)
    }

    /// Creates a client against a custom API base URL.
    pub fn with_api_base(
        token: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Result<Self, DiscordApiError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(DiscordApiError::client)?;

        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Returns the API base URL requests are sent to.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, DiscordApiError> {
        self.send(operation, self.http.get(self.url(path)).query(query))
            .await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
    ) -> Result<T, DiscordApiError> {
        self.send(operation, self.http.post(self.url(path)).json(body))
            .await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, DiscordApiError> {
        let response = request
            .header(AUTHORIZATION, format!("Bot {}", self.token))
            .send()
            .await
            .map_err(|e| DiscordApiError::request(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response.text().await.unwrap_or_default();
            let err = DiscordApiError::status(operation, status.as_u16(), body);
            if err.is_rate_limited() {
                warn!(
                    operation,
                    retry_after = retry_after.as_deref().unwrap_or("unknown"),
                    "Rate limited by Discord"
                );
            }
            return Err(err);
        }

        response
            .json()
            .await
            .map_err(|e| DiscordApiError::decode(operation, e))
    }
}

impl std::fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawChannel {
    id: String,
    #[serde(rename = "type")]
    kind: u8,
    guild_id: Option<String>,
    name: Option<String>,
    parent_id: Option<String>,
    thread_metadata: Option<RawThreadMetadata>,
}

#[derive(Debug, Deserialize)]
struct RawThreadMetadata {
    #[serde(default)]
    archived: bool,
    archive_timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawThreadList {
    threads: Vec<RawChannel>,
    #[serde(default)]
    has_more: bool,
}

#[derive(Debug, Serialize)]
struct CreateThreadRequest<'a> {
    name: &'a str,
    message: MessageRequest<'a>,
}

#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    content: &'a str,
    allowed_mentions: AllowedMentions,
}

/// Relayed text comes from GitHub users; never let it ping anyone.
#[derive(Debug, Serialize)]
struct AllowedMentions {
    parse: [&'static str; 0],
}

impl<'a> MessageRequest<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            content,
            allowed_mentions: AllowedMentions { parse: [] },
        }
    }
}

impl RawChannel {
    fn into_thread(self, fallback: ThreadStatus) -> Thread {
        let status = match &self.thread_metadata {
            Some(meta) if meta.archived => ThreadStatus::Archived,
            Some(_) => ThreadStatus::Active,
            None => fallback,
        };
        Thread::new(self.id, self.name.unwrap_or_default(), status)
    }

    fn archive_timestamp(&self) -> Option<&str> {
        self.thread_metadata
            .as_ref()
            .and_then(|meta| meta.archive_timestamp.as_deref())
    }
}

// ============================================================================
// ChatPlatform
// ============================================================================

impl ChatPlatform for DiscordClient {
    type Error = DiscordApiError;

    async fn fetch_forum(&self, channel: &ChannelId) -> Result<Forum, DiscordApiError> {
        let raw: RawChannel = self
            .get("fetch forum channel", &format!("/channels/{channel}"), &[])
            .await?;

        if !FORUM_CHANNEL_TYPES.contains(&raw.kind) {
            return Err(DiscordApiError::not_a_forum(&raw.id, raw.kind));
        }

        Ok(Forum {
            id: ChannelId(raw.id),
            guild_id: raw.guild_id.map(GuildId),
        })
    }

    async fn list_active_threads(&self, forum: &Forum) -> Result<Vec<Thread>, DiscordApiError> {
        let Some(guild) = &forum.guild_id else {
            return Err(DiscordApiError::no_guild(forum.id.as_str()));
        };

        let list: RawThreadList = self
            .get(
                "list active threads",
                &format!("/guilds/{guild}/threads/active"),
                &[],
            )
            .await?;

        // The endpoint covers the whole guild; keep this forum's threads.
        Ok(list
            .threads
            .into_iter()
            .filter(|t| t.parent_id.as_deref() == Some(forum.id.as_str()))
            .map(|t| t.into_thread(ThreadStatus::Active))
            .collect())
    }

    async fn list_archived_threads(&self, forum: &Forum) -> Result<Vec<Thread>, DiscordApiError> {
        let path = format!("/channels/{}/threads/archived/public", forum.id);
        let mut threads = Vec::new();
        let mut before: Option<String> = None;

        loop {
            let mut query = vec![("limit", ARCHIVED_PAGE_SIZE.to_string())];
            if let Some(before) = &before {
                query.push(("before", before.clone()));
            }

            let page: RawThreadList = self.get("list archived threads", &path, &query).await?;
            let next = page
                .threads
                .last()
                .and_then(RawChannel::archive_timestamp)
                .map(str::to_string);
            let has_more = page.has_more;

            threads.extend(
                page.threads
                    .into_iter()
                    .map(|t| t.into_thread(ThreadStatus::Archived)),
            );

            match next {
                Some(next) if has_more => before = Some(next),
                _ => break,
            }
        }

        debug!(forum = %forum.id, count = threads.len(), "Listed archived threads");
        Ok(threads)
    }

    async fn create_thread(
        &self,
        forum: &Forum,
        name: &str,
        body: &str,
    ) -> Result<Thread, DiscordApiError> {
        let request = CreateThreadRequest {
            name,
            message: MessageRequest::new(body),
        };
        let raw: RawChannel = self
            .post(
                "create thread",
                &format!("/channels/{}/threads", forum.id),
                &request,
            )
            .await?;

        Ok(raw.into_thread(ThreadStatus::Active))
    }

    async fn post_message(&self, thread: &Thread, body: &str) -> Result<(), DiscordApiError> {
        let _: IgnoredAny = self
            .post(
                "post message",
                &format!("/channels/{}/messages", thread.id),
                &MessageRequest::new(body),
            )
            .await?;
        Ok(())
    }
}
