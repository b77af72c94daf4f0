//! Shared test utilities: an in-memory forum and proptest generators.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use proptest::prelude::*;
use thiserror::Error;

use crate::effects::ChatPlatform;
use crate::types::{ChannelId, Forum, GuildId, Thread, ThreadId, ThreadStatus, TrackedNumber};

/// Channel id the fake forum answers to.
pub const FORUM_CHANNEL: &str = "1100";

const GUILD: &str = "9000";

pub fn forum() -> Forum {
    Forum {
        id: ChannelId::from(FORUM_CHANNEL),
        guild_id: Some(GuildId::from(GUILD)),
    }
}

pub fn arb_tracked_number() -> impl Strategy<Value = TrackedNumber> {
    any::<u64>().prop_map(TrackedNumber)
}

pub fn arb_title() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 #:()-]{0,80}".prop_map(String::from)
}

/// Error returned by [`FakeForum`] for operations set to fail.
#[derive(Debug, Error)]
#[error("fake platform failure in {0}")]
pub struct FakeError(pub &'static str);

/// An in-memory forum channel.
///
/// Threads created through it become active threads, so later lookups find
/// them. Every call is recorded for assertions.
#[derive(Debug, Default)]
pub struct FakeForum {
    state: Mutex<FakeState>,
}

#[derive(Debug, Default)]
struct FakeState {
    threads: Vec<Thread>,
    next_id: u64,
    created: Vec<(String, String)>,
    posted: Vec<(ThreadId, String)>,
    failing: HashSet<&'static str>,
    forum_fetches: usize,
    active_listings: usize,
    archived_listings: usize,
}

impl FakeForum {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Adds a thread that already exists in the forum.
    pub fn add_thread(&self, name: &str, status: ThreadStatus) -> Thread {
        self.with_state(|state| {
            let thread = Thread::new(state.allocate_id(), name, status);
            state.threads.push(thread.clone());
            thread
        })
    }

    /// Makes every later call to `operation` fail.
    pub fn fail_on(&self, operation: &'static str) {
        self.with_state(|state| state.failing.insert(operation));
    }

    /// `(name, body)` of every thread created through the platform.
    pub fn created(&self) -> Vec<(String, String)> {
        self.with_state(|state| state.created.clone())
    }

    /// `(thread, body)` of every message posted.
    pub fn posted(&self) -> Vec<(ThreadId, String)> {
        self.with_state(|state| state.posted.clone())
    }

    pub fn forum_fetches(&self) -> usize {
        self.with_state(|state| state.forum_fetches)
    }

    pub fn active_listings(&self) -> usize {
        self.with_state(|state| state.active_listings)
    }

    pub fn archived_listings(&self) -> usize {
        self.with_state(|state| state.archived_listings)
    }

    /// Returns true if no platform call has been made.
    pub fn untouched(&self) -> bool {
        self.with_state(|state| {
            state.forum_fetches == 0
                && state.active_listings == 0
                && state.archived_listings == 0
                && state.created.is_empty()
                && state.posted.is_empty()
        })
    }
}

impl FakeState {
    fn allocate_id(&mut self) -> ThreadId {
        self.next_id += 1;
        ThreadId(format!("{}", 5000 + self.next_id))
    }

    fn check(&self, operation: &'static str) -> Result<(), FakeError> {
        if self.failing.contains(operation) {
            Err(FakeError(operation))
        } else {
            Ok(())
        }
    }

    fn listing(&self, status: ThreadStatus) -> Vec<Thread> {
        self.threads
            .iter()
            .filter(|thread| thread.status == status)
            .cloned()
            .collect()
    }
}

impl ChatPlatform for FakeForum {
    type Error = FakeError;

    async fn fetch_forum(&self, channel: &ChannelId) -> Result<Forum, FakeError> {
        self.with_state(|state| {
            state.forum_fetches += 1;
            state.check("fetch_forum")?;
            if channel.as_str() != FORUM_CHANNEL {
                return Err(FakeError("fetch_forum"));
            }
            Ok(forum())
        })
    }

    async fn list_active_threads(&self, _forum: &Forum) -> Result<Vec<Thread>, FakeError> {
        // Give concurrent callers a chance to interleave.
        tokio::task::yield_now().await;
        self.with_state(|state| {
            state.active_listings += 1;
            state.check("list_active_threads")?;
            Ok(state.listing(ThreadStatus::Active))
        })
    }

    async fn list_archived_threads(&self, _forum: &Forum) -> Result<Vec<Thread>, FakeError> {
        self.with_state(|state| {
            state.archived_listings += 1;
            state.check("list_archived_threads")?;
            Ok(state.listing(ThreadStatus::Archived))
        })
    }

    async fn create_thread(
        &self,
        _forum: &Forum,
        name: &str,
        body: &str,
    ) -> Result<Thread, FakeError> {
        tokio::task::yield_now().await;
        self.with_state(|state| {
            state.check("create_thread")?;
            let thread = Thread::new(state.allocate_id(), name, ThreadStatus::Active);
            state.threads.push(thread.clone());
            state.created.push((name.to_string(), body.to_string()));
            Ok(thread)
        })
    }

    async fn post_message(&self, thread: &Thread, body: &str) -> Result<(), FakeError> {
        self.with_state(|state| {
            state.check("post_message")?;
            // Posting into an archived thread unarchives it.
            if let Some(existing) = state.threads.iter_mut().find(|t| t.id == thread.id) {
                existing.status = ThreadStatus::Active;
            }
            state.posted.push((thread.id.clone(), body.to_string()));
            Ok(())
        })
    }
}
