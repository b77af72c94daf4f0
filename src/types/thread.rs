//! Forum threads and the naming convention that carries their identity.
//!
//! Nothing maps tracked numbers to threads except the thread name itself:
//! every thread this bot creates is named `#<number> - <title>`. Lookups match
//! on the `#<number> -` prefix only, because the title can be edited on GitHub
//! after the thread exists.

use serde::{Deserialize, Serialize};

use super::ids::{ChannelId, GuildId, ThreadId, TrackedNumber};

/// Discord rejects thread names longer than this many characters.
pub const MAX_THREAD_NAME_CHARS: usize = 100;

/// Whether a thread is currently active or has been archived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadStatus {
    Active,
    Archived,
}

/// A forum thread as seen through the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: ThreadId,
    pub name: String,
    pub status: ThreadStatus,
}

impl Thread {
    pub fn new(id: impl Into<ThreadId>, name: impl Into<String>, status: ThreadStatus) -> Self {
        Thread {
            id: id.into(),
            name: name.into(),
            status,
        }
    }

    /// Returns true if this thread's name carries the given tracked number.
    pub fn tracks(&self, number: TrackedNumber) -> bool {
        name_tracks(&self.name, number)
    }
}

/// The forum channel threads live under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forum {
    pub id: ChannelId,
    /// Discord lists active threads per guild, not per channel.
    pub guild_id: Option<GuildId>,
}

/// Builds the thread name for a tracked item: `#<number> - <title>`.
///
/// The result never exceeds [`MAX_THREAD_NAME_CHARS`]; only the title is
/// shortened, so the identifying prefix always survives.
pub fn thread_name(number: TrackedNumber, title: &str) -> String {
    let prefix = format!("#{} - ", number.get());
    let budget = MAX_THREAD_NAME_CHARS.saturating_sub(prefix.chars().count());
    let title: String = title.trim().chars().take(budget).collect();
    format!("{prefix}{title}").trim_end().to_string()
}

/// Returns true if `name` is the name of the thread for `number`.
///
/// The key is `#<number> -` followed by whitespace or the end of the name.
/// Requiring the delimiter keeps `#42` from claiming `#421 - ...`. The end of
/// name case covers items with an empty title, whose trailing space Discord
/// trims when the thread is created.
pub fn name_tracks(name: &str, number: TrackedNumber) -> bool {
    let key = format!("#{} -", number.get());
    match name.strip_prefix(&key) {
        Some(rest) => rest.is_empty() || rest.starts_with(char::is_whitespace),
        None => false,
    }
}
