//! Core domain types for the forum relay.

pub mod ids;
pub mod thread;

pub use ids::{ChannelId, GuildId, ThreadId, TrackedNumber};
pub use thread::{Forum, MAX_THREAD_NAME_CHARS, Thread, ThreadStatus, name_tracks, thread_name};
