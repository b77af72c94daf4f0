//! The chat platform capability.
//!
//! Everything the relay needs from the chat platform, and nothing else. The
//! client is constructed once at startup and injected, so a test double can
//! stand in for it.
//!
//! # Example (in-memory double)
//!
//! ```ignore
//! struct InMemoryForum {
//!     threads: Mutex<Vec<Thread>>,
//! }
//!
//! impl ChatPlatform for InMemoryForum {
//!     type Error = std::io::Error;
//!
//!     async fn list_active_threads(&self, _forum: &Forum) -> Result<Vec<Thread>, Self::Error> {
//!         Ok(self.threads.lock().unwrap().clone())
//!     }
//!     // ...
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::types::{ChannelId, Forum, Thread};

/// Forum channel operations on the chat platform.
///
/// Every call is a single attempt; implementations do not retry.
pub trait ChatPlatform: Send + Sync {
    /// The error type returned by this platform.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Looks up the forum channel with the given id.
    fn fetch_forum(
        &self,
        channel: &ChannelId,
    ) -> impl Future<Output = Result<Forum, Self::Error>> + Send;

    /// Lists the forum's active (non-archived) threads.
    fn list_active_threads(
        &self,
        forum: &Forum,
    ) -> impl Future<Output = Result<Vec<Thread>, Self::Error>> + Send;

    /// Lists the forum's archived threads.
    fn list_archived_threads(
        &self,
        forum: &Forum,
    ) -> impl Future<Output = Result<Vec<Thread>, Self::Error>> + Send;

    /// Creates a thread in the forum, opening it with `body`.
    fn create_thread(
        &self,
        forum: &Forum,
        name: &str,
        body: &str,
    ) -> impl Future<Output = Result<Thread, Self::Error>> + Send;

    /// Posts a message into an existing thread.
    fn post_message(
        &self,
        thread: &Thread,
        body: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

impl<T: ChatPlatform> ChatPlatform for Arc<T> {
    type Error = T::Error;

    fn fetch_forum(
        &self,
        channel: &ChannelId,
    ) -> impl Future<Output = Result<Forum, Self::Error>> + Send {
        (**self).fetch_forum(channel)
    }

    fn list_active_threads(
        &self,
        forum: &Forum,
    ) -> impl Future<Output = Result<Vec<Thread>, Self::Error>> + Send {
        (**self).list_active_threads(forum)
    }

    fn list_archived_threads(
        &self,
        forum: &Forum,
    ) -> impl Future<Output = Result<Vec<Thread>, Self::Error>> + Send {
        (**self).list_archived_threads(forum)
    }

    fn create_thread(
        &self,
        forum: &Forum,
        name: &str,
        body: &str,
    ) -> impl Future<Output = Result<Thread, Self::Error>> + Send {
        (**self).create_thread(forum, name, body)
    }

    fn post_message(
        &self,
        thread: &Thread,
        body: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        (**self).post_message(thread, body)
    }
}
