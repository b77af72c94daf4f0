//! Newtype wrappers for domain identifiers.
//!
//! GitHub hands out issue and pull request numbers from one shared sequence, so
//! a single [`TrackedNumber`] covers both. Discord identifies everything with
//! snowflakes, which its API serializes as strings; those are kept as strings
//! here rather than parsed, since we never do arithmetic on them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An issue or pull request number within the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackedNumber(pub u64);

impl TrackedNumber {
    /// Returns the raw number.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TrackedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for TrackedNumber {
    fn from(n: u64) -> Self {
        TrackedNumber(n)
    }
}

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                $name(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }
    };
}

snowflake!(
    /// A Discord channel id (the forum channel, or a thread, which is also a channel).
    ChannelId
);

snowflake!(
    /// A Discord guild (server) id.
    GuildId
);

snowflake!(
    /// A Discord thread id.
    ThreadId
);

impl ChannelId {
    /// Returns true if this looks like a Discord snowflake (non-empty, all digits).
    pub fn is_snowflake(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit())
    }
}
