//! Discord API error type.

use std::fmt;
use thiserror::Error;

/// A failed Discord API call.
#[derive(Debug, Error)]
pub struct DiscordApiError {
    /// What the client was doing, e.g. "create thread".
    pub operation: &'static str,

    /// The HTTP status code, if a response arrived.
    pub status_code: Option<u16>,

    /// A human-readable description of the error.
    pub message: String,

    /// The underlying transport error, if any.
    #[source]
    pub source: Option<reqwest::Error>,
}

impl fmt::Display for DiscordApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(
                f,
                "Discord API error during {} (HTTP {}): {}",
                self.operation, code, self.message
            ),
            None => write!(
                f,
                "Discord API error during {}: {}",
                self.operation, self.message
            ),
        }
    }
}

impl DiscordApiError {
    /// The request never produced a response (connect, timeout, TLS).
    pub fn request(operation: &'static str, source: reqwest::Error) -> Self {
        Self {
            operation,
            status_code: source.status().map(|s| s.as_u16()),
            message: "request failed".to_string(),
            source: Some(source),
        }
    }

    /// Discord answered with a non-success status.
    pub fn status(operation: &'static str, status_code: u16, body: impl Into<String>) -> Self {
        Self {
            operation,
            status_code: Some(status_code),
            message: body.into(),
            source: None,
        }
    }

    /// A success response whose body did not have the expected shape.
    pub fn decode(operation: &'static str, source: reqwest::Error) -> Self {
        Self {
            operation,
            status_code: None,
            message: "unexpected response body".to_string(),
            source: Some(source),
        }
    }

    /// The configured channel exists but is not a forum.
    pub fn not_a_forum(channel: &str, kind: u8) -> Self {
        Self {
            operation: "fetch forum channel",
            status_code: None,
            message: format!("channel {channel} has type {kind}, not a forum"),
            source: None,
        }
    }

    /// Forum channels always belong to a guild; this one did not say which.
    pub fn no_guild(channel: &str) -> Self {
        Self {
            operation: "list active threads",
            status_code: None,
            message: format!("channel {channel} has no guild"),
            source: None,
        }
    }

    /// Building the HTTP client failed.
    pub fn client(source: reqwest::Error) -> Self {
        Self {
            operation: "build client",
            status_code: None,
            message: "could not build HTTP client".to_string(),
            source: Some(source),
        }
    }

    /// Returns true if Discord rate-limited the call.
    pub fn is_rate_limited(&self) -> bool {
        self.status_code == Some(429)
    }
}
