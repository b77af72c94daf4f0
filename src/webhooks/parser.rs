//! Webhook payload parser.
//!
//! Parses the raw JSON body of a GitHub `issues`, `pull_request` or
//! `issue_comment` delivery into a [`RelayEvent`]. The event type header is not
//! consulted: classification works purely from the `action` field and which
//! objects are present, in this order (first match wins):
//!
//! | Action | Shape | Event |
//! |--------|-------|-------|
//! | `opened` | `issue`, no `pull_request` | `IssueOpened` |
//! | `opened` | `pull_request` | `PullRequestOpened` |
//! | `created` | `comment` and `issue` | `CommentCreated` |
//! | `closed` / `reopened` | `pull_request` | `PullRequestStateChanged` |
//! | `closed` / `reopened` | `issue` | `IssueStateChanged` |
//! | anything else | | `Unrecognized` |
//!
//! Unknown fields are ignored. Only malformed JSON, or an object present with
//! a field of the wrong type, is an error.

use serde::Deserialize;
use thiserror::Error;

use crate::types::TrackedNumber;

use super::events::{Comment, Issue, PullRequest, RelayEvent, StateChange};

/// Login used when a payload carries no `sender`.
pub const UNKNOWN_SENDER: &str = "unknown";

/// Error type for webhook parsing failures.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON deserialization failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses and classifies a webhook payload.
///
/// # Examples
///
/// ```
/// use forum_relay::webhooks::{RelayEvent, parse_event};
///
/// let payload = br#"{
///     "action": "opened",
///     "issue": { "number": 7, "title": "Bug", "body": "desc", "html_url": "https://github.com/o/r/issues/7" },
///     "sender": { "login": "alice" }
/// }"#;
///
/// let event = parse_event(payload).unwrap();
/// assert!(matches!(event, RelayEvent::IssueOpened { .. }));
/// ```
pub fn parse_event(payload: &[u8]) -> Result<RelayEvent, ParseError> {
    let raw: RawPayload = serde_json::from_slice(payload)?;
    Ok(classify(raw))
}

// ============================================================================
// Raw payload structures
//
// Everything is optional; which objects are present is exactly what
// classification looks at.
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct RawPayload {
    /// Absent on `ping` deliveries, which then classify as unrecognized.
    #[serde(default)]
    action: String,
    issue: Option<RawIssue>,
    pull_request: Option<RawPullRequest>,
    comment: Option<RawComment>,
    sender: Option<RawUser>,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    number: u64,
    title: Option<String>,
    body: Option<String>,
    html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPullRequest {
    number: u64,
    title: Option<String>,
    body: Option<String>,
    html_url: Option<String>,
    merged: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    body: Option<String>,
    html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    login: String,
}

impl From<RawIssue> for Issue {
    fn from(raw: RawIssue) -> Self {
        Issue {
            number: TrackedNumber(raw.number),
            title: raw.title.unwrap_or_default(),
            body: raw.body,
            html_url: raw.html_url.unwrap_or_default(),
        }
    }
}

impl From<RawPullRequest> for PullRequest {
    fn from(raw: RawPullRequest) -> Self {
        PullRequest {
            number: TrackedNumber(raw.number),
            title: raw.title.unwrap_or_default(),
            body: raw.body,
            html_url: raw.html_url.unwrap_or_default(),
            merged: raw.merged.unwrap_or(false),
        }
    }
}

impl From<RawComment> for Comment {
    fn from(raw: RawComment) -> Self {
        Comment {
            body: raw.body.unwrap_or_default(),
            html_url: raw.html_url.unwrap_or_default(),
        }
    }
}

fn classify(raw: RawPayload) -> RelayEvent {
    let sender = raw
        .sender
        .map(|s| s.login)
        .unwrap_or_else(|| UNKNOWN_SENDER.to_string());

    match (raw.action.as_str(), raw.issue, raw.pull_request, raw.comment) {
        ("opened", Some(issue), None, _) => RelayEvent::IssueOpened {
            issue: issue.into(),
            sender,
        },
        ("opened", _, Some(pull_request), _) => RelayEvent::PullRequestOpened {
            pull_request: pull_request.into(),
            sender,
        },
        ("created", Some(issue), _, Some(comment)) => RelayEvent::CommentCreated {
            number: TrackedNumber(issue.number),
            comment: comment.into(),
            sender,
        },
        (action, issue, pull_request, _) => match StateChange::from_action(action) {
            Some(change) => match (pull_request, issue) {
                (Some(pull_request), _) => RelayEvent::PullRequestStateChanged {
                    pull_request: pull_request.into(),
                    change,
                    sender,
                },
                (None, Some(issue)) => RelayEvent::IssueStateChanged {
                    number: TrackedNumber(issue.number),
                    change,
                    sender,
                },
                (None, None) => RelayEvent::Unrecognized {
                    action: action.to_string(),
                },
            },
            None => RelayEvent::Unrecognized {
                action: action.to_string(),
            },
        },
    }
}
