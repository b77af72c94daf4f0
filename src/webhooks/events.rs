//! Typed webhook events.
//!
//! GitHub payloads are loosely shaped: the same `action` string means
//! different things depending on which objects ride along with it. The parser
//! resolves that once, producing a [`RelayEvent`], so the rest of the crate
//! matches on variants instead of probing for fields.

use serde::{Deserialize, Serialize};

use crate::types::TrackedNumber;

/// An issue as carried in a webhook payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub number: TrackedNumber,
    pub title: String,
    /// `None` when the author left the description empty.
    pub body: Option<String>,
    pub html_url: String,
}

/// A pull request as carried in a webhook payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: TrackedNumber,
    pub title: String,
    pub body: Option<String>,
    pub html_url: String,
    pub merged: bool,
}

/// A comment on an issue or pull request conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub body: String,
    pub html_url: String,
}

/// A close/reopen transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateChange {
    Closed,
    Reopened,
}

impl StateChange {
    /// Returns the GitHub action string for this transition.
    pub fn as_str(self) -> &'static str {
        match self {
            StateChange::Closed => "closed",
            StateChange::Reopened => "reopened",
        }
    }

    pub(crate) fn from_action(action: &str) -> Option<Self> {
        match action {
            "closed" => Some(StateChange::Closed),
            "reopened" => Some(StateChange::Reopened),
            _ => None,
        }
    }
}

/// A classified webhook event.
///
/// Every (action, payload shape) combination the relay reacts to has its own
/// variant. Everything else is [`RelayEvent::Unrecognized`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelayEvent {
    /// A plain issue (not a pull request) was opened.
    IssueOpened { issue: Issue, sender: String },

    /// A pull request was opened. Wins over `IssueOpened` when a payload
    /// carries both objects.
    PullRequestOpened {
        pull_request: PullRequest,
        sender: String,
    },

    /// A comment was created on an issue or pull request.
    ///
    /// GitHub delivers pull request conversation comments as issue comments,
    /// so `number` comes from the `issue` object either way.
    CommentCreated {
        number: TrackedNumber,
        comment: Comment,
        sender: String,
    },

    /// A pull request was closed, merged or reopened.
    PullRequestStateChanged {
        pull_request: PullRequest,
        change: StateChange,
        sender: String,
    },

    /// An issue was closed or reopened.
    IssueStateChanged {
        number: TrackedNumber,
        change: StateChange,
        sender: String,
    },

    /// Any other action or shape. Ignored.
    Unrecognized { action: String },
}

impl RelayEvent {
    /// Returns the tracked number this event is about, if any.
    pub fn tracked_number(&self) -> Option<TrackedNumber> {
        match self {
            RelayEvent::IssueOpened { issue, .. } => Some(issue.number),
            RelayEvent::PullRequestOpened { pull_request, .. }
            | RelayEvent::PullRequestStateChanged { pull_request, .. } => {
                Some(pull_request.number)
            }
            RelayEvent::CommentCreated { number, .. }
            | RelayEvent::IssueStateChanged { number, .. } => Some(*number),
            RelayEvent::Unrecognized { .. } => None,
        }
    }

    /// Returns the tracked number whose existing thread must be looked up
    /// before deciding what to do.
    ///
    /// Opening an issue always creates a thread, so no lookup is needed.
    pub fn lookup_number(&self) -> Option<TrackedNumber> {
        match self {
            RelayEvent::IssueOpened { .. } | RelayEvent::Unrecognized { .. } => None,
            other => other.tracked_number(),
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayEvent::IssueOpened { .. } => "issue_opened",
            RelayEvent::PullRequestOpened { .. } => "pull_request_opened",
            RelayEvent::CommentCreated { .. } => "comment_created",
            RelayEvent::PullRequestStateChanged { .. } => "pull_request_state_changed",
            RelayEvent::IssueStateChanged { .. } => "issue_state_changed",
            RelayEvent::Unrecognized { .. } => "unrecognized",
        }
    }
}
