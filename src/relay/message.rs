//! Message bodies posted into forum threads.

use crate::webhooks::{Comment, Issue, PullRequest, StateChange};

/// Discord rejects message content longer than this many characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

const NO_DESCRIPTION: &str = "No description";

/// Opening message for an issue's new thread.
pub fn issue_opened(issue: &Issue, sender: &str) -> String {
    clamp(format!(
        "New Issue by {sender}: {}\n\n{}",
        issue.html_url,
        description(issue.body.as_deref())
    ))
}

/// Opening message for a pull request that gets its own thread.
pub fn pull_request_created(pull_request: &PullRequest, sender: &str) -> String {
    clamp(format!(
        "New Pull Request by {sender}: {}\n\n{}",
        pull_request.html_url,
        description(pull_request.body.as_deref())
    ))
}

/// Posted into an existing thread when a pull request with the same number opens.
pub fn pull_request_opened(pull_request: &PullRequest, sender: &str) -> String {
    clamp(format!(
        "{sender} opened a pull request: {}\n\n{}",
        pull_request.html_url,
        description(pull_request.body.as_deref())
    ))
}

pub fn comment_created(comment: &Comment, sender: &str) -> String {
    clamp(format!(
        "{sender} commented: {}\n\n{}",
        comment.html_url, comment.body
    ))
}

pub fn pull_request_state_changed(change: StateChange, merged: bool, sender: &str) -> String {
    match change {
        StateChange::Closed if merged => format!("{sender} merged this PR"),
        _ => format!("{sender} {} this PR", change.as_str()),
    }
}

pub fn issue_state_changed(change: StateChange, sender: &str) -> String {
    format!("{sender} {} this issue", change.as_str())
}

/// An empty description reads the same as a missing one.
fn description(body: Option<&str>) -> &str {
    match body {
        Some(body) if !body.is_empty() => body,
        _ => NO_DESCRIPTION,
    }
}

/// Cuts `message` to the platform limit, marking the cut with an ellipsis.
fn clamp(message: String) -> String {
    if message.chars().count() <= MAX_MESSAGE_CHARS {
        return message;
    }
    let mut clamped: String = message.chars().take(MAX_MESSAGE_CHARS - 1).collect();
    clamped.push('…');
    clamped
}
