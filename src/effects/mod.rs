//! Relay actions as data, and the chat platform capability that executes them.
//!
//! The reconciler decides on a [`RelayAction`] without touching the network;
//! executing it goes through a [`ChatPlatform`] implementation. Tests swap in
//! an in-memory platform; production uses the Discord REST client.

use serde::{Deserialize, Serialize};

use crate::types::{Thread, TrackedNumber};

pub mod platform;

pub use platform::ChatPlatform;

/// What the relay does in response to one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayAction {
    /// Start a new forum thread with an initial message.
    CreateThread { name: String, body: String },

    /// Post a message into an existing thread.
    AppendMessage { thread: Thread, body: String },

    /// Do nothing.
    NoOp { reason: NoOpReason },
}

/// Why an event produced no action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NoOpReason {
    /// The action/shape combination is not one the relay handles.
    Unrecognized { action: String },

    /// The event refers to an item that has no discoverable thread.
    ResolutionMiss { number: TrackedNumber },
}

impl RelayAction {
    pub fn is_noop(&self) -> bool {
        matches!(self, RelayAction::NoOp { .. })
    }

    pub(crate) fn unrecognized(action: &str) -> Self {
        RelayAction::NoOp {
            reason: NoOpReason::Unrecognized {
                action: action.to_string(),
            },
        }
    }

    pub(crate) fn resolution_miss(number: TrackedNumber) -> Self {
        RelayAction::NoOp {
            reason: NoOpReason::ResolutionMiss { number },
        }
    }
}
