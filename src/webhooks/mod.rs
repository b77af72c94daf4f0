//! Webhook handling for GitHub events.
//!
//! This module provides:
//! - Signature verification for webhook payloads (HMAC-SHA256)
//! - Event parsing and classification into [`RelayEvent`]

pub mod events;
pub mod parser;
pub mod signature;

pub use events::{Comment, Issue, PullRequest, RelayEvent, StateChange};
pub use parser::{ParseError, UNKNOWN_SENDER, parse_event};
pub use signature::{
    compute_signature, format_signature_header, parse_signature_header, verify_request,
    verify_signature,
};
