//! Discord implementation of the chat platform capability.

mod client;
mod error;

pub use client::{DEFAULT_API_BASE, DiscordClient};
pub use error::DiscordApiError;
