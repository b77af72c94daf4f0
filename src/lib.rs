//! Forum Relay - mirrors GitHub issue and pull request activity into Discord
//! forum threads, one thread per tracked number.
//!
//! This library provides the domain types, the webhook front end, and the
//! relay logic; the binary wires them to a Discord client and an HTTP server.

pub mod config;
pub mod discord;
pub mod effects;
pub mod relay;
pub mod server;
pub mod types;
pub mod webhooks;

#[cfg(test)]
mod test_utils;
