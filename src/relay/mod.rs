//! The relay core: thread resolution and event reconciliation.
//!
//! - [`resolver`]: find the thread for a tracked number
//! - [`reconciler`]: decide and execute the action for an event
//! - [`message`]: thread message bodies
//! - [`locks`]: per-number mutual exclusion

pub mod locks;
pub mod message;
pub mod reconciler;
pub mod resolver;

use thiserror::Error;

pub use locks::NumberLocks;
pub use reconciler::{Reconciler, decide};
pub use resolver::find_thread;

/// Errors raised while relaying an event.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The chat platform rejected or failed a call.
    #[error("chat platform error ({operation}): {source}")]
    Platform {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl RelayError {
    /// Returns a closure wrapping a platform error for `operation`, for use
    /// with `map_err`.
    pub fn platform<E>(operation: &'static str) -> impl FnOnce(E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        move |source| RelayError::Platform {
            operation,
            source: Box::new(source),
        }
    }
}
