//! HTTP server for the forum relay.
//!
//! Accepts webhooks from GitHub, validates signatures, and relays each event
//! into the configured forum channel before responding.
//!
//! # Endpoints
//!
//! - `POST /webhook` - Accepts GitHub webhook deliveries (200, 401 or 500)

use std::sync::Arc;

use crate::effects::ChatPlatform;
use crate::relay::Reconciler;

pub mod webhook;

pub use webhook::{WebhookError, webhook_handler};

/// Shared application state.
///
/// This is passed to all handlers via Axum's `State` extractor. Cloning is
/// cheap; everything lives behind one `Arc`.
pub struct AppState<C> {
    inner: Arc<AppStateInner<C>>,
}

struct AppStateInner<C> {
    /// Webhook secret for HMAC-SHA256 signature verification.
    webhook_secret: Vec<u8>,

    reconciler: Reconciler<C>,
}

// Manual impl: deriving would demand `C: Clone`.
impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        AppState {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: ChatPlatform> AppState<C> {
    pub fn new(webhook_secret: impl Into<Vec<u8>>, reconciler: Reconciler<C>) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                webhook_secret: webhook_secret.into(),
                reconciler,
            }),
        }
    }

    /// Returns the webhook secret.
    pub fn webhook_secret(&self) -> &[u8] {
        &self.inner.webhook_secret
    }

    pub fn reconciler(&self) -> &Reconciler<C> {
        &self.inner.reconciler
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router<C: ChatPlatform + 'static>(app_state: AppState<C>) -> axum::Router {
    use axum::routing::post;

    axum::Router::new()
        .route("/webhook", post(webhook_handler::<C>))
        .with_state(app_state)
}
