//! Webhook endpoint handler.
//!
//! Authenticates a GitHub delivery against the raw body, classifies it, and
//! relays it into the forum before responding. Everything happens inside the
//! request; there is no queue behind it.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, error, warn};

use super::AppState;
use crate::effects::{ChatPlatform, RelayAction};
use crate::relay::RelayError;
use crate::webhooks::{ParseError, parse_event, verify_request};

/// Header name for GitHub signature.
const HEADER_SIGNATURE: &str = "x-hub-signature-256";
/// Header name for GitHub event type. Logged only.
const HEADER_EVENT: &str = "x-github-event";
/// Header name for GitHub delivery ID. Logged only.
const HEADER_DELIVERY: &str = "x-github-delivery";

/// Errors that can occur when processing a webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// No signature header.
    #[error("missing signature")]
    MissingSignature,

    /// Signature does not match the body.
    #[error("invalid signature")]
    InvalidSignature,

    /// Body is not a valid event payload.
    #[error("invalid payload: {0}")]
    InvalidJson(#[from] ParseError),

    /// Relaying into the forum failed.
    #[error("relay failed: {0}")]
    Relay(#[from] RelayError),
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature | WebhookError::InvalidSignature => {
                StatusCode::UNAUTHORIZED
            }
            WebhookError::InvalidJson(_) | WebhookError::Relay(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        // The sender gets a status and a canonical reason, never internals.
        let status = self.status();
        (status, status.canonical_reason().unwrap_or_default()).into_response()
    }
}

/// Webhook handler.
///
/// # Request
///
/// - Method: POST
/// - Required header: `X-Hub-Signature-256: sha256=<hex>`
/// - Body: JSON webhook payload (`issues`, `pull_request`, `issue_comment`)
///
/// # Response
///
/// - 200 OK: event relayed, or ignored
/// - 401 Unauthorized: signature missing or invalid; nothing else is done
/// - 500 Internal Server Error: unparseable body or chat platform failure
pub async fn webhook_handler<C: ChatPlatform + 'static>(
    State(app_state): State<AppState<C>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, &'static str), WebhookError> {
    let delivery = header_str(&headers, HEADER_DELIVERY).unwrap_or("-");
    let event_type = header_str(&headers, HEADER_EVENT).unwrap_or("-");
    let signature = header_str(&headers, HEADER_SIGNATURE);

    // Verify against the raw bytes BEFORE any parsing.
    if !verify_request(&body, signature, app_state.webhook_secret()) {
        let err = match signature {
            None => WebhookError::MissingSignature,
            Some(_) => WebhookError::InvalidSignature,
        };
        warn!(delivery = %delivery, error = %err, "Rejected webhook");
        return Err(err);
    }

    let event = parse_event(&body).inspect_err(|e| {
        error!(delivery = %delivery, error = %e, "Failed to parse webhook payload");
    })?;

    debug!(
        delivery = %delivery,
        event_type = %event_type,
        kind = event.kind(),
        "Received webhook"
    );

    let action = app_state
        .reconciler()
        .handle(&event)
        .await
        .inspect_err(|e| {
            error!(delivery = %delivery, error = %e, "Failed to relay webhook");
        })?;

    debug!(
        delivery = %delivery,
        action = action_label(&action),
        "Webhook processed"
    );
    Ok((StatusCode::OK, "OK"))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &'static str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn action_label(action: &RelayAction) -> &'static str {
    match action {
        RelayAction::CreateThread { .. } => "create_thread",
        RelayAction::AppendMessage { .. } => "append_message",
        RelayAction::NoOp { .. } => "noop",
    }
}
