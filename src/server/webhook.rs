//! Webhook endpoint handler.
//!
//! Every request on `/webhook`, whatever its method, is handed to the
//! [`Dispatcher`](crate::dispatch::Dispatcher) on a blocking task. The
//! dispatcher reads the secret file, runs git and appends to the activity log,
//! none of which belongs on the async runtime.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use tracing::{debug, error};

use super::{AppState, MAX_PAYLOAD_BYTES};
use crate::dispatch::outcome::MSG_INTERNAL;
use crate::dispatch::{InboundNotification, SyncOutcome};

impl IntoResponse for SyncOutcome {
    fn into_response(self) -> Response {
        match self {
            SyncOutcome::Success | SyncOutcome::NoOp => StatusCode::NO_CONTENT.into_response(),
            SyncOutcome::Failure(failure) => {
                (StatusCode::BAD_REQUEST, failure.message).into_response()
            }
        }
    }
}

/// Webhook handler.
///
/// # Response
///
/// - 204 No Content: mirror pulled, already current, or ping
/// - 400 Bad Request: anything else, with a short `text/plain` reason
///
/// # Example
///
/// ```ignore
/// POST /webhook HTTP/1.1
/// X-GitHub-Event: push
/// X-Hub-Signature-256: sha256=...
/// Content-Type: application/json
///
/// {"after": "abc123...", "repository": {"name": "42", ...}, ...}
///
/// HTTP/1.1 204 No Content
/// ```
pub async fn webhook_handler(
    State(app_state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Body,
) -> SyncOutcome {
    let notification = read_notification(method, &headers, body).await;
    debug!(
        method = %notification.method(),
        event = ?notification.event_kind(),
        len = notification.body().len(),
        "Received webhook"
    );

    let dispatcher = app_state.dispatcher();
    match tokio::task::spawn_blocking(move || dispatcher.handle(&notification)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "Webhook task failed");
            SyncOutcome::failure(MSG_INTERNAL, "")
        }
    }
}

/// Collects the body up to [`MAX_PAYLOAD_BYTES`]. An oversized or broken body
/// still produces a notification, so the rejection is logged like any other.
async fn read_notification(method: Method, headers: &HeaderMap, body: Body) -> InboundNotification {
    match Limited::new(body, MAX_PAYLOAD_BYTES).collect().await {
        Ok(collected) => InboundNotification::from_http(method, headers, collected.to_bytes()),
        Err(e) => {
            let reason = if e.downcast_ref::<LengthLimitError>().is_some() {
                format!("request body exceeds {} bytes", MAX_PAYLOAD_BYTES)
            } else {
                format!("failed to read request body: {}", e)
            };
            InboundNotification::from_http_unreadable(method, headers, reason)
        }
    }
}
