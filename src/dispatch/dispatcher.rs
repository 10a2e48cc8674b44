//! The request pipeline: verify, classify, locate, check, pull.
//!
//! ```text
//! Start ──(not POST, unreadable body)─────────────▶ Failure
//!   │
//! Verifying ──(bad signature)─────────────────────▶ Failure
//!   │
//! Classifying ──(ping)────────────────────────────▶ NoOp
//!   │          ──(missing / unknown)──────────────▶ Failure
//!   │ push
//! Processing ──(bad payload / ID, git error)──────▶ Failure
//!            ──(already at `after`)───────────────▶ NoOp
//!            ──(pulled)───────────────────────────▶ Success
//! ```
//!
//! Every request writes a separator line to the activity log when it ends,
//! whichever way it ends. A panic while processing is caught and reported as
//! an ordinary failure.
//!
//! Two overlapping deliveries for the same ebook are not coordinated: both can
//! see the mirror as behind and both run a pull. git's index lock serialises
//! the two pulls; the loser reports a failure for its delivery.

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::Method;
use tracing::{debug, error, info, warn};

use super::notification::InboundNotification;
use super::outcome::{
    MSG_EXPECTED_POST, MSG_INTERNAL, MSG_INVALID_SECRET, MSG_UNDERSTAND_POST_DATA,
    MSG_UNDERSTAND_REQUEST, MSG_UNRECOGNIZED_EVENT, SyncOutcome, invalid_ebook_id_message,
    process_ebook_message,
};
use crate::git::RepoMirror;
use crate::persistence::ActivityLog;
use crate::sync::{needs_sync, resolve, sync};
use crate::types::{EbookId, InvalidEbookId};
use crate::webhooks::{EventKind, PushEvent, load_secret, verify_signature};

/// Separator written at the end of every request.
pub const REQUEST_SEPARATOR: &str = "--------------";

/// Settings the dispatcher needs at request time.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// File holding the shared webhook secret. Read on every request.
    pub secret_file: PathBuf,
    /// Root of the sharded mirror tree, with a trailing `/`.
    pub repo_root: String,
    /// Name of the remote to pull from.
    pub remote: String,
    /// Operator activity log.
    pub log_file: PathBuf,
}

/// Handles webhook deliveries end to end.
pub struct Dispatcher {
    settings: DispatchSettings,
    mirror: Arc<dyn RepoMirror>,
    log: ActivityLog,
}

/// Writes the end-of-request separator when dropped.
struct RequestGuard<'a> {
    log: &'a ActivityLog,
}

impl Drop for RequestGuard<'_> {
    fn drop(&mut self) {
        self.log.record(REQUEST_SEPARATOR);
    }
}

impl Dispatcher {
    pub fn new(settings: DispatchSettings, mirror: Arc<dyn RepoMirror>) -> Self {
        let log = ActivityLog::new(settings.log_file.clone());
        Dispatcher {
            settings,
            mirror,
            log,
        }
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    pub fn activity_log(&self) -> &ActivityLog {
        &self.log
    }

    /// Handles one delivery. Blocks on file and git I/O.
    pub fn handle(&self, notification: &InboundNotification) -> SyncOutcome {
        self.log.record("Received GitHub webhook");
        let _guard = RequestGuard { log: &self.log };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.process(notification)))
            .unwrap_or_else(|_| {
                error!("Webhook processing panicked");
                SyncOutcome::failure(MSG_INTERNAL, notification.body_lossy())
            });

        match &outcome {
            SyncOutcome::Failure(failure) => {
                warn!(error = %failure.message, "Webhook failed");
                self.log
                    .record(&format!("Webhook failed!  Error: {}", failure.message));
                self.log
                    .record(&format!("Webhook POST data: {}", failure.diagnostic));
            }
            SyncOutcome::NoOp => debug!("Webhook required no action"),
            SyncOutcome::Success => debug!("Webhook processed"),
        }

        outcome
    }

    fn process(&self, notification: &InboundNotification) -> SyncOutcome {
        if *notification.method() != Method::POST {
            return SyncOutcome::failure(MSG_EXPECTED_POST, "");
        }

        if let Some(reason) = notification.body_error() {
            warn!(error = %reason, "Unreadable request body");
            return SyncOutcome::failure(MSG_UNDERSTAND_REQUEST, reason);
        }

        // Verify the signature before looking at anything in the body.
        let secret = match load_secret(&self.settings.secret_file) {
            Ok(secret) => secret,
            Err(e) => {
                warn!(
                    path = %self.settings.secret_file.display(),
                    error = %e,
                    "Failed to read webhook secret"
                );
                self.log
                    .record(&format!("Error reading webhook secret: {}", e));
                return SyncOutcome::failure(MSG_INTERNAL, notification.body_lossy());
            }
        };

        let verified = notification
            .signature()
            .is_some_and(|header| verify_signature(notification.body(), header, &secret));
        if !verified {
            warn!("Invalid webhook signature");
            return SyncOutcome::failure(MSG_INVALID_SECRET, notification.body_lossy());
        }

        let Some(kind) = notification.event_kind() else {
            return SyncOutcome::failure(MSG_UNDERSTAND_REQUEST, notification.body_lossy());
        };

        match EventKind::from_header(kind) {
            EventKind::Ping => {
                self.log.record("Event type: ping");
                SyncOutcome::NoOp
            }
            EventKind::Push => {
                self.log.record("Event type: push");
                self.process_push(notification)
            }
            EventKind::Other(other) => {
                debug!(event = %other, "Ignoring unrecognized event");
                SyncOutcome::failure(MSG_UNRECOGNIZED_EVENT, notification.body_lossy())
            }
        }
    }

    fn process_push(&self, notification: &InboundNotification) -> SyncOutcome {
        let event = match PushEvent::parse(notification.body()) {
            Ok(event) => event,
            Err(e) => {
                debug!(error = %e, "Unparseable push payload");
                return SyncOutcome::failure(
                    MSG_UNDERSTAND_POST_DATA,
                    notification.body_lossy(),
                );
            }
        };

        // Our repository names are simply the ebook ID.
        let ebook_id = match EbookId::parse(event.repository_name()) {
            Ok(id) => id,
            Err(InvalidEbookId(name)) => {
                return SyncOutcome::failure(
                    invalid_ebook_id_message(&name),
                    notification.body_lossy(),
                );
            }
        };

        let location = resolve(&self.settings.repo_root, &ebook_id);
        info!(
            ebook_id = %location.ebook_id(),
            path = %location,
            after = %event.after.short(),
            "Processing push"
        );
        self.log.record(&format!(
            "Processing ebook #{} located at {}",
            location.ebook_id(),
            location
        ));

        match needs_sync(self.mirror.as_ref(), location.as_path(), &event.after) {
            Err(e) => {
                warn!(ebook_id = %ebook_id, error = %e, "Could not read local head");
                self.log.record(&format!(
                    "Error getting last local commit.  Output: {}",
                    e.output()
                ));
                return SyncOutcome::failure(
                    process_ebook_message(ebook_id.as_str()),
                    notification.body_lossy(),
                );
            }
            Ok(false) => {
                info!(ebook_id = %ebook_id, "Mirror already in sync");
                self.log.record("Local repo already in sync, no action taken");
                return SyncOutcome::NoOp;
            }
            Ok(true) => {}
        }

        match sync(self.mirror.as_ref(), location.as_path(), &self.settings.remote) {
            Ok(()) => {
                info!(ebook_id = %ebook_id, "Mirror pulled");
                self.log.record("git pull from GitHub complete");
                SyncOutcome::Success
            }
            Err(e) => {
                warn!(ebook_id = %ebook_id, error = %e, "Pull failed");
                self.log.record(&format!(
                    "Error pulling from GitHub.  Output: {}",
                    e.output()
                ));
                SyncOutcome::failure(
                    process_ebook_message(ebook_id.as_str()),
                    notification.body_lossy(),
                )
            }
        }
    }
}
