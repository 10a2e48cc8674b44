//! The result of handling one webhook delivery.

/// Request method other than POST.
pub const MSG_EXPECTED_POST: &str = "Expected HTTP POST";
/// Missing or mismatched signature.
pub const MSG_INVALID_SECRET: &str = "Invalid webhook secret";
/// No event kind header.
pub const MSG_UNDERSTAND_REQUEST: &str = "Couldn't understand request";
/// Event kind we don't handle.
pub const MSG_UNRECOGNIZED_EVENT: &str = "Unrecognized webhook event";
/// Push body not JSON or missing required fields.
pub const MSG_UNDERSTAND_POST_DATA: &str = "Couldn't understand POST data";
/// Unexpected internal fault (unreadable secret, panic).
pub const MSG_INTERNAL: &str = "Couldn't process request";

/// Terminal outcome of one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The mirror was pulled.
    Success,
    /// Nothing to do: a ping, or the mirror was already current.
    NoOp,
    /// Something was wrong with the request or the mirror.
    Failure(Failure),
}

/// Why a delivery failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Short message safe to return to the caller.
    pub message: String,
    /// Detail for the operator log only (typically the raw body).
    pub diagnostic: String,
}

impl SyncOutcome {
    pub fn failure(message: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        SyncOutcome::Failure(Failure {
            message: message.into(),
            diagnostic: diagnostic.into(),
        })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, SyncOutcome::Failure(_))
    }

    /// The user-facing failure message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            SyncOutcome::Failure(f) => Some(&f.message),
            _ => None,
        }
    }
}

/// Failure message for an ebook ID that isn't all digits.
pub fn invalid_ebook_id_message(name: &str) -> String {
    format!("Couldn't understand ebook ID: {}", name)
}

/// Failure message for a mirror that couldn't be checked or pulled.
pub fn process_ebook_message(id: &str) -> String {
    format!("Couldn't process ebook #{}", id)
}
