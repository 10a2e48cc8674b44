//! Event classification and push payload parsing.
//!
//! The event kind comes from the `X-GitHub-Event` header, never from the body.
//! Only `push` bodies are parsed; a `ping` is acknowledged without looking at
//! its payload at all.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::types::Sha;

/// The kind of webhook event, as named by the `X-GitHub-Event` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Sent by GitHub when a webhook is first configured.
    Ping,
    /// One or more commits were pushed to the repository.
    Push,
    /// Any event we don't handle.
    Other(String),
}

impl EventKind {
    pub fn from_header(value: &str) -> Self {
        match value {
            "ping" => EventKind::Ping,
            "push" => EventKind::Push,
            other => EventKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Ping => "ping",
            EventKind::Push => "push",
            EventKind::Other(s) => s,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from parsing a push payload.
#[derive(Debug, Error)]
pub enum PushEventError {
    /// Body is not JSON, or a required field is missing or has the wrong type.
    #[error("malformed push payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The fields of a push payload this listener uses.
///
/// The repository name is left unvalidated here; turning it into an
/// [`EbookId`](crate::types::EbookId) is the dispatcher's job so that the
/// failure message can name the offending value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PushEvent {
    pub repository: PushRepository,

    /// The commit the pushed ref points to after the push.
    pub after: Sha,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PushRepository {
    pub name: String,
}

impl PushEvent {
    /// Parses a raw push payload. Unknown fields are ignored.
    pub fn parse(body: &[u8]) -> Result<Self, PushEventError> {
        Ok(serde_json::from_slice(body)?)
    }

    pub fn repository_name(&self) -> &str {
        &self.repository.name
    }
}
