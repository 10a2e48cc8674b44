//! Webhook handling for GitHub events.
//!
//! This module provides:
//! - Signature verification for webhook payloads (HMAC-SHA256/512)
//! - Event classification and push payload parsing

pub mod events;
pub mod signature;

pub use events::{EventKind, PushEvent, PushEventError, PushRepository};
pub use signature::{
    SignatureAlgorithm, compute_signature, format_signature_header, load_secret,
    parse_signature_header, verify_signature,
};
