//! The inbound request, reduced to what the dispatcher looks at.

use axum::body::Bytes;
use axum::http::{HeaderMap, Method};

/// Header name for GitHub event type.
pub const HEADER_EVENT: &str = "x-github-event";
/// Header name for the HMAC-SHA256 signature.
pub const HEADER_SIGNATURE_256: &str = "x-hub-signature-256";
/// Legacy signature header, used only when the SHA-256 header is absent.
pub const HEADER_SIGNATURE: &str = "x-hub-signature";

/// One webhook delivery as received. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct InboundNotification {
    method: Method,
    body: Bytes,
    event_kind: Option<String>,
    signature: Option<String>,
    body_error: Option<String>,
}

impl InboundNotification {
    pub fn new(
        method: Method,
        body: impl Into<Bytes>,
        event_kind: Option<String>,
        signature: Option<String>,
    ) -> Self {
        InboundNotification {
            method,
            body: body.into(),
            event_kind,
            signature,
            body_error: None,
        }
    }

    /// Builds a notification from HTTP request parts.
    ///
    /// Headers whose values are not valid UTF-8 are treated as absent.
    pub fn from_http(method: Method, headers: &HeaderMap, body: Bytes) -> Self {
        let signature = header_str(headers, HEADER_SIGNATURE_256)
            .or_else(|| header_str(headers, HEADER_SIGNATURE));

        InboundNotification {
            method,
            body,
            event_kind: header_str(headers, HEADER_EVENT),
            signature,
            body_error: None,
        }
    }

    /// Builds a notification whose body could not be read (too large, or the
    /// connection failed mid-body). The dispatcher rejects it.
    pub fn from_http_unreadable(
        method: Method,
        headers: &HeaderMap,
        reason: impl Into<String>,
    ) -> Self {
        InboundNotification {
            body_error: Some(reason.into()),
            ..Self::from_http(method, headers, Bytes::new())
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body as text, for the operator log.
    pub fn body_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn event_kind(&self) -> Option<&str> {
        self.event_kind.as_deref()
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// Why the body could not be read, if it couldn't.
    pub fn body_error(&self) -> Option<&str> {
        self.body_error.as_deref()
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}
