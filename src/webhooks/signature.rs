//! GitHub webhook signature verification using HMAC.
//!
//! GitHub signs webhook payloads with a shared secret. The signature arrives in
//! the `X-Hub-Signature-256` header (or the legacy `X-Hub-Signature` header) as
//! `<algorithm>=<hex digest>`.
//!
//! Signature verification is the first step in webhook processing; invalid
//! signatures are rejected before the body is parsed.

use std::fmt;
use std::io;
use std::path::Path;

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// A keyed-hash algorithm that may appear in a signature header.
///
/// GitHub sends `sha256` in `X-Hub-Signature-256` and `sha1` in the legacy
/// `X-Hub-Signature` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    Sha1,
    Sha256,
    Sha512,
}

impl SignatureAlgorithm {
    /// Looks up an algorithm by the name used in signature headers.
    ///
    /// Returns `None` for names we don't verify.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sha1" => Some(SignatureAlgorithm::Sha1),
            "sha256" => Some(SignatureAlgorithm::Sha256),
            "sha512" => Some(SignatureAlgorithm::Sha512),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SignatureAlgorithm::Sha1 => "sha1",
            SignatureAlgorithm::Sha256 => "sha256",
            SignatureAlgorithm::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a signature header (e.g., "sha256=abc123...") into its algorithm and
/// raw digest bytes.
///
/// Returns `None` for malformed headers: no `=`, an empty algorithm or digest,
/// an unsupported algorithm, or invalid hex. Never panics.
///
/// # Examples
///
/// ```
/// use ebook_sync::webhooks::{SignatureAlgorithm, parse_signature_header};
///
/// let (alg, digest) = parse_signature_header("sha256=abcd1234").unwrap();
/// assert_eq!(alg, SignatureAlgorithm::Sha256);
/// assert_eq!(digest, vec![0xab, 0xcd, 0x12, 0x34]);
///
/// // Missing separator
/// assert!(parse_signature_header("abcd1234").is_none());
///
/// // Empty digest
/// assert!(parse_signature_header("sha256=").is_none());
///
/// // Unsupported algorithm
/// assert!(parse_signature_header("md5=abcd1234").is_none());
///
/// // Bad hex
/// assert!(parse_signature_header("sha256=xyz").is_none());
/// ```
pub fn parse_signature_header(header: &str) -> Option<(SignatureAlgorithm, Vec<u8>)> {
    let (algorithm, hex_sig) = header.split_once('=')?;
    if algorithm.is_empty() || hex_sig.is_empty() {
        return None;
    }

    let algorithm = SignatureAlgorithm::from_name(algorithm)?;
    let digest = hex::decode(hex_sig).ok()?;
    Some((algorithm, digest))
}

/// Keys a MAC with `secret` and feeds it `payload`.
fn keyed<M: Mac + KeyInit>(payload: &[u8], secret: &[u8]) -> M {
    let mut mac =
        <M as KeyInit>::new_from_slice(secret).expect("HMAC can take key of any size");
    Mac::update(&mut mac, payload);
    mac
}

/// Computes the HMAC of a payload using the given algorithm and secret.
///
/// This is useful for testing purposes (generating expected signatures).
pub fn compute_signature(algorithm: SignatureAlgorithm, payload: &[u8], secret: &[u8]) -> Vec<u8> {
    match algorithm {
        SignatureAlgorithm::Sha1 => keyed::<HmacSha1>(payload, secret)
            .finalize()
            .into_bytes()
            .to_vec(),
        SignatureAlgorithm::Sha256 => keyed::<HmacSha256>(payload, secret)
            .finalize()
            .into_bytes()
            .to_vec(),
        SignatureAlgorithm::Sha512 => keyed::<HmacSha512>(payload, secret)
            .finalize()
            .into_bytes()
            .to_vec(),
    }
}

/// Formats a signature as a GitHub-style header value, `<algorithm>=<hex>`.
pub fn format_signature_header(algorithm: SignatureAlgorithm, signature: &[u8]) -> String {
    format!("{}={}", algorithm, hex::encode(signature))
}

/// Verifies a webhook signature against the payload and secret.
///
/// Returns `true` if the signature is valid, `false` otherwise. Every parse
/// problem collapses to `false`. The digest comparison is constant-time.
///
/// # Arguments
///
/// * `payload` - The raw webhook payload bytes
/// * `signature_header` - The signature header value (e.g., "sha256=...")
/// * `secret` - The webhook secret configured in GitHub
///
/// # Examples
///
/// ```
/// use ebook_sync::webhooks::{
///     SignatureAlgorithm, compute_signature, format_signature_header, verify_signature,
/// };
///
/// let payload = b"Hello, World!";
/// let secret = b"my-secret-key";
///
/// let sig = compute_signature(SignatureAlgorithm::Sha256, payload, secret);
/// let header = format_signature_header(SignatureAlgorithm::Sha256, &sig);
///
/// assert!(verify_signature(payload, &header, secret));
/// assert!(!verify_signature(payload, &header, b"wrong-secret"));
/// ```
pub fn verify_signature(payload: &[u8], signature_header: &str, secret: &[u8]) -> bool {
    let (algorithm, expected_signature) = match parse_signature_header(signature_header) {
        Some(parsed) => parsed,
        None => return false,
    };

    // Constant-time comparison via the HMAC library
    let expected = expected_signature.as_slice();
    let verified = match algorithm {
        SignatureAlgorithm::Sha1 => keyed::<HmacSha1>(payload, secret).verify_slice(expected),
        SignatureAlgorithm::Sha256 => keyed::<HmacSha256>(payload, secret).verify_slice(expected),
        SignatureAlgorithm::Sha512 => keyed::<HmacSha512>(payload, secret).verify_slice(expected),
    };
    verified.is_ok()
}

/// Reads the shared webhook secret from a file.
///
/// Every carriage return and line feed is removed, so a secret file saved with
/// a trailing newline (or CRLF) verifies exactly like one without.
pub fn load_secret(path: &Path) -> io::Result<Vec<u8>> {
    let mut secret = std::fs::read(path)?;
    secret.retain(|&b| b != b'\r' && b != b'\n');
    Ok(secret)
}
