//! Webhook signature verification (HMAC-SHA256).
//!
//! GitHub signs every delivery with the shared webhook secret and sends the
//! result in `X-Hub-Signature-256` as `sha256=<hex>`. The signature covers the
//! raw request bytes, so verification must run before the body is parsed:
//! re-serializing parsed JSON changes whitespace and key order.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Length in bytes of an HMAC-SHA256 digest.
pub const SIGNATURE_LEN: usize = 32;

/// Parses a signature header (`sha256=<hex>`) into raw digest bytes.
///
/// Returns `None` for a missing prefix, another algorithm, invalid hex, or a
/// digest of the wrong length. Never panics.
///
/// # Examples
///
/// ```
/// use forum_relay::webhooks::parse_signature_header;
///
/// let header = format!("sha256={}", "ab".repeat(32));
/// assert!(parse_signature_header(&header).is_some());
///
/// assert!(parse_signature_header("sha1=abcd").is_none());
/// assert!(parse_signature_header("sha256=abcd").is_none());
/// assert!(parse_signature_header("sha256=xyz").is_none());
/// ```
pub fn parse_signature_header(header: &str) -> Option<Vec<u8>> {
    let hex_sig = header.strip_prefix("sha256=")?;
    let bytes = hex::decode(hex_sig).ok()?;
    (bytes.len() == SIGNATURE_LEN).then_some(bytes)
}

/// Computes the HMAC-SHA256 of `payload` keyed by `secret`.
pub fn compute_signature(payload: &[u8], secret: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

/// Formats a digest as a header value: `sha256=<hex>`.
pub fn format_signature_header(signature: &[u8]) -> String {
    format!("sha256={}", hex::encode(signature))
}

/// Verifies a signature header against the payload and secret.
///
/// The digest comparison is constant-time (done by the `hmac` crate). A
/// malformed header or one of the wrong length is rejected before any
/// comparison happens, which reveals only the header's shape, never the secret.
///
/// # Examples
///
/// ```
/// use forum_relay::webhooks::{compute_signature, format_signature_header, verify_signature};
///
/// let body = br#"{"action":"opened"}"#;
/// let header = format_signature_header(&compute_signature(body, b"s3cret"));
///
/// assert!(verify_signature(body, &header, b"s3cret"));
/// assert!(!verify_signature(body, &header, b"other"));
/// ```
pub fn verify_signature(payload: &[u8], signature_header: &str, secret: &[u8]) -> bool {
    let Some(expected) = parse_signature_header(signature_header) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(payload);

    mac.verify_slice(&expected).is_ok()
}

/// Verifies a request whose signature header may be absent.
///
/// An absent or empty header is always a failure.
pub fn verify_request(payload: &[u8], signature_header: Option<&str>, secret: &[u8]) -> bool {
    match signature_header {
        Some(header) if !header.is_empty() => verify_signature(payload, header, secret),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sign(payload: &[u8], secret: &[u8]) -> String {
        format_signature_header(&compute_signature(payload, secret))
    }

    #[test]
    fn parse_rejects_wrong_shapes() {
        assert_eq!(parse_signature_header(""), None);
        assert_eq!(parse_signature_header("sha256="), None);
        assert_eq!(parse_signature_header("1234abcd"), None);
        assert_eq!(parse_signature_header("sha1=1234abcd"), None);
        assert_eq!(parse_signature_header("sha256=abc"), None);
        // Valid hex but a truncated digest.
        assert_eq!(parse_signature_header("sha256=1234abcd"), None);
    }

    #[test]
    fn parse_accepts_uppercase_hex() {
        let header = format!("sha256={}", "AB".repeat(32));
        assert_eq!(parse_signature_header(&header), Some(vec![0xab; 32]));
    }

    /// Test vector from GitHub's "validating webhook deliveries" guide.
    #[test]
    fn github_documentation_vector() {
        let header = "sha256=757107ea0eb2509fc211221cce984b8a37570b6d7586c22c46f4379c8b043e17";
        assert!(verify_signature(
            b"Hello, World!",
            header,
            b"It's a Secret to Everybody"
        ));
    }

    #[test]
    fn wrong_secret_fails() {
        let header = sign(b"payload", b"correct");
        assert!(verify_signature(b"payload", &header, b"correct"));
        assert!(!verify_signature(b"payload", &header, b"wrong"));
    }

    #[test]
    fn tampered_body_fails() {
        let header = sign(br#"{"action":"opened"}"#, b"secret");
        assert!(!verify_signature(br#"{"action":"closed"}"#, &header, b"secret"));
        // Whitespace counts: a re-serialized body does not verify.
        assert!(!verify_signature(br#"{"action": "opened"}"#, &header, b"secret"));
    }

    #[test]
    fn malformed_headers_return_false() {
        for header in ["", "sha256=", "sha256=zz", "sha1=abc123", "not-a-header"] {
            assert!(!verify_signature(b"test", header, b"secret"), "{header}");
        }
    }

    #[test]
    fn truncated_signature_returns_false() {
        let header = sign(b"test", b"secret");
        assert!(!verify_signature(b"test", &header[..header.len() - 2], b"secret"));
    }

    #[test]
    fn missing_header_returns_false() {
        assert!(!verify_request(b"test", None, b"secret"));
        assert!(!verify_request(b"test", Some(""), b"secret"));
    }

    #[test]
    fn present_header_is_checked() {
        let header = sign(b"test", b"secret");
        assert!(verify_request(b"test", Some(&header), b"secret"));
        assert!(!verify_request(b"test!", Some(&header), b"secret"));
    }

    #[test]
    fn empty_payload_and_secret() {
        let header = sign(b"", b"");
        assert!(verify_signature(b"", &header, b""));
    }

    proptest! {
        /// Property: verify(body, sign(body, secret), secret) holds.
        #[test]
        fn prop_sign_verify_roundtrip(payload: Vec<u8>, secret: Vec<u8>) {
            let header = sign(&payload, &secret);
            prop_assert!(verify_signature(&payload, &header, &secret));
        }

        /// Property: any change to the body breaks the signature.
        #[test]
        fn prop_tampered_body_fails(original: Vec<u8>, tampered: Vec<u8>, secret: Vec<u8>) {
            prop_assume!(original != tampered);
            let header = sign(&original, &secret);
            prop_assert!(!verify_signature(&tampered, &header, &secret));
        }

        /// Property: a different secret never verifies.
        ///
        /// Secrets are drawn without NUL bytes: HMAC zero-pads short keys, so
        /// `""` and `"\0"` are the same key.
        #[test]
        fn prop_wrong_secret_fails(
            payload in any::<Vec<u8>>(),
            secret1 in "[a-zA-Z0-9]{1,32}",
            secret2 in "[a-zA-Z0-9]{1,32}"
        ) {
            prop_assume!(secret1 != secret2);
            let header = sign(&payload, secret1.as_bytes());
            prop_assert!(!verify_signature(&payload, &header, secret2.as_bytes()));
        }

        /// Property: arbitrary header strings never panic.
        #[test]
        fn prop_arbitrary_header_no_panic(header: String, payload: Vec<u8>, secret: Vec<u8>) {
            let _ = verify_request(&payload, Some(&header), &secret);
        }
    }
}
