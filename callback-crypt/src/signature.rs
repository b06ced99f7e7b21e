//! SHA-1 callback signatures.
//!
//! The signature covers the shared token, the timestamp, the nonce and the content (the
//! ciphertext for message callbacks, the identity code for URL validation). The four values
//! are sorted as byte strings and concatenated without a separator before hashing, so the
//! digest does not depend on the order the fields travel in.

use log::debug;
use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

use crate::error::{callback_error, Error, ErrorKind};

/// Length of a hex-encoded SHA-1 digest.
pub const SIGNATURE_HEX_LEN: usize = 40;

/// Compute the lowercase hex signature over the four callback fields.
pub fn compute_signature(token: &str, timestamp: &str, nonce: &str, content: &str) -> String {
    let mut parts = [
        content.as_bytes(),
        token.as_bytes(),
        timestamp.as_bytes(),
        nonce.as_bytes(),
    ];
    parts.sort_unstable();

    let mut hasher = Sha1::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}

/// Check a supplied signature, reporting why it was rejected.
///
/// A signature that could never be a SHA-1 hex digest is reported as
/// `MalformedSignature`, any other disagreement as `SignatureMismatch`. The comparison
/// itself is exact, case-sensitive and constant-time.
pub fn check_signature(
    token: &str,
    signature: &str,
    timestamp: &str,
    nonce: &str,
    content: &str,
) -> Result<(), Error> {
    let expected = compute_signature(token, timestamp, nonce, content);

    if bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
        return Ok(());
    }

    if is_hex_digest(signature) {
        debug!("Callback signature does not match the computed digest");
        Err(callback_error(
            ErrorKind::SignatureMismatch,
            "Signature does not match the computed digest",
        ))
    } else {
        debug!(
            "Callback signature is not a SHA-1 hex digest ({} bytes)",
            signature.len()
        );
        Err(callback_error(
            ErrorKind::MalformedSignature,
            "Signature is not a 40 character lowercase hex digest",
        ))
    }
}

/// Returns `true` when `signature` matches the digest over the four fields.
pub fn verify(token: &str, signature: &str, timestamp: &str, nonce: &str, content: &str) -> bool {
    check_signature(token, signature, timestamp, nonce, content).is_ok()
}

fn is_hex_digest(value: &str) -> bool {
    value.len() == SIGNATURE_HEX_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "callback-token";
    const TIMESTAMP: &str = "1609459200";
    const NONCE: &str = "q8Xb2Lz";
    const CONTENT: &str = "bWVzc2FnZSBib2R5";

    fn sign() -> String {
        compute_signature(TOKEN, TIMESTAMP, NONCE, CONTENT)
    }

    #[test]
    fn test_known_digest() {
        // Sorted: "", "a", "b", "c" => sha1("abc")
        assert_eq!(
            compute_signature("b", "c", "", "a"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            compute_signature("", "", "", ""),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
    }

    #[test]
    fn test_sorts_as_byte_strings_not_numbers() {
        // "10" sorts before "9" bytewise.
        let signature = compute_signature("9", "10", "", "");
        let expected = hex::encode(Sha1::digest(b"109"));
        assert_eq!(signature, expected);
    }

    #[test]
    fn test_signature_is_deterministic() {
        assert_eq!(sign(), sign());
        assert_eq!(sign().len(), SIGNATURE_HEX_LEN);
    }

    #[test]
    fn test_field_position_does_not_change_digest() {
        let reordered = compute_signature(NONCE, CONTENT, TOKEN, TIMESTAMP);
        assert_eq!(sign(), reordered);
    }

    #[test]
    fn test_changing_a_value_changes_digest() {
        assert_ne!(sign(), compute_signature(TOKEN, "1609459201", NONCE, CONTENT));
        assert_ne!(sign(), compute_signature("other-token", TIMESTAMP, NONCE, CONTENT));
    }

    #[test]
    fn test_valid_signature_verifies() {
        let signature = sign();
        assert!(verify(TOKEN, &signature, TIMESTAMP, NONCE, CONTENT));
        assert!(check_signature(TOKEN, &signature, TIMESTAMP, NONCE, CONTENT).is_ok());
    }

    #[test]
    fn test_single_character_tampering_is_rejected() {
        let signature = sign();

        let tampered_content = "bWVzc2FnZSBib2R6";
        let tampered_timestamp = "1609459300";
        let tampered_nonce = "q8Xb2Ly";

        assert!(!verify(TOKEN, &signature, TIMESTAMP, NONCE, tampered_content));
        assert!(!verify(TOKEN, &signature, tampered_timestamp, NONCE, CONTENT));
        assert!(!verify(TOKEN, &signature, TIMESTAMP, tampered_nonce, CONTENT));
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        let upper = sign().to_uppercase();
        let result = check_signature(TOKEN, &upper, TIMESTAMP, NONCE, CONTENT);
        assert!(matches!(
            result,
            Err(Error {
                error_kind: ErrorKind::MalformedSignature,
                ..
            })
        ));
    }

    #[test]
    fn test_wrong_digest_is_a_mismatch() {
        let wrong = compute_signature(TOKEN, TIMESTAMP, NONCE, "other");
        let result = check_signature(TOKEN, &wrong, TIMESTAMP, NONCE, CONTENT);
        assert!(matches!(
            result,
            Err(Error {
                error_kind: ErrorKind::SignatureMismatch,
                ..
            })
        ));
    }

    #[test]
    fn test_garbage_signature_is_malformed() {
        for garbage in ["", "not-a-signature", &sign()[..39]] {
            let result = check_signature(TOKEN, garbage, TIMESTAMP, NONCE, CONTENT);
            assert!(matches!(
                result,
                Err(Error {
                    error_kind: ErrorKind::MalformedSignature,
                    ..
                })
            ));
        }
    }
}
