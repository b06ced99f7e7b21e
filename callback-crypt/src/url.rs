//! Validation of identity-carrying redirect URLs.
//!
//! The platform redirects users back with a short-lived `code` and a `codeSig` signed the
//! same way as message callbacks. There is no body to decrypt.

use crate::error::Error;
use crate::signature::check_signature;

/// Check the signature of a redirect carrying an identity `code`.
pub fn validate_url(
    token: &str,
    code_signature: &str,
    timestamp: &str,
    nonce: &str,
    code: &str,
) -> Result<(), Error> {
    check_signature(token, code_signature, timestamp, nonce, code)
}
