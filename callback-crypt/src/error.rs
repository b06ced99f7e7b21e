//! Error types for the `callback-crypt` crate.
//!
//! Follows the same pattern as the rest of the workspace: a root `Error` struct holding
//! an `ErrorKind` and an optional source for error chaining.

use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for callback-crypt.
/// Holds error kind and optional source for error chaining.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Every way a callback can fail to authenticate or decode.
///
/// Each kind is terminal for the callback it was raised on; none of them are retryable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The encoding key does not decode to exactly 32 bytes.
    InvalidKeyLength,
    /// The computed digest differs from the supplied signature.
    SignatureMismatch,
    /// The supplied signature is not a 40 character lowercase hex digest.
    MalformedSignature,
    /// The callback timestamp is outside the configured freshness window.
    TimestampExpired,
    /// The ciphertext is not valid base64 or not a whole number of cipher blocks.
    MalformedCiphertext,
    /// The depadded plaintext is shorter than its framing requires.
    TruncatedPayload,
    /// An outbound message does not fit the frame's 32-bit length field.
    MessageTooLarge,
    /// The block cipher rejected its key material or input.
    CipherFailure,
}

impl ErrorKind {
    /// Whether this kind means the callback could not be authenticated.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ErrorKind::SignatureMismatch
                | ErrorKind::MalformedSignature
                | ErrorKind::TimestampExpired
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let description = match self {
            ErrorKind::InvalidKeyLength => "encoding key must decode to 32 bytes",
            ErrorKind::SignatureMismatch => "signature mismatch",
            ErrorKind::MalformedSignature => "malformed signature",
            ErrorKind::TimestampExpired => "timestamp outside the accepted window",
            ErrorKind::MalformedCiphertext => "malformed ciphertext",
            ErrorKind::TruncatedPayload => "truncated payload",
            ErrorKind::MessageTooLarge => "message too large to frame",
            ErrorKind::CipherFailure => "cipher failure",
        };
        f.write_str(description)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "Callback error: {} ({})", self.error_kind, source),
            None => write!(f, "Callback error: {}", self.error_kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<ErrorKind> for Error {
    fn from(error_kind: ErrorKind) -> Self {
        Error {
            source: None,
            error_kind,
        }
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::MalformedCiphertext,
        }
    }
}

/// Helper function to create a callback error with a message as its source.
pub fn callback_error(kind: ErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: kind,
    }
}
