//! The `EncodingAESKey` configured on the open platform.
//!
//! The platform hands out a 43 character base64 string (32 bytes, unpadded). The decoded bytes
//! are the AES-256 key and their first 16 bytes double as the CBC initialization vector.

use std::fmt;

use base64::{
    alphabet,
    engine::{
        general_purpose::{GeneralPurpose, GeneralPurposeConfig},
        DecodePaddingMode,
    },
    Engine,
};
use secrecy::{ExposeSecret, Secret};

use crate::error::{Error, ErrorKind};

/// Decoded key length in bytes.
pub const KEY_LEN: usize = 32;

/// CBC initialization vector length in bytes.
pub const IV_LEN: usize = 16;

/// Canonical length of the base64 form handed out by the platform.
pub const ENCODED_KEY_LEN: usize = 43;

/// The platform issues keys without the trailing `=`, and the final character carries two
/// unused bits that are not always zero.
const KEY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// A validated 32 byte encoding key.
pub struct EncodingKey {
    bytes: Secret<[u8; KEY_LEN]>,
}

impl EncodingKey {
    /// Decode and validate a base64 encoding key.
    ///
    /// Fails with `InvalidKeyLength` unless the input decodes to exactly 32 bytes.
    pub fn parse(encoded: &str) -> Result<Self, Error> {
        let decoded = KEY_ENGINE.decode(encoded).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::InvalidKeyLength,
        })?;

        let bytes: [u8; KEY_LEN] = decoded.try_into().map_err(|decoded: Vec<u8>| Error {
            source: Some(
                format!("Encoding key decoded to {} bytes, expected {KEY_LEN}", decoded.len())
                    .into(),
            ),
            error_kind: ErrorKind::InvalidKeyLength,
        })?;

        Ok(Self::from_bytes(bytes))
    }

    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self {
            bytes: Secret::new(bytes),
        }
    }

    /// The full AES-256 key.
    pub(crate) fn key_bytes(&self) -> &[u8; KEY_LEN] {
        self.bytes.expose_secret()
    }

    /// The CBC initialization vector: the first 16 key bytes.
    pub(crate) fn iv(&self) -> &[u8] {
        &self.key_bytes()[..IV_LEN]
    }
}

impl fmt::Debug for EncodingKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("EncodingKey([REDACTED])")
    }
}

impl std::str::FromStr for EncodingKey {
    type Err = Error;

    fn from_str(encoded: &str) -> Result<Self, Self::Err> {
        Self::parse(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};

    fn key_bytes() -> [u8; KEY_LEN] {
        let mut bytes = [0u8; KEY_LEN];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        bytes
    }

    #[test]
    fn test_parse_canonical_43_character_key() {
        let encoded = STANDARD_NO_PAD.encode(key_bytes());
        assert_eq!(encoded.len(), ENCODED_KEY_LEN);

        let key = EncodingKey::parse(&encoded).expect("key should parse");
        assert_eq!(key.key_bytes(), &key_bytes());
        assert_eq!(key.iv(), &key_bytes()[..IV_LEN]);
    }

    #[test]
    fn test_parse_padded_key() {
        let encoded = STANDARD.encode(key_bytes());
        assert!(EncodingKey::parse(&encoded).is_ok());
    }

    #[test]
    fn test_short_key_is_invalid_length() {
        let encoded = STANDARD_NO_PAD.encode([7u8; 24]);
        let result = EncodingKey::parse(&encoded);
        assert!(matches!(
            result,
            Err(Error {
                error_kind: ErrorKind::InvalidKeyLength,
                ..
            })
        ));
    }

    #[test]
    fn test_long_key_is_invalid_length() {
        let encoded = STANDARD_NO_PAD.encode([7u8; 33]);
        assert!(matches!(
            EncodingKey::parse(&encoded),
            Err(Error {
                error_kind: ErrorKind::InvalidKeyLength,
                ..
            })
        ));
    }

    #[test]
    fn test_non_base64_key_is_invalid_length() {
        assert!(matches!(
            EncodingKey::parse("not base64 at all!"),
            Err(Error {
                error_kind: ErrorKind::InvalidKeyLength,
                ..
            })
        ));
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let key = EncodingKey::from_bytes(key_bytes());
        assert_eq!(format!("{key:?}"), "EncodingKey([REDACTED])");
    }
}
