//! Layout of a decrypted callback body.
//!
//! ```text
//! [16 random bytes][u32 big-endian length L][L message bytes][trailing identifier]
//! ```

use log::debug;

use crate::error::{callback_error, Error, ErrorKind};

/// Length of the random prefix.
pub const RANDOM_PREFIX_LEN: usize = 16;

/// Length of the big-endian message length field.
pub const LENGTH_FIELD_LEN: usize = 4;

/// Smallest well-formed frame: prefix plus length field, empty message.
pub const MIN_FRAME_LEN: usize = RANDOM_PREFIX_LEN + LENGTH_FIELD_LEN;

/// A parsed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramedMessage {
    message: Vec<u8>,
    receiver_id: Vec<u8>,
}

impl FramedMessage {
    /// The application message.
    pub fn message(&self) -> &[u8] {
        &self.message
    }

    /// Bytes following the message, usually the receiving app or corp identifier.
    /// Not interpreted by this crate.
    pub fn receiver_id(&self) -> &[u8] {
        &self.receiver_id
    }

    /// Take ownership of the message bytes.
    pub fn into_message(self) -> Vec<u8> {
        self.message
    }
}

/// Extract the message from depadded plaintext.
///
/// Returns `TruncatedPayload` if the input is too short for its own length field.
pub fn parse(depadded: &[u8]) -> Result<FramedMessage, Error> {
    if depadded.len() < MIN_FRAME_LEN {
        debug!(
            "Plaintext of {} bytes is shorter than the {MIN_FRAME_LEN} byte frame header",
            depadded.len()
        );
        return Err(callback_error(
            ErrorKind::TruncatedPayload,
            &format!(
                "Plaintext is {} bytes, frame header needs {MIN_FRAME_LEN}",
                depadded.len()
            ),
        ));
    }

    let body = &depadded[RANDOM_PREFIX_LEN..];
    let (length_field, rest) = body.split_at(LENGTH_FIELD_LEN);
    let mut length_bytes = [0u8; LENGTH_FIELD_LEN];
    length_bytes.copy_from_slice(length_field);
    let message_len = u32::from_be_bytes(length_bytes) as usize;

    if rest.len() < message_len {
        debug!(
            "Frame declares {message_len} message bytes but only {} remain",
            rest.len()
        );
        return Err(callback_error(
            ErrorKind::TruncatedPayload,
            &format!(
                "Frame declares {message_len} message bytes, only {} present",
                rest.len()
            ),
        ));
    }

    let (message, receiver_id) = rest.split_at(message_len);
    Ok(FramedMessage {
        message: message.to_vec(),
        receiver_id: receiver_id.to_vec(),
    })
}

/// Encode a message length as the frame's length field.
///
/// Returns `MessageTooLarge` past `u32::MAX` bytes.
fn length_field(message_len: usize) -> Result<[u8; LENGTH_FIELD_LEN], Error> {
    u32::try_from(message_len)
        .map(u32::to_be_bytes)
        .map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::MessageTooLarge,
        })
}

/// Build a frame around `message`.
pub fn frame(
    random_prefix: &[u8; RANDOM_PREFIX_LEN],
    message: &[u8],
    receiver_id: &[u8],
) -> Result<Vec<u8>, Error> {
    let length = length_field(message.len())?;

    let mut framed = Vec::with_capacity(MIN_FRAME_LEN + message.len() + receiver_id.len());
    framed.extend_from_slice(random_prefix);
    framed.extend_from_slice(&length);
    framed.extend_from_slice(message);
    framed.extend_from_slice(receiver_id);
    Ok(framed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello_frame() -> Vec<u8> {
        let mut bytes = vec![0u8; RANDOM_PREFIX_LEN];
        bytes.extend_from_slice(&[0, 0, 0, 5]);
        bytes.extend_from_slice(b"hello");
        bytes.extend_from_slice(b"FSAID_corp");
        bytes
    }

    #[test]
    fn test_parse_extracts_message_and_receiver() {
        let parsed = parse(&hello_frame()).expect("frame should parse");
        assert_eq!(parsed.message(), b"hello");
        assert_eq!(parsed.receiver_id(), b"FSAID_corp");
    }

    #[test]
    fn test_parse_without_receiver_id() {
        let bytes = frame(&[9u8; RANDOM_PREFIX_LEN], b"hello", b"").unwrap();
        let parsed = parse(&bytes).unwrap();
        assert_eq!(parsed.message(), b"hello");
        assert!(parsed.receiver_id().is_empty());
    }

    #[test]
    fn test_parse_empty_message() {
        let parsed = parse(&[0u8; MIN_FRAME_LEN]).unwrap();
        assert!(parsed.message().is_empty());
    }

    #[test]
    fn test_nineteen_bytes_is_truncated() {
        let result = parse(&[0u8; 19]);
        assert!(matches!(
            result,
            Err(Error {
                error_kind: ErrorKind::TruncatedPayload,
                ..
            })
        ));
    }

    #[test]
    fn test_shorter_than_prefix_is_truncated() {
        for len in [0, 1, 15, 16] {
            assert!(matches!(
                parse(&vec![0u8; len]),
                Err(Error {
                    error_kind: ErrorKind::TruncatedPayload,
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_declared_length_past_end_is_truncated() {
        let mut bytes = hello_frame();
        bytes.truncate(MIN_FRAME_LEN + 4);
        assert!(matches!(
            parse(&bytes),
            Err(Error {
                error_kind: ErrorKind::TruncatedPayload,
                ..
            })
        ));
    }

    #[test]
    fn test_huge_declared_length_does_not_panic() {
        let mut bytes = vec![0u8; RANDOM_PREFIX_LEN];
        bytes.extend_from_slice(&u32::MAX.to_be_bytes());
        bytes.extend_from_slice(b"tiny");
        assert!(parse(&bytes).is_err());
    }

    #[test]
    fn test_frame_layout() {
        let bytes = frame(&[0u8; RANDOM_PREFIX_LEN], b"hello", b"corp").unwrap();
        assert_eq!(&bytes[..RANDOM_PREFIX_LEN], &[0u8; RANDOM_PREFIX_LEN]);
        assert_eq!(&bytes[RANDOM_PREFIX_LEN..MIN_FRAME_LEN], &[0, 0, 0, 5]);
        assert_eq!(&bytes[MIN_FRAME_LEN..], b"hellocorp");
    }

    #[test]
    fn test_length_field_accepts_u32_max() {
        assert_eq!(length_field(u32::MAX as usize).unwrap(), [0xff; 4]);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_length_field_rejects_oversized_message() {
        let result = length_field(u32::MAX as usize + 1);
        assert!(matches!(
            result,
            Err(Error {
                error_kind: ErrorKind::MessageTooLarge,
                ..
            })
        ));
    }
}
