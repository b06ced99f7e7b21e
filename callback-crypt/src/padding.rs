//! Length padding applied to callback plaintext before encryption.
//!
//! Senders pad to a multiple of [`PAD_BLOCK_SIZE`] with `n` copies of the byte `n`. Removal
//! only looks at the last byte and never checks the pad bytes themselves. An out-of-range pad
//! value means "not padded" rather than an error, matching the platform's own decoder.

/// Block size the pad rounds up to.
pub const PAD_BLOCK_SIZE: usize = 32;

/// Strip the trailing pad from `bytes`.
///
/// If the last byte is outside `1..=32` the input is returned unchanged.
pub fn remove_padding(bytes: &[u8]) -> &[u8] {
    let pad = match bytes.last() {
        Some(&last) if (1..=PAD_BLOCK_SIZE).contains(&(last as usize)) => last as usize,
        _ => 0,
    };
    &bytes[..bytes.len().saturating_sub(pad)]
}

/// Pad `bytes` up to the next multiple of [`PAD_BLOCK_SIZE`].
///
/// Always appends at least one byte; an already aligned input gains a full block.
pub fn add_padding(mut bytes: Vec<u8>) -> Vec<u8> {
    let pad = PAD_BLOCK_SIZE - (bytes.len() % PAD_BLOCK_SIZE);
    bytes.resize(bytes.len() + pad, pad as u8);
    bytes
}
