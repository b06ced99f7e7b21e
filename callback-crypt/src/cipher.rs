//! Raw AES-256-CBC block operations.
//!
//! Padding is never applied or checked at this layer; buffers must already be a whole number
//! of blocks. The pad is handled by [`crate::padding`].

use aes::Aes256;
use cbc::cipher::{block_padding::NoPadding, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::error::{callback_error, Error, ErrorKind};

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;

/// Trait for the block cipher behind the payload decryptor.
pub trait PayloadCipher: Send + Sync {
    /// Decrypt `buf` in place. `buf.len()` is a multiple of [`BLOCK_SIZE`].
    fn decrypt_blocks(&self, key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), Error>;

    /// Encrypt `buf` in place. `buf.len()` is a multiple of [`BLOCK_SIZE`].
    fn encrypt_blocks(&self, key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), Error>;
}

/// AES-256 in CBC mode with padding disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aes256Cbc;

impl PayloadCipher for Aes256Cbc {
    fn decrypt_blocks(&self, key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), Error> {
        let decryptor = Aes256CbcDec::new_from_slices(key, iv).map_err(|_| {
            callback_error(ErrorKind::CipherFailure, "Invalid AES-256-CBC key or IV length")
        })?;

        decryptor
            .decrypt_padded_mut::<NoPadding>(buf)
            .map_err(|_| callback_error(ErrorKind::CipherFailure, "Block decryption failed"))?;

        Ok(())
    }

    fn encrypt_blocks(&self, key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), Error> {
        let encryptor = Aes256CbcEnc::new_from_slices(key, iv).map_err(|_| {
            callback_error(ErrorKind::CipherFailure, "Invalid AES-256-CBC key or IV length")
        })?;

        let len = buf.len();
        encryptor
            .encrypt_padded_mut::<NoPadding>(buf, len)
            .map_err(|_| callback_error(ErrorKind::CipherFailure, "Block encryption failed"))?;

        Ok(())
    }
}
