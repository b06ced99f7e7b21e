//! Decryption of the base64 callback body.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use log::debug;

use crate::cipher::{Aes256Cbc, PayloadCipher, BLOCK_SIZE};
use crate::error::{callback_error, Error, ErrorKind};
use crate::key::EncodingKey;

/// Reverses the AES-256-CBC encryption applied to a callback body.
///
/// The key and IV both come from the encoding key; see [`EncodingKey`]. The output still
/// carries its length padding.
#[derive(Debug, Clone, Default)]
pub struct PayloadDecryptor<C = Aes256Cbc> {
    cipher: C,
}

impl PayloadDecryptor<Aes256Cbc> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: PayloadCipher> PayloadDecryptor<C> {
    /// Use a specific block cipher implementation.
    pub fn with_cipher(cipher: C) -> Self {
        Self { cipher }
    }

    /// Decrypt with a base64 encoding key.
    ///
    /// The key is validated before anything else; an invalid key never reaches the cipher.
    pub fn decrypt(&self, encoding_key: &str, ciphertext_b64: &str) -> Result<Vec<u8>, Error> {
        let key = EncodingKey::parse(encoding_key)?;
        self.decrypt_with_key(&key, ciphertext_b64)
    }

    /// Decrypt with an already validated key.
    pub fn decrypt_with_key(
        &self,
        key: &EncodingKey,
        ciphertext_b64: &str,
    ) -> Result<Vec<u8>, Error> {
        let mut buf = BASE64.decode(ciphertext_b64)?;

        if buf.len() % BLOCK_SIZE != 0 {
            debug!(
                "Ciphertext of {} bytes is not a multiple of the {BLOCK_SIZE} byte block size",
                buf.len()
            );
            return Err(callback_error(
                ErrorKind::MalformedCiphertext,
                &format!(
                    "Ciphertext is {} bytes, not a multiple of {BLOCK_SIZE}",
                    buf.len()
                ),
            ));
        }

        self.cipher.decrypt_blocks(key.key_bytes(), key.iv(), &mut buf)?;
        Ok(buf)
    }

    /// Encrypt already padded plaintext and base64 encode it.
    ///
    /// The inverse of [`Self::decrypt_with_key`], used when acting as the sender.
    pub fn encrypt_with_key(&self, key: &EncodingKey, padded: &[u8]) -> Result<String, Error> {
        if padded.len() % BLOCK_SIZE != 0 {
            return Err(callback_error(
                ErrorKind::MalformedCiphertext,
                "Plaintext must be padded to the cipher block size",
            ));
        }

        let mut buf = padded.to_vec();
        self.cipher.encrypt_blocks(key.key_bytes(), key.iv(), &mut buf)?;
        Ok(BASE64.encode(buf))
    }
}

/// Decrypt a callback body with AES-256-CBC.
pub fn decrypt(encoding_key: &str, ciphertext_b64: &str) -> Result<Vec<u8>, Error> {
    PayloadDecryptor::new().decrypt(encoding_key, ciphertext_b64)
}
