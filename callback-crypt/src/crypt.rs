//! The full inbound pipeline: verify, decrypt, depad, parse.

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use rand::distributions::Alphanumeric;
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};

use crate::cipher::{Aes256Cbc, PayloadCipher};
use crate::decrypt::PayloadDecryptor;
use crate::envelope::{CallbackEnvelope, UrlValidationParams};
use crate::error::{Error, ErrorKind};
use crate::framing::{self, FramedMessage, RANDOM_PREFIX_LEN};
use crate::key::EncodingKey;
use crate::padding;
use crate::signature::{check_signature, compute_signature};
use crate::url::validate_url;

/// Length of nonces generated for outbound envelopes.
const NONCE_LEN: usize = 16;

/// Callback crypto bound to one token and encoding key.
///
/// Immutable once built; share it across threads by reference or `Arc`.
pub struct MsgCrypt<C = Aes256Cbc> {
    token: SecretString,
    encoding_key: EncodingKey,
    decryptor: PayloadDecryptor<C>,
    timestamp_tolerance: Option<Duration>,
}

impl MsgCrypt<Aes256Cbc> {
    /// Build from the token and `EncodingAESKey` configured on the platform.
    ///
    /// Fails with `InvalidKeyLength` if the key does not decode to 32 bytes.
    pub fn new(token: SecretString, encoding_aes_key: &str) -> Result<Self, Error> {
        Self::with_cipher(token, encoding_aes_key, Aes256Cbc)
    }
}

impl<C: PayloadCipher> MsgCrypt<C> {
    pub fn with_cipher(
        token: SecretString,
        encoding_aes_key: &str,
        cipher: C,
    ) -> Result<Self, Error> {
        let encoding_key = EncodingKey::parse(encoding_aes_key)?;
        Ok(Self {
            token,
            encoding_key,
            decryptor: PayloadDecryptor::with_cipher(cipher),
            timestamp_tolerance: None,
        })
    }

    /// Reject callbacks whose timestamp (Unix seconds) is further than `tolerance` from now.
    ///
    /// Off by default.
    pub fn with_timestamp_tolerance(mut self, tolerance: Duration) -> Self {
        self.timestamp_tolerance = Some(tolerance);
        self
    }

    /// Authenticate a callback without decrypting it.
    pub fn verify_signature(
        &self,
        signature: &str,
        timestamp: &str,
        nonce: &str,
        content: &str,
    ) -> Result<(), Error> {
        check_signature(self.token.expose_secret(), signature, timestamp, nonce, content)
            .inspect_err(|e| warn!("Rejected callback signature: {}", e.error_kind))?;
        self.check_freshness(timestamp, Utc::now())
    }

    /// Validate an identity-carrying redirect.
    pub fn validate_url(&self, params: &UrlValidationParams) -> Result<(), Error> {
        validate_url(
            self.token.expose_secret(),
            &params.code_signature,
            &params.timestamp,
            &params.nonce,
            &params.code,
        )
        .inspect_err(|e| warn!("Rejected redirect signature: {}", e.error_kind))?;
        self.check_freshness(&params.timestamp, Utc::now())
    }

    /// Verify and decrypt a callback, returning the depadded plaintext without parsing its frame.
    pub fn decrypt_plaintext(&self, envelope: &CallbackEnvelope) -> Result<Vec<u8>, Error> {
        self.verify_signature(
            &envelope.signature,
            &envelope.timestamp,
            &envelope.nonce,
            &envelope.content,
        )?;

        let mut plaintext = self
            .decryptor
            .decrypt_with_key(&self.encoding_key, &envelope.content)?;
        let depadded_len = padding::remove_padding(&plaintext).len();
        plaintext.truncate(depadded_len);

        debug!("Decrypted callback body of {depadded_len} bytes");
        Ok(plaintext)
    }

    /// Verify, decrypt and unframe a callback.
    pub fn decrypt_msg(&self, envelope: &CallbackEnvelope) -> Result<FramedMessage, Error> {
        let plaintext = self.decrypt_plaintext(envelope)?;
        framing::parse(&plaintext)
    }

    /// Build a signed, encrypted envelope carrying `message`, as the platform would.
    pub fn encrypt_msg(
        &self,
        message: &[u8],
        receiver_id: &[u8],
    ) -> Result<CallbackEnvelope, Error> {
        let mut rng = rand::thread_rng();
        let random_prefix: [u8; RANDOM_PREFIX_LEN] = rng.gen();
        let nonce: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(NONCE_LEN)
            .map(char::from)
            .collect();
        let timestamp = Utc::now().timestamp().to_string();

        let framed = framing::frame(&random_prefix, message, receiver_id)?;
        let padded = padding::add_padding(framed);
        let content = self.decryptor.encrypt_with_key(&self.encoding_key, &padded)?;
        let signature =
            compute_signature(self.token.expose_secret(), &timestamp, &nonce, &content);

        Ok(CallbackEnvelope {
            signature,
            timestamp,
            nonce,
            content,
        })
    }

    fn check_freshness(&self, timestamp: &str, now: DateTime<Utc>) -> Result<(), Error> {
        let Some(tolerance) = self.timestamp_tolerance else {
            return Ok(());
        };

        let seconds: i64 = timestamp.trim().parse().map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::TimestampExpired,
        })?;

        let skew = now.timestamp().abs_diff(seconds);
        if skew > tolerance.num_seconds().unsigned_abs() {
            warn!(
                "Rejected callback timestamp {seconds}: {skew}s from now, tolerance {}s",
                tolerance.num_seconds()
            );
            return Err(Error {
                source: Some(format!("Timestamp is {skew}s from now").into()),
                error_kind: ErrorKind::TimestampExpired,
            });
        }

        Ok(())
    }
}
