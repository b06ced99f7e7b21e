//! # callback-crypt
//!
//! Authentication and decryption of callbacks pushed by the fxiaoke open platform:
//! - SHA-1 signature verification over the sorted callback fields
//! - AES-256-CBC decryption of the callback body, keyed by the `EncodingAESKey`
//! - Lenient removal of the 32 byte block padding
//! - Parsing of the length-prefixed message frame
//! - Signature validation of identity-carrying redirect URLs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use callback_crypt::{CallbackEnvelope, MsgCrypt};
//! use secrecy::SecretString;
//!
//! let crypt = MsgCrypt::new(SecretString::new(token), &encoding_aes_key)?;
//! let envelope: CallbackEnvelope = serde_json::from_slice(&body)?;
//! let message = crypt.decrypt_msg(&envelope)?;
//! ```
//!
//! Every stage is also usable on its own through [`signature`], [`decrypt`], [`padding`]
//! and [`framing`].

pub mod cipher;
pub mod crypt;
pub mod decrypt;
pub mod envelope;
pub mod error;
pub mod framing;
pub mod key;
pub mod padding;
pub mod signature;
pub mod url;

// Re-export commonly used types
pub use crypt::MsgCrypt;
pub use envelope::{CallbackEnvelope, UrlValidationParams};
pub use error::{Error, ErrorKind};
pub use framing::FramedMessage;
pub use key::EncodingKey;
