use callback_crypt::{Error, MsgCrypt};
use config::Config;
use log::info;
use secrecy::ExposeSecret;

pub mod config;
pub mod logging;

/// Builds the callback crypto from configuration.
///
/// An invalid encoding key here is a deployment error; callers should treat it as fatal.
pub fn init_msg_crypt(config: &Config) -> Result<MsgCrypt, Error> {
    let crypt = MsgCrypt::new(
        config.token().clone(),
        config.encoding_aes_key().expose_secret(),
    )?;

    match config.timestamp_tolerance() {
        Some(tolerance) => {
            info!(
                "Callback crypto ready, timestamp tolerance {}s",
                tolerance.num_seconds()
            );
            Ok(crypt.with_timestamp_tolerance(tolerance))
        }
        None => {
            info!("Callback crypto ready, timestamp checks disabled");
            Ok(crypt)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callback_crypt::ErrorKind;
    use clap::Parser;

    fn config(encoding_aes_key: &str) -> Config {
        Config::try_parse_from([
            "fxk_callback",
            "--token",
            "tok",
            "--encoding-aes-key",
            encoding_aes_key,
        ])
        .unwrap()
    }

    #[test]
    fn test_init_msg_crypt_with_valid_key() {
        let config = config("abcdefghijklmnopqrstuvwxyz0123456789ABCDEFG");
        assert!(init_msg_crypt(&config).is_ok());
    }

    #[test]
    fn test_init_msg_crypt_with_short_key_is_invalid_key_length() {
        let config = config("c2hvcnQta2V5");
        let err = init_msg_crypt(&config).err().unwrap();
        assert_eq!(err.error_kind, ErrorKind::InvalidKeyLength);
    }
}
