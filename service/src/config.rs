use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use secrecy::SecretString;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

/// Largest tolerance `chrono::Duration` can hold.
const MAX_TOLERANCE_SECS: u64 = i64::MAX as u64 / 1000;

fn parse_secret(value: &str) -> Result<SecretString, Infallible> {
    Ok(SecretString::new(value.to_string()))
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The callback token set on the open platform. Only used to compute signatures.
    #[arg(long, env = "FXK_TOKEN", hide_env_values = true, value_parser = parse_secret)]
    token: SecretString,

    /// The EncodingAESKey set on the open platform: 43 base64 characters decoding to 32 bytes.
    #[arg(
        long,
        env = "FXK_ENCODING_AES_KEY",
        hide_env_values = true,
        value_parser = parse_secret
    )]
    encoding_aes_key: SecretString,

    /// Reject callbacks whose timestamp is further than this many seconds from now.
    /// Timestamps are not checked when unset.
    #[arg(long, env = "FXK_TIMESTAMP_TOLERANCE_SECS")]
    pub timestamp_tolerance_secs: Option<u64>,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Config {
    /// Loads the `.env` file, if any, so `env` fallbacks see its values.
    /// Binaries that embed `Config` in a larger parser call this before parsing.
    pub fn load_dotenv() {
        dotenv().ok();
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    pub fn encoding_aes_key(&self) -> &SecretString {
        &self.encoding_aes_key
    }

    /// Returns the timestamp freshness window, if configured.
    pub fn timestamp_tolerance(&self) -> Option<chrono::Duration> {
        self.timestamp_tolerance_secs
            .map(|secs| chrono::Duration::seconds(secs.min(MAX_TOLERANCE_SECS) as i64))
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }
}
