use std::io::{self, Write};
use std::path::PathBuf;

use callback_crypt::{signature, CallbackEnvelope, MsgCrypt, UrlValidationParams};
use clap::{Parser, Subcommand};
use log::{debug, error, info};
use secrecy::ExposeSecret;
use service::{config::Config, logging::Logger};

/// Verify and decrypt fxiaoke open platform callbacks.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify and decrypt a callback envelope ({"sig", "timeStamp", "nonce", "content"} JSON).
    Decrypt {
        /// File holding the envelope JSON. Reads stdin when omitted.
        #[arg(long)]
        envelope: Option<PathBuf>,

        /// Print the depadded plaintext instead of the framed message.
        #[arg(long)]
        raw: bool,
    },
    /// Validate the signature of an identity-carrying redirect.
    ValidateUrl {
        #[arg(long)]
        code_sig: String,
        #[arg(long)]
        timestamp: String,
        #[arg(long)]
        nonce: String,
        #[arg(long)]
        code: String,
    },
    /// Print the signature the platform would send for these fields.
    Sign {
        #[arg(long)]
        timestamp: String,
        #[arg(long)]
        nonce: String,
        #[arg(long)]
        content: String,
    },
    /// Encrypt and sign a message into a callback envelope, as the platform would.
    Encrypt {
        message: String,

        /// Identifier appended after the message inside the frame.
        #[arg(long, default_value = "")]
        receiver_id: String,
    },
}

fn main() {
    Config::load_dotenv();
    let cli = Cli::parse();

    if let Err(e) = Logger::init_logger(&cli.config) {
        eprintln!("Failed to start simplelog: {e}");
    }

    let crypt = match service::init_msg_crypt(&cli.config) {
        Ok(crypt) => crypt,
        Err(e) => {
            error!("Invalid callback configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cli, &crypt) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, crypt: &MsgCrypt) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        Command::Decrypt { envelope, raw } => {
            let json = match envelope {
                Some(path) => std::fs::read_to_string(path)?,
                None => io::read_to_string(io::stdin())?,
            };
            let envelope: CallbackEnvelope = serde_json::from_str(&json)?;
            debug!("Decrypting callback with nonce {}", envelope.nonce);

            let output = if *raw {
                crypt.decrypt_plaintext(&envelope)?
            } else {
                crypt.decrypt_msg(&envelope)?.into_message()
            };

            let mut stdout = io::stdout().lock();
            stdout.write_all(&output)?;
            stdout.flush()?;
        }
        Command::ValidateUrl {
            code_sig,
            timestamp,
            nonce,
            code,
        } => {
            let params = UrlValidationParams {
                code_signature: code_sig.clone(),
                timestamp: timestamp.clone(),
                nonce: nonce.clone(),
                code: code.clone(),
            };
            crypt.validate_url(&params)?;
            info!("Redirect signature is valid");
        }
        Command::Sign {
            timestamp,
            nonce,
            content,
        } => {
            let token = cli.config.token().expose_secret();
            println!(
                "{}",
                signature::compute_signature(token, timestamp, nonce, content)
            );
        }
        Command::Encrypt {
            message,
            receiver_id,
        } => {
            let envelope = crypt.encrypt_msg(message.as_bytes(), receiver_id.as_bytes())?;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
    }

    Ok(())
}
