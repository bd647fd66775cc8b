//! Prints the `X-Hub-Signature-256` header value for a payload, so signed
//! requests can be sent to a running server by hand, e.g.
//!
//! ```text
//! curl -H "X-Hub-Signature-256: $(sign_payload payload.json)" --data-binary @payload.json ...
//! ```

use clap::Parser;
use log::error;
use secrecy::SecretString;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::io::Read;
use std::path::PathBuf;
use webhook_auth::ShaSignatureVerifier;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The secret shared with the server
    #[arg(long, env, hide_env_values = true)]
    webhook_secret: SecretString,

    /// File holding the exact bytes to sign; reads stdin when omitted
    payload: Option<PathBuf>,
}

fn read_payload(path: Option<&PathBuf>) -> std::io::Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path),
        None => {
            let mut payload = Vec::new();
            std::io::stdin().read_to_end(&mut payload)?;
            Ok(payload)
        }
    }
}

fn main() {
    if let Err(e) = TermLogger::init(
        simplelog::LevelFilter::Warn,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize logger: {e}");
        std::process::exit(1);
    }

    let args = Args::parse();

    let payload = match read_payload(args.payload.as_ref()) {
        Ok(payload) => payload,
        Err(e) => {
            error!("Failed to read payload: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "{}",
        ShaSignatureVerifier::new(args.webhook_secret).sign(&payload)
    );
}
