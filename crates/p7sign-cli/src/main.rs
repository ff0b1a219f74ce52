//! Command-line interface for p7sign.
//!
//! Signs files into DER PKCS#7 containers using PEM or PKCS#12 credentials,
//! and verifies containers against trusted CA certificates.

use clap::{Parser, Subcommand};
use p7sign::entry::{run_sign, run_verify};
use p7sign::P7Sign;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "p7sign")]
#[command(about = "PKCS#7 file signing and verification")]
#[command(long_about = "
p7sign - PKCS#7 file signing and verification

EXAMPLES:
    # Sign with an unencrypted PEM bundle (certificate + key in one file)
    p7sign sign payload.bin signer.pem -o payload.p7

    # Sign with a PKCS#12 archive
    p7sign sign payload.bin signer.p12 --password secret -o payload.p7

    # Verify and recover the content
    p7sign verify root-ca.pem payload.p7 -o payload.bin

EXIT CODES:
    0 success, 1 signature rejected, 2 I/O, 3 unknown credential format,
    4 bad certificate/key/bundle, 5 crypto, 6 encode, 7 decode, 8 config

ENVIRONMENT VARIABLES:
    P7SIGN_PASSWORD  Password for the credential (instead of --password)
    RUST_LOG         Logging level (debug, info, warn, error)
")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign a file into a PKCS#7 container
    Sign {
        /// File to sign
        content: PathBuf,

        /// Signing credential (.pem bundle or .p12 archive)
        credential: PathBuf,

        /// Output container file
        #[arg(short, long)]
        output: PathBuf,

        /// Password for the PEM private key or PKCS#12 archive
        #[arg(long, env = "P7SIGN_PASSWORD", hide_env_values = true, default_value = "")]
        password: String,
    },

    /// Verify a PKCS#7 container and write the signed content
    Verify {
        /// Trusted CA certificate (.pem or .p12)
        anchor: PathBuf,

        /// Container to verify
        container: PathBuf,

        /// Output file for the recovered content
        #[arg(short, long)]
        output: PathBuf,

        /// Additional trusted CA certificates
        #[arg(long = "anchor", value_name = "ANCHOR")]
        extra_anchors: Vec<PathBuf>,

        /// Check the signature only, without building a chain to an anchor
        #[arg(long)]
        no_chain: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Sign {
            content,
            credential,
            output,
            password,
        } => {
            let mut p7 = P7Sign::new().credential(credential);
            if !password.is_empty() {
                p7 = p7.password(password);
            }
            run_sign(&p7, content, output)
        }
        Commands::Verify {
            anchor,
            container,
            output,
            extra_anchors,
            no_chain,
        } => {
            let p7 = extra_anchors
                .into_iter()
                .fold(P7Sign::new().anchor(anchor), |p7, extra| p7.anchor(extra))
                .verify_chain(!no_chain);
            run_verify(&p7, container, output)
        }
    };

    log::debug!("Exiting with code {}", code);
    std::process::exit(code);
}
