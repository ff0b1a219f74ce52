//! Error types for p7sign operations.
//!
//! This module defines the [`enum@Error`] enum covering every failure of the
//! signing and verification pipelines, and the [`ErrorCategory`] grouping used
//! to derive process exit codes.
//!
//! A rejected signature is *not* an error: it is reported through
//! [`crate::VerificationOutcome::Rejected`] so callers can tell "this
//! signature is invalid" apart from "this file could not be read".
//!
//! # See Also
//!
//! - [`crate::Result`] - Convenience type alias using this error

use std::path::PathBuf;
use thiserror::Error;

/// Exit code returned when a container was read and decoded but its signature
/// was rejected.
pub const EXIT_REJECTED: i32 = 1;

/// Error type for p7sign operations.
///
/// All public functions in this crate return [`crate::Result<T>`], which uses
/// this error type. Match on variants to handle specific failure cases, or use
/// [`Error::category`] to handle them by class.
///
/// # Examples
///
/// ```no_run
/// use p7sign::{Error, P7Sign};
///
/// let result = P7Sign::new()
///     .credential("signer.p12")
///     .password("secret")
///     .sign("report.pdf", "report.p7");
/// match result {
///     Ok(()) => println!("Signed successfully"),
///     Err(Error::BundleParse(msg)) => eprintln!("Bad bundle or password: {msg}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum Error {
    /// The content file to be signed could not be opened or read.
    #[error("Failed to read input {}: {source}", .path.display())]
    InputOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The output file could not be created.
    #[error("Failed to create output {}: {source}", .path.display())]
    OutputOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The output file was created but writing to it failed.
    #[error("Failed to write output {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The credential or trust anchor file could not be opened or read.
    #[error("Failed to read credential {}: {source}", .path.display())]
    CredentialOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The signature container file could not be opened or read.
    #[error("Failed to read container {}: {source}", .path.display())]
    ContainerRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The credential path has an extension other than `.pem` or `.p12`.
    #[error("Unrecognized credential format: {} (expected .pem or .p12)", .0.display())]
    UnrecognizedFormat(PathBuf),

    /// The certificate block of a PEM bundle is missing or malformed.
    #[error("Invalid certificate: {0}")]
    CertificateParse(String),

    /// The private key block of a PEM bundle is missing, malformed, or could
    /// not be decrypted with the supplied password.
    #[error("Invalid private key: {0}")]
    KeyParse(String),

    /// The PKCS#12 archive is malformed, incomplete, or the password is wrong.
    #[error("Invalid PKCS#12 bundle: {0}")]
    BundleParse(String),

    /// The loaded private key does not belong to the loaded certificate.
    #[error("Private key does not match certificate public key")]
    KeyMismatch,

    /// OpenSSL could not produce a signature with the given identity.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// The trust store could not be assembled.
    #[error("Trust store error: {0}")]
    TrustStore(String),

    /// The signed container could not be serialized to DER.
    #[error("Failed to encode container: {0}")]
    Encode(String),

    /// The container bytes are not a DER PKCS#7 structure.
    #[error("Failed to decode container: {0}")]
    Decode(String),

    /// Invalid builder configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of [`enum@Error`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Open, read or write failure on any file.
    Io,
    /// Unrecognized credential extension.
    Format,
    /// Malformed certificate, key or bundle, or wrong password.
    Parse,
    /// The signing or trust-store operation failed inside OpenSSL.
    Crypto,
    /// Container serialization failure.
    Encode,
    /// Container deserialization failure.
    Decode,
    /// Invalid caller configuration.
    Config,
}

impl ErrorCategory {
    /// Process exit code for this category. Never 0, never [`EXIT_REJECTED`].
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorCategory::Io => 2,
            ErrorCategory::Format => 3,
            ErrorCategory::Parse => 4,
            ErrorCategory::Crypto => 5,
            ErrorCategory::Encode => 6,
            ErrorCategory::Decode => 7,
            ErrorCategory::Config => 8,
        }
    }
}

impl Error {
    /// Returns the category this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InputOpen { .. }
            | Error::OutputOpen { .. }
            | Error::OutputWrite { .. }
            | Error::CredentialOpen { .. }
            | Error::ContainerRead { .. } => ErrorCategory::Io,
            Error::UnrecognizedFormat(_) => ErrorCategory::Format,
            Error::CertificateParse(_)
            | Error::KeyParse(_)
            | Error::BundleParse(_)
            | Error::KeyMismatch => ErrorCategory::Parse,
            Error::Signing(_) | Error::TrustStore(_) => ErrorCategory::Crypto,
            Error::Encode(_) => ErrorCategory::Encode,
            Error::Decode(_) => ErrorCategory::Decode,
            Error::Config(_) => ErrorCategory::Config,
        }
    }

    /// Shorthand for `self.category().exit_code()`.
    pub fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }
}
