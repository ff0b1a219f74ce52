//! Verification engine: DER PKCS#7 container in, recovered content out.

use super::output::PendingOutput;
use crate::crypto::init::ensure_initialized;
use crate::crypto::TrustStore;
use crate::{Error, Result};
use openssl::pkcs7::{Pkcs7, Pkcs7Flags};
use openssl::stack::Stack;
use openssl::x509::X509;
use std::fs;
use std::path::Path;

/// Result of checking a decoded container against a trust store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Signature valid and the signer chains to an anchor; holds the content.
    Verified(Vec<u8>),
    /// Signature invalid, signer untrusted, or certificate unusable.
    Rejected(String),
}

impl VerificationOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationOutcome::Verified(_))
    }

    /// The recovered content, if verified.
    pub fn content(&self) -> Option<&[u8]> {
        match self {
            VerificationOutcome::Verified(content) => Some(content.as_slice()),
            VerificationOutcome::Rejected(_) => None,
        }
    }
}

/// Knobs for [`verify_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Build and check the signer's chain to a trust anchor. When `false`
    /// only the signature against the embedded certificate is checked.
    pub verify_chain: bool,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self { verify_chain: true }
    }
}

impl VerifyOptions {
    fn flags(&self) -> Pkcs7Flags {
        if self.verify_chain {
            Pkcs7Flags::empty()
        } else {
            Pkcs7Flags::NOVERIFY
        }
    }
}

/// Parse DER container bytes.
///
/// # Errors
///
/// Returns [`Error::Decode`] for malformed, truncated or non-PKCS#7 input.
pub fn decode(der: &[u8]) -> Result<Pkcs7> {
    ensure_initialized();
    Pkcs7::from_der(der).map_err(|e| Error::Decode(format!("Invalid PKCS#7 container: {}", e)))
}

/// Check a decoded container against `store`.
///
/// OpenSSL's verdict is final; there is no fallback.
pub fn verify_content(
    store: &TrustStore,
    pkcs7: &Pkcs7,
    options: VerifyOptions,
) -> VerificationOutcome {
    ensure_initialized();

    let certs = match Stack::<X509>::new() {
        Ok(certs) => certs,
        Err(e) => return VerificationOutcome::Rejected(format!("Failed to allocate stack: {}", e)),
    };

    let mut content = Vec::new();
    match pkcs7.verify(&certs, store.store(), None, Some(&mut content), options.flags()) {
        Ok(()) => VerificationOutcome::Verified(content),
        Err(e) => VerificationOutcome::Rejected(format!("Verification failure: {}", e)),
    }
}

/// Verify the container at `container` and write its content to `output`.
///
/// Equivalent to [`verify_with`] using [`VerifyOptions::default`].
pub fn verify(
    store: &TrustStore,
    container: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<VerificationOutcome> {
    verify_with(store, container, output, VerifyOptions::default())
}

/// Verify the container at `container` and write its content to `output`.
///
/// A rejected container is not an error: the call returns
/// `Ok(VerificationOutcome::Rejected(_))` and `output` does not exist
/// afterwards.
///
/// # Errors
///
/// - [`Error::ContainerRead`] if `container` cannot be read
/// - [`Error::Decode`] if it is not a DER PKCS#7 structure (nothing is verified)
/// - [`Error::Config`] if `output` is the same file as `container`
/// - [`Error::OutputOpen`] / [`Error::OutputWrite`] if `output` cannot be written
pub fn verify_with(
    store: &TrustStore,
    container: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: VerifyOptions,
) -> Result<VerificationOutcome> {
    let container = container.as_ref();
    let output = output.as_ref();

    let der = fs::read(container).map_err(|source| Error::ContainerRead {
        path: container.to_path_buf(),
        source,
    })?;
    let pkcs7 = decode(&der)?;

    let mut out = PendingOutput::create(output, container)?;

    let outcome = verify_content(store, &pkcs7, options);
    match outcome {
        VerificationOutcome::Verified(ref content) => {
            out.write_all(content)?;
            out.commit();
            log::info!(
                "Verified {} -> {} ({} bytes)",
                container.display(),
                output.display(),
                content.len()
            );
        }
        VerificationOutcome::Rejected(ref reason) => {
            drop(out);
            log::warn!("Rejected {}: {}", container.display(), reason);
        }
    }

    Ok(outcome)
}
