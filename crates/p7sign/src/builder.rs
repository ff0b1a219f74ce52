//! P7Sign builder API
//!
//! Provides a builder pattern interface for signing files and verifying
//! signed containers. Holds the configuration shared by the CLI and library
//! callers: which credential to sign with, its password, which anchors to
//! trust, and whether to check the signer's chain.

use crate::crypto::{build_trust_store_from, SignerIdentity, TrustStore};
use crate::pipeline::{self, VerificationOutcome, VerifyOptions};
use crate::{Error, Result};
use secrecy::SecretString;
use std::path::{Path, PathBuf};

/// PKCS#7 signing and verification with builder pattern API.
///
/// # Example
///
/// ```no_run
/// use p7sign::P7Sign;
///
/// P7Sign::new()
///     .credential("signer.p12")
///     .password("secret")
///     .sign("report.pdf", "report.p7")?;
///
/// let outcome = P7Sign::new()
///     .anchor("root-ca.pem")
///     .verify("report.p7", "report.pdf")?;
/// assert!(outcome.is_verified());
/// # Ok::<(), p7sign::Error>(())
/// ```
#[derive(Clone)]
pub struct P7Sign {
    credential: Option<PathBuf>,
    password: Option<SecretString>,
    anchors: Vec<PathBuf>,
    verify_chain: bool,
}

impl P7Sign {
    /// Create a new P7Sign builder.
    pub fn new() -> Self {
        Self {
            credential: None,
            password: None,
            anchors: Vec::new(),
            verify_chain: true,
        }
    }

    /// Set the signing credential (`.pem` bundle or `.p12` archive).
    pub fn credential(mut self, path: impl AsRef<Path>) -> Self {
        self.credential = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set password for the PEM private key or PKCS#12 archive.
    ///
    /// The password is stored securely and will be zeroized when dropped.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::new(password.into()));
        self
    }

    /// Add a trust anchor certificate (`.pem` or `.p12`). May be called
    /// repeatedly; the store trusts the union of all anchors.
    pub fn anchor(mut self, path: impl AsRef<Path>) -> Self {
        self.anchors.push(path.as_ref().to_path_buf());
        self
    }

    /// Whether verification builds the signer's chain to an anchor.
    ///
    /// Default is `true`. With `false` only the signature is checked against
    /// the certificate embedded in the container.
    pub fn verify_chain(mut self, verify_chain: bool) -> Self {
        self.verify_chain = verify_chain;
        self
    }

    /// Validate the configuration needed for signing.
    pub fn validate_signing(&self) -> Result<()> {
        if self.credential.is_none() {
            return Err(Error::Config("No signing credential specified".into()));
        }
        Ok(())
    }

    /// Validate the configuration needed for verification.
    pub fn validate_verification(&self) -> Result<()> {
        if self.anchors.is_empty() {
            return Err(Error::Config("At least one trust anchor is required".into()));
        }
        Ok(())
    }

    /// Load the signer identity from the configured credential.
    pub fn load_identity(&self) -> Result<SignerIdentity> {
        self.validate_signing()?;
        let credential = self
            .credential
            .as_ref()
            .ok_or_else(|| Error::Config("No signing credential specified".into()))?;
        SignerIdentity::load(credential, self.password.as_ref())
    }

    /// Build the trust store from the configured anchors.
    pub fn trust_store(&self) -> Result<TrustStore> {
        self.validate_verification()?;
        build_trust_store_from(self.anchors.as_slice())
    }

    fn verify_options(&self) -> VerifyOptions {
        VerifyOptions {
            verify_chain: self.verify_chain,
        }
    }

    /// Sign `input` and write the DER PKCS#7 container to `output`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No credential is configured, or it cannot be loaded
    /// - The input cannot be read or signing fails
    /// - The output cannot be written
    pub fn sign(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<()> {
        let identity = self.load_identity()?;
        pipeline::sign(identity, input, output)
    }

    /// Sign an in-memory buffer and return the DER container.
    pub fn sign_bytes(&self, content: &[u8]) -> Result<Vec<u8>> {
        let identity = self.load_identity()?;
        let pkcs7 = pipeline::sign_content(&identity, content)?;
        pipeline::encode(&pkcs7)
    }

    /// Verify the container at `container` and write its content to `output`.
    ///
    /// # Errors
    ///
    /// Returns an error for configuration, anchor, I/O and decode failures.
    /// An invalid signature is `Ok(VerificationOutcome::Rejected(_))`.
    pub fn verify(
        &self,
        container: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<VerificationOutcome> {
        let store = self.trust_store()?;
        pipeline::verify_with(&store, container, output, self.verify_options())
    }

    /// Verify DER container bytes and return the outcome.
    pub fn verify_bytes(&self, container: &[u8]) -> Result<VerificationOutcome> {
        let store = self.trust_store()?;
        let pkcs7 = pipeline::decode(container)?;
        Ok(pipeline::verify_content(&store, &pkcs7, self.verify_options()))
    }
}

impl Default for P7Sign {
    fn default() -> Self {
        Self::new()
    }
}
