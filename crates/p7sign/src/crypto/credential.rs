//! Signer identity and trust anchor loading.
//!
//! Credentials come either as a PEM text bundle (certificate block plus a
//! private key block, the key optionally encrypted) or as a password protected
//! PKCS#12 archive. The format is picked by [`ContainerFormat::from_path`]
//! before the file is opened.
//!
//! # Examples
//!
//! ```no_run
//! use p7sign::crypto::{SignerIdentity, TrustAnchor};
//! use secrecy::SecretString;
//!
//! let password = SecretString::new("secret".to_string());
//! let identity = SignerIdentity::load("signer.p12", Some(&password))?;
//! let anchor = TrustAnchor::load("root-ca.pem")?;
//! # Ok::<(), p7sign::Error>(())
//! ```

use crate::crypto::format::ContainerFormat;
use crate::crypto::init::ensure_initialized;
use crate::{Error, Result};
use openssl::pkcs12::{ParsedPkcs12_2, Pkcs12};
use openssl::pkey::{PKey, Private};
use openssl::x509::{X509Ref, X509};
use secrecy::{ExposeSecret, SecretString};
use std::fs;
use std::path::Path;

/// Certificate and private key used to produce one signature.
///
/// Both halves are always present and the key always matches the
/// certificate; a partially loaded identity is never returned.
///
/// # Security
///
/// The private key is sensitive. The [`Debug`](std::fmt::Debug) impl prints
/// only the certificate subject.
pub struct SignerIdentity {
    /// X.509 signing certificate, embedded in every container produced.
    pub certificate: X509,
    /// Private key corresponding to the certificate's public key.
    pub private_key: PKey<Private>,
}

impl SignerIdentity {
    /// Load an identity from a `.pem` or `.p12` file.
    ///
    /// For PEM the password, when given, decrypts the private key block; with
    /// no password the key must be stored unencrypted. For PKCS#12 a missing
    /// password is tried as the empty string.
    ///
    /// # Errors
    ///
    /// - [`Error::UnrecognizedFormat`] if the extension is neither `.pem` nor `.p12`
    /// - [`Error::CredentialOpen`] if the file cannot be read
    /// - [`Error::CertificateParse`] / [`Error::KeyParse`] for a bad PEM bundle
    /// - [`Error::BundleParse`] for a bad PKCS#12 archive or wrong password
    /// - [`Error::KeyMismatch`] if the key does not belong to the certificate
    pub fn load(path: impl AsRef<Path>, password: Option<&SecretString>) -> Result<Self> {
        let path = path.as_ref();
        let format = ContainerFormat::from_path(path)?;
        ensure_initialized();

        log::debug!("Loading {} signer identity from {}", format, path.display());
        let data = read_credential(path)?;

        match format {
            ContainerFormat::TextBundle => Self::from_pem(&data, password),
            ContainerFormat::BinaryBundle => Self::from_p12(&data, password),
        }
    }

    /// Parse a PEM bundle holding a certificate and a private key.
    ///
    /// The certificate is the first `CERTIFICATE` block; the key is searched
    /// for again from the start of the buffer, so block order does not matter.
    pub fn from_pem(data: &[u8], password: Option<&SecretString>) -> Result<Self> {
        ensure_initialized();

        let certificate = X509::from_pem(data)
            .map_err(|e| Error::CertificateParse(format!("No certificate in PEM bundle: {}", e)))?;

        let private_key = match password {
            Some(pass) => {
                PKey::private_key_from_pem_passphrase(data, pass.expose_secret().as_bytes())
            }
            // Never fall back to an interactive prompt for encrypted keys.
            None => PKey::private_key_from_pem_callback(data, |_buf| Ok(0)),
        }
        .map_err(|e| Error::KeyParse(format!("Failed to load private key: {}", e)))?;

        Self::validate_key_pair(&certificate, &private_key)?;

        Ok(Self {
            certificate,
            private_key,
        })
    }

    /// Parse a PKCS#12 archive.
    ///
    /// Intermediate CA certificates carried in the archive are dropped; only
    /// the end-entity certificate and its key are kept.
    pub fn from_p12(data: &[u8], password: Option<&SecretString>) -> Result<Self> {
        let parsed = parse_p12(data, password)?;

        if let Some(ref chain) = parsed.ca {
            if !chain.is_empty() {
                log::debug!(
                    "Discarding {} intermediate certificate(s) from PKCS#12 bundle",
                    chain.len()
                );
            }
        }

        let certificate = parsed
            .cert
            .ok_or_else(|| Error::BundleParse("No certificate in PKCS#12".into()))?;

        let private_key = parsed
            .pkey
            .ok_or_else(|| Error::BundleParse("No private key in PKCS#12".into()))?;

        Self::validate_key_pair(&certificate, &private_key)?;

        Ok(Self {
            certificate,
            private_key,
        })
    }

    /// One-line description of the certificate subject, for diagnostics.
    pub fn subject(&self) -> String {
        describe_subject(&self.certificate)
    }

    /// Validate that the private key matches the certificate's public key
    fn validate_key_pair(cert: &X509Ref, private_key: &PKey<Private>) -> Result<()> {
        let cert_public_key = cert.public_key().map_err(|e| {
            Error::CertificateParse(format!(
                "Failed to extract public key from certificate: {}",
                e
            ))
        })?;

        if !private_key.public_eq(&cert_public_key) {
            return Err(Error::KeyMismatch);
        }

        Ok(())
    }
}

impl std::fmt::Debug for SignerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerIdentity")
            .field("subject", &self.subject())
            .finish_non_exhaustive()
    }
}

/// A certificate trusted as a verification root.
pub struct TrustAnchor {
    /// The trusted CA (or self-signed) certificate.
    pub certificate: X509,
}

impl TrustAnchor {
    /// Load a trust anchor from a `.pem` or `.p12` file.
    ///
    /// Only the certificate is read. A `.p12` anchor is opened with the empty
    /// password, which is how certificate-only archives are usually exported.
    ///
    /// # Errors
    ///
    /// - [`Error::UnrecognizedFormat`] if the extension is neither `.pem` nor `.p12`
    /// - [`Error::CredentialOpen`] if the file cannot be read
    /// - [`Error::CertificateParse`] or [`Error::BundleParse`] if no certificate is found
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ContainerFormat::from_path(path)?;
        ensure_initialized();

        log::debug!("Loading {} trust anchor from {}", format, path.display());
        let data = read_credential(path)?;

        match format {
            ContainerFormat::TextBundle => Self::from_pem(&data),
            ContainerFormat::BinaryBundle => Self::from_p12(&data),
        }
    }

    /// Parse the first certificate of a PEM file.
    pub fn from_pem(data: &[u8]) -> Result<Self> {
        ensure_initialized();
        let certificate = X509::from_pem(data)
            .map_err(|e| Error::CertificateParse(format!("No certificate in PEM file: {}", e)))?;
        Ok(Self { certificate })
    }

    /// Take the certificate of a PKCS#12 archive protected by the empty password.
    pub fn from_p12(data: &[u8]) -> Result<Self> {
        let certificate = parse_p12(data, None)?
            .cert
            .ok_or_else(|| Error::BundleParse("No certificate in PKCS#12".into()))?;
        Ok(Self { certificate })
    }

    /// One-line description of the certificate subject, for diagnostics.
    pub fn subject(&self) -> String {
        describe_subject(&self.certificate)
    }
}

impl std::fmt::Debug for TrustAnchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustAnchor")
            .field("subject", &self.subject())
            .finish()
    }
}

fn read_credential(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::CredentialOpen {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_p12(data: &[u8], password: Option<&SecretString>) -> Result<ParsedPkcs12_2> {
    ensure_initialized();

    let pkcs12 = Pkcs12::from_der(data)
        .map_err(|e| Error::BundleParse(format!("Invalid PKCS#12: {}", e)))?;

    let pass = password.map(|s| s.expose_secret().as_str()).unwrap_or("");
    pkcs12
        .parse2(pass)
        .map_err(|e| Error::BundleParse(format!("Failed to parse PKCS#12: {}", e)))
}

fn describe_subject(cert: &X509Ref) -> String {
    let parts: Vec<String> = cert
        .subject_name()
        .entries()
        .filter_map(|entry| {
            let key = entry.object().nid().short_name().ok()?;
            let value = String::from_utf8_lossy(entry.data().as_slice());
            Some(format!("{}={}", key, value))
        })
        .collect();

    if parts.is_empty() {
        "<empty subject>".to_string()
    } else {
        parts.join(", ")
    }
}
