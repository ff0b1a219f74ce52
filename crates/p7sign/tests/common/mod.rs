//! Shared fixtures for integration tests: runtime-generated CA, signer and
//! credential files in a temporary directory.

#![allow(dead_code)]

mod certs;

pub use certs::*;

use openssl::x509::X509;

/// A CA, a signer issued by it, and an unrelated CA, written to disk in
/// every credential layout the loader accepts.
pub struct Pki {
    pub dir: tempfile::TempDir,
    pub signer_cert: X509,
    /// Root CA certificate, PEM.
    pub anchor: std::path::PathBuf,
    /// Unrelated root CA certificate, PEM.
    pub unrelated_anchor: std::path::PathBuf,
    /// Signer certificate + unencrypted key, PEM.
    pub signer_pem: std::path::PathBuf,
    /// Signer certificate + key encrypted with [`PASSWORD`], PEM.
    pub signer_encrypted_pem: std::path::PathBuf,
    /// Signer certificate, key and CA chain protected by [`PASSWORD`], PKCS#12.
    pub signer_p12: std::path::PathBuf,
}

pub const PASSWORD: &str = "opendrop";

impl Pki {
    pub fn new() -> Self {
        let dir = tempfile::TempDir::new().unwrap();
        let (ca_key, ca_cert) = generate_ca("p7sign Test Root");
        let (signer_key, signer_cert) = generate_leaf("p7sign Signer", &ca_key, &ca_cert);
        let (_, unrelated) = generate_ca("Unrelated Root");

        let path = |name: &str| dir.path().join(name);
        let anchor = path("root.pem");
        let unrelated_anchor = path("unrelated.pem");
        let signer_pem = path("signer.pem");
        let signer_encrypted_pem = path("signer-encrypted.pem");
        let signer_p12 = path("signer.p12");

        std::fs::write(&anchor, ca_cert.to_pem().unwrap()).unwrap();
        std::fs::write(&unrelated_anchor, unrelated.to_pem().unwrap()).unwrap();
        std::fs::write(&signer_pem, identity_pem(&signer_cert, &signer_key, None)).unwrap();
        std::fs::write(
            &signer_encrypted_pem,
            identity_pem(&signer_cert, &signer_key, Some(PASSWORD)),
        )
        .unwrap();
        std::fs::write(
            &signer_p12,
            p12_der(&signer_cert, &signer_key, Some(&ca_cert), PASSWORD),
        )
        .unwrap();

        Self {
            dir,
            signer_cert,
            anchor,
            unrelated_anchor,
            signer_pem,
            signer_encrypted_pem,
            signer_p12,
        }
    }

    /// Path for a scratch file inside the fixture directory.
    pub fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }
}
