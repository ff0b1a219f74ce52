//! Credential container format detection.
//!
//! The format of a credential file is decided from its extension alone, before
//! the file is opened, so the decision can be audited and tested without
//! touching the file system.

use crate::{Error, Result};
use std::fmt;
use std::path::Path;

/// Encoding of a credential file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    /// PEM text: a certificate block and a private key block, the key
    /// optionally encrypted with a passphrase. Extension `.pem`.
    TextBundle,

    /// PKCS#12 archive holding certificate, private key and an optional
    /// intermediate chain, always password protected. Extension `.p12`.
    BinaryBundle,
}

impl ContainerFormat {
    /// Determine the format from `path`'s extension (ASCII case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnrecognizedFormat`] for any extension other than
    /// `pem` or `p12`, including a missing one.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        if ext.eq_ignore_ascii_case("pem") {
            Ok(ContainerFormat::TextBundle)
        } else if ext.eq_ignore_ascii_case("p12") {
            Ok(ContainerFormat::BinaryBundle)
        } else {
            Err(Error::UnrecognizedFormat(path.to_path_buf()))
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerFormat::TextBundle => f.write_str("PEM"),
            ContainerFormat::BinaryBundle => f.write_str("PKCS#12"),
        }
    }
}
