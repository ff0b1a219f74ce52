//! PKCS#7 signing and verification of arbitrary files.
//!
//! Signs content with an identity loaded from a PEM bundle or a PKCS#12
//! archive, and verifies the resulting DER container against one or more
//! trust anchors, recovering the signed content.
//!
//! ```no_run
//! use p7sign::P7Sign;
//!
//! P7Sign::new()
//!     .credential("signer.pem")
//!     .sign("payload.bin", "payload.p7")?;
//!
//! let outcome = P7Sign::new()
//!     .anchor("root-ca.pem")
//!     .verify("payload.p7", "payload.out")?;
//! assert!(outcome.is_verified());
//! # Ok::<(), p7sign::Error>(())
//! ```

pub mod builder;
pub mod crypto;
pub mod entry;
pub mod error;
pub mod pipeline;

#[cfg(test)]
#[path = "../tests/common/certs.rs"]
mod test_support;

pub use builder::P7Sign;
pub use crypto::{build_trust_store, ContainerFormat, SignerIdentity, TrustAnchor, TrustStore};
pub use error::{Error, ErrorCategory, EXIT_REJECTED};
pub use pipeline::{sign, verify, verify_with, VerificationOutcome, VerifyOptions};

pub type Result<T> = std::result::Result<T, Error>;
