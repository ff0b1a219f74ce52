//! Credential loading, trust stores and OpenSSL setup.

pub mod credential;
pub mod format;
pub mod init;
pub mod trust;

pub use credential::{SignerIdentity, TrustAnchor};
pub use format::ContainerFormat;
pub use trust::{build_trust_store, build_trust_store_from, TrustStore};
