//! Signing engine: content file in, DER PKCS#7 container out.

use super::output::PendingOutput;
use crate::crypto::init::ensure_initialized;
use crate::crypto::SignerIdentity;
use crate::{Error, Result};
use openssl::pkcs7::{Pkcs7, Pkcs7Flags};
use openssl::stack::Stack;
use openssl::x509::X509;
use std::fs;
use std::path::Path;

/// Flags used for every signature.
///
/// `BINARY` keeps the content byte-exact (no CRLF canonicalisation). Without
/// `DETACHED` the content travels inside the container and is recovered by
/// verification.
pub const SIGN_FLAGS: Pkcs7Flags = Pkcs7Flags::BINARY;

/// Produce a PKCS#7 signed-data structure over `content`.
///
/// The container holds the content, the signer certificate and the signature.
/// No intermediate certificates are added.
///
/// # Errors
///
/// Returns [`Error::Signing`] if OpenSSL rejects the key or algorithm.
pub fn sign_content(identity: &SignerIdentity, content: &[u8]) -> Result<Pkcs7> {
    ensure_initialized();

    let chain = Stack::<X509>::new()
        .map_err(|e| Error::Signing(format!("Failed to allocate certificate stack: {}", e)))?;

    Pkcs7::sign(
        &identity.certificate,
        &identity.private_key,
        &chain,
        content,
        SIGN_FLAGS,
    )
    .map_err(|e| Error::Signing(format!("Failed to sign content: {}", e)))
}

/// Serialize a container to DER.
pub fn encode(pkcs7: &Pkcs7) -> Result<Vec<u8>> {
    pkcs7
        .to_der()
        .map_err(|e| Error::Encode(format!("Failed to encode PKCS#7: {}", e)))
}

/// Sign the file at `input` and write the DER container to `output`.
///
/// The identity is consumed and released when the call returns. On any
/// failure after `output` was created the file is removed again.
///
/// # Errors
///
/// - [`Error::InputOpen`] if `input` cannot be read
/// - [`Error::Signing`] if no signature can be produced
/// - [`Error::Config`] if `output` is the same file as `input`
/// - [`Error::OutputOpen`] if `output` cannot be created
/// - [`Error::Encode`] / [`Error::OutputWrite`] if the container cannot be written
pub fn sign(
    identity: SignerIdentity,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    let content = fs::read(input).map_err(|source| Error::InputOpen {
        path: input.to_path_buf(),
        source,
    })?;
    log::debug!("Read {} bytes from {}", content.len(), input.display());

    let pkcs7 = sign_content(&identity, &content)?;

    let mut out = PendingOutput::create(output, input)?;
    let der = encode(&pkcs7)?;
    out.write_all(&der)?;
    out.commit();

    log::info!(
        "Signed {} as {} -> {} ({} bytes)",
        input.display(),
        identity.subject(),
        output.display(),
        der.len()
    );
    Ok(())
}
