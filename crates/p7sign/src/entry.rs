//! Exit-code entry points.
//!
//! These wrap the [`P7Sign`] pipelines for process-level callers: `0` means
//! success, [`EXIT_REJECTED`] means the signature was checked and refused,
//! and every other failure maps to [`ErrorCategory::exit_code`]. Diagnostics
//! go through the `log` facade (stderr in the CLI); nothing is written to
//! stdout.
//!
//! [`ErrorCategory::exit_code`]: crate::ErrorCategory::exit_code

use crate::error::EXIT_REJECTED;
use crate::{P7Sign, VerificationOutcome};
use std::path::Path;

/// Sign `content_file` with the identity in `credential_file`.
///
/// An empty `password_or_empty` means the credential has no password.
pub fn sign(
    content_file: impl AsRef<Path>,
    credential_file: impl AsRef<Path>,
    password_or_empty: &str,
    output_file: impl AsRef<Path>,
) -> i32 {
    let mut p7 = P7Sign::new().credential(credential_file);
    if !password_or_empty.is_empty() {
        p7 = p7.password(password_or_empty);
    }
    run_sign(&p7, content_file, output_file)
}

/// Verify `container_file` against the single anchor in `anchor_file`.
pub fn verify(
    anchor_file: impl AsRef<Path>,
    container_file: impl AsRef<Path>,
    output_file: impl AsRef<Path>,
) -> i32 {
    let p7 = P7Sign::new().anchor(anchor_file);
    run_verify(&p7, container_file, output_file)
}

/// Run a configured signing operation and map the result to an exit code.
pub fn run_sign(p7: &P7Sign, input: impl AsRef<Path>, output: impl AsRef<Path>) -> i32 {
    match p7.sign(input.as_ref(), output.as_ref()) {
        Ok(()) => 0,
        Err(e) => {
            log::error!("Error signing data: {}", e);
            e.exit_code()
        }
    }
}

/// Run a configured verification and map the result to an exit code.
pub fn run_verify(p7: &P7Sign, container: impl AsRef<Path>, output: impl AsRef<Path>) -> i32 {
    match p7.verify(container.as_ref(), output.as_ref()) {
        Ok(VerificationOutcome::Verified(_)) => 0,
        Ok(VerificationOutcome::Rejected(reason)) => {
            log::error!("Signature rejected: {}", reason);
            EXIT_REJECTED
        }
        Err(e) => {
            log::error!("Error verifying data: {}", e);
            e.exit_code()
        }
    }
}
