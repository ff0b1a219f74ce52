//! Signing and verification pipelines.

mod output;
pub mod sign;
pub mod verify;

pub use sign::{encode, sign, sign_content};
pub use verify::{decode, verify, verify_content, verify_with, VerificationOutcome, VerifyOptions};
