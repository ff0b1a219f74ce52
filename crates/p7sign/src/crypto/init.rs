//! Process-wide OpenSSL initialization.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize OpenSSL's algorithm and error-string tables exactly once.
///
/// Safe to call from any thread and any number of times. There is no matching
/// teardown; the tables live for the rest of the process.
pub fn ensure_initialized() {
    INIT.call_once(|| {
        openssl::init();
        log::debug!("OpenSSL initialized: {}", openssl::version::version());
    });
}
