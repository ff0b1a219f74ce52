//! Trust store construction from anchor certificates.

use crate::crypto::credential::TrustAnchor;
use crate::crypto::init::ensure_initialized;
use crate::{Error, Result};
use openssl::x509::store::{X509Store, X509StoreBuilder};
use std::path::Path;

/// Set of anchor certificates used as verification roots.
pub struct TrustStore {
    store: X509Store,
    anchors: usize,
}

impl TrustStore {
    /// Build a store holding the given anchors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `anchors` is empty.
    pub fn from_anchors(anchors: impl IntoIterator<Item = TrustAnchor>) -> Result<Self> {
        ensure_initialized();

        let mut builder = X509StoreBuilder::new()
            .map_err(|e| Error::TrustStore(format!("Failed to create X509 store: {}", e)))?;

        let mut count = 0;
        for anchor in anchors {
            log::debug!("Adding trust anchor {}", anchor.subject());
            builder
                .add_cert(anchor.certificate)
                .map_err(|e| Error::TrustStore(format!("Failed to add anchor: {}", e)))?;
            count += 1;
        }

        if count == 0 {
            return Err(Error::Config("At least one trust anchor is required".into()));
        }

        Ok(Self {
            store: builder.build(),
            anchors: count,
        })
    }

    /// Number of anchors added to the store, duplicates included.
    pub fn anchor_count(&self) -> usize {
        self.anchors
    }

    pub(crate) fn store(&self) -> &X509Store {
        &self.store
    }
}

/// Build a trust store containing exactly the anchor at `anchor_path`.
pub fn build_trust_store(anchor_path: impl AsRef<Path>) -> Result<TrustStore> {
    let anchor = TrustAnchor::load(anchor_path)?;
    TrustStore::from_anchors([anchor])
}

/// Build a trust store from several anchor files (set union).
pub fn build_trust_store_from<P: AsRef<Path>>(anchor_paths: &[P]) -> Result<TrustStore> {
    let anchors = anchor_paths
        .iter()
        .map(TrustAnchor::load)
        .collect::<Result<Vec<_>>>()?;
    TrustStore::from_anchors(anchors)
}
