//! Content fingerprinting for deduplication of stored documents.

use sha2::{Digest, Sha256};

/// SHA-256 digest and byte length of a raw document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFingerprint {
    pub hash: String,
    pub length: usize,
}

impl ContentFingerprint {
    /// Fingerprint the raw UTF-8 bytes of `text`
    pub fn of(text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        Self {
            hash: format!("{:x}", hasher.finalize()),
            length: text.len(),
        }
    }
}
