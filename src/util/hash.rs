//! Fingerprints for generated inputs.

use sha2::{Digest, Sha256};

/// Incremental SHA-256 over length-prefixed parts, so `["ab", "c"]` and
/// `["a", "bc"]` differ.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    pub fn new() -> Self {
        Fingerprint::default()
    }

    pub fn with_str(mut self, part: &str) -> Self {
        self.hasher.update((part.len() as u64).to_le_bytes());
        self.hasher.update(part.as_bytes());
        self
    }

    /// Lowercase hex digest.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}
