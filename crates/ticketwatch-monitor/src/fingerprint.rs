use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of a page's serialized HTML. The sole identity used
/// to decide whether a page changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the fingerprint of `content`. Identical bytes always give the
/// identical fingerprint.
#[must_use]
pub fn fingerprint(content: &str) -> Fingerprint {
    Fingerprint(format!("{:x}", Sha256::digest(content.as_bytes())))
}
