//! Content digests for uploaded specification files.
//!
//! The digest identifies file content independent of its name, so the same
//! file uploaded twice can be detected before it is parsed again.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA256 of the raw file bytes (64 characters)
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
