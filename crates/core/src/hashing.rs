//! SHA-256 hex digests.
//!
//! The upload intake stores a digest of each accepted workflow so
//! duplicate content can be spotted regardless of file name.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    format!("{digest:x}")
}
