//! Checksum Engine
//!
//! Content hashing for deployment manifests:
//! - SHA-256 (authoritative for change detection and snapshot fingerprints)
//! - Legacy positional hash (backward-compatible identifiers only)

use sha2::{Digest, Sha256};

/// A named hashing strategy over arbitrary text
///
/// Call sites hold a `&dyn ChecksumAlgorithm` so the legacy variant can be
/// retired without touching them.
pub trait ChecksumAlgorithm: Send + Sync {
    /// Short identifier (e.g. "sha256")
    fn name(&self) -> &'static str;

    /// Hash `content`, returning a lowercase hex string
    fn checksum(&self, content: &str) -> String;
}

/// Standard SHA-256, rendered as 64 lowercase hex characters
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Checksum;

impl ChecksumAlgorithm for Sha256Checksum {
    fn name(&self) -> &'static str {
        "sha256"
    }

    fn checksum(&self, content: &str) -> String {
        sha256_checksum(content)
    }
}

/// Non-cryptographic positional hash kept for old identifiers
///
/// Not collision resistant. Never use it for change detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyChecksum;

impl ChecksumAlgorithm for LegacyChecksum {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn checksum(&self, content: &str) -> String {
        legacy_checksum(content)
    }
}

/// Calculate the SHA-256 checksum of `content` as lowercase hex
///
/// Unlike document checksums, manifests are hashed byte-for-byte: a
/// whitespace-only edit is still a configuration change.
pub fn sha256_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Calculate the legacy positional checksum
///
/// `hash = hash * 31 + codepoint + position` over each character, with
/// wrapping 64-bit arithmetic. Empty input yields `"0"`.
pub fn legacy_checksum(content: &str) -> String {
    let hash = content
        .chars()
        .enumerate()
        .fold(0u64, |hash, (position, c)| {
            hash.wrapping_mul(31)
                .wrapping_add(u64::from(u32::from(c)))
                .wrapping_add(position as u64)
        });
    format!("{:x}", hash)
}

/// First `len` characters of a hex checksum (the whole string if shorter)
pub fn fingerprint(checksum: &str, len: usize) -> &str {
    match checksum.char_indices().nth(len) {
        Some((idx, _)) => &checksum[..idx],
        None => checksum,
    }
}

// =============================================================================
// Tests
// =============================================================================
