// crates/cascade-core/src/core/hashing.rs
// ============================================================================
// Module: Cascade Hashing
// Description: Canonical JSON serialization and digest helpers.
// Purpose: Produce stable structure digests for confirmation records.
// Dependencies: serde, serde_jcs, serde_json, sha2
// ============================================================================

//! ## Overview
//! Structure confirmations freeze an organizational tree by recording a
//! digest of its canonical JSON form (RFC 8785 JCS). Digest values are
//! lowercase hex and carry their algorithm so stored records stay
//! self-describing across algorithm upgrades.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default hash algorithm for new digests.
pub const DEFAULT_HASH_ALGORITHM: HashAlgorithm = HashAlgorithm::Sha256;

// ============================================================================
// SECTION: Hashing Errors
// ============================================================================

/// Errors produced while canonicalizing or hashing values.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum HashingError {
    /// Value could not be canonicalized to JCS JSON.
    #[error("canonicalization failed: {0}")]
    Canonicalization(String),
}

// ============================================================================
// SECTION: Hash Types
// ============================================================================

/// Supported hash algorithms.
///
/// # Invariants
/// - Variants are stable for serialization and digest verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256.
    Sha256,
}

impl HashAlgorithm {
    /// Returns the stable label for the algorithm.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

/// Hash digest with its producing algorithm.
///
/// # Invariants
/// - `value` is lowercase hex of the digest bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashDigest {
    /// Algorithm that produced the digest.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex digest value.
    pub value: String,
}

impl fmt::Display for HashDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm.as_str(), self.value)
    }
}

// ============================================================================
// SECTION: Hash Functions
// ============================================================================

/// Serializes a value to canonical JSON (JCS) bytes.
///
/// # Errors
///
/// Returns [`HashingError`] when the value cannot be canonicalized.
pub fn canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, HashingError> {
    serde_jcs::to_vec(value).map_err(|err| HashingError::Canonicalization(err.to_string()))
}

/// Hashes raw bytes with the provided algorithm.
#[must_use]
pub fn hash_bytes(algorithm: HashAlgorithm, bytes: &[u8]) -> HashDigest {
    match algorithm {
        HashAlgorithm::Sha256 => {
            let digest = Sha256::digest(bytes);
            HashDigest {
                algorithm,
                value: hex_lower(&digest),
            }
        }
    }
}

/// Canonicalizes a value and hashes the canonical bytes.
///
/// # Errors
///
/// Returns [`HashingError`] when canonicalization fails.
pub fn hash_canonical_json<T: Serialize>(
    algorithm: HashAlgorithm,
    value: &T,
) -> Result<HashDigest, HashingError> {
    let bytes = canonical_json_bytes(value)?;
    Ok(hash_bytes(algorithm, &bytes))
}

/// Encodes bytes as lowercase hex.
fn hex_lower(bytes: &[u8]) -> String {
    use fmt::Write as _;

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // Writing into a String cannot fail.
        let _ = write!(out, "{byte:02x}");
    }
    out
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use serde_json::json;

    use super::DEFAULT_HASH_ALGORITHM;
    use super::hash_bytes;
    use super::hash_canonical_json;

    #[test]
    fn digest_is_lowercase_hex() {
        let digest = hash_bytes(DEFAULT_HASH_ALGORITHM, b"cascade");
        assert_eq!(digest.value.len(), 64);
        assert!(digest.value.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest.value, digest.value.to_lowercase());
    }

    #[test]
    fn canonical_hash_is_key_order_independent() {
        let left = json!({"b": 1, "a": {"y": 2, "x": 3}});
        let right = json!({"a": {"x": 3, "y": 2}, "b": 1});
        let left_digest = hash_canonical_json(DEFAULT_HASH_ALGORITHM, &left).unwrap();
        let right_digest = hash_canonical_json(DEFAULT_HASH_ALGORITHM, &right).unwrap();
        assert_eq!(left_digest, right_digest);
    }

    #[test]
    fn distinct_values_produce_distinct_digests() {
        let left = hash_canonical_json(DEFAULT_HASH_ALGORITHM, &json!({"a": 1})).unwrap();
        let right = hash_canonical_json(DEFAULT_HASH_ALGORITHM, &json!({"a": 2})).unwrap();
        assert_ne!(left, right);
    }
}
