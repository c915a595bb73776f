//! Canonical hashing of matchings and connector settings.
//!
//! [`ConnectionManager::fingerprint`](crate::ConnectionManager::fingerprint)
//! hashes the sorted `(node_a, node_b, weight)` triples of a matching, and
//! [`IdConnectorConfig::params_hash`](crate::IdConnectorConfig::params_hash)
//! hashes a connector configuration. Both go through compact JSON and xxh64.
//! Weights are quantized to integers first, so `0.1 + 0.2` and `0.3` give
//! the same fingerprint.

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Quantization factor for float normalization.
/// Floats are multiplied by this value and rounded to i64.
pub const FLOAT_QUANTIZATION_FACTOR: f64 = 1_000_000.0;

/// Quantize a float for hashing.
pub fn quantize(value: f64) -> i64 {
    (value * FLOAT_QUANTIZATION_FACTOR).round() as i64
}

/// Serialize a value to canonical JSON bytes for hashing.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    let bytes = to_canonical_bytes(value);
    xxh64(&bytes, 0)
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}
