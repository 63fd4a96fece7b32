//! Deterministic hashing and ID builders for canonical artifacts.
//!
//! - Canonical JSON hashing: UTF-8, sorted object keys, array order preserved
//! - `SNP:` snapshot ids derive from the canonical bytes of the snapshot
//!   body serialized **without** its `id` field
//! - Hex digests are lowercase throughout

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

use pnl_core::SnapshotId;

use crate::canonical_json::{canonical_json_bytes, to_canonical_bytes};
use crate::{IoError, IoResult};

/// SHA-256 over raw bytes, lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// SHA-256 over canonical JSON bytes of any serializable value.
pub fn sha256_canonical<T: Serialize>(value: &T) -> IoResult<String> {
    Ok(sha256_hex(&to_canonical_bytes(value)?))
}

/// SHA-256 over an already-parsed JSON value.
pub fn sha256_canonical_value(v: &serde_json::Value) -> String {
    sha256_hex(&canonical_json_bytes(v))
}

/// SHA-256 over a file's raw bytes (streamed; not canonicalized).
pub fn sha256_file(path: &Path) -> IoResult<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Build a `SNP:` snapshot id from the canonical bytes of the id-less body.
pub fn snapshot_id_from_canonical<T: Serialize>(body: &T) -> IoResult<SnapshotId> {
    let digest = sha256_canonical(body)?;
    format!("SNP:{digest}")
        .parse()
        .map_err(|e| IoError::Hash(format!("snapshot id: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn digest_is_stable_across_key_order() {
        let a = json!({"x": 1, "y": [1, 2]});
        let b = json!({"y": [1, 2], "x": 1});
        assert_eq!(sha256_canonical_value(&a), sha256_canonical_value(&b));
    }

    #[test]
    fn snapshot_id_carries_prefix_and_parses() {
        let id = snapshot_id_from_canonical(&json!({"k": "v"})).unwrap();
        assert!(id.as_str().starts_with("SNP:"));
        assert_eq!(id.as_str().len(), 4 + 64);
    }

    #[test]
    fn file_digest_matches_raw_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.json");
        std::fs::write(&path, b"[1,2,3]").unwrap();
        assert_eq!(sha256_file(&path).unwrap(), sha256_hex(b"[1,2,3]"));
    }

    #[test]
    fn same_body_same_id() {
        let body = json!({"a": 1, "b": {"c": [3, 2, 1]}});
        assert_eq!(
            snapshot_id_from_canonical(&body).unwrap(),
            snapshot_id_from_canonical(&body).unwrap()
        );
    }
}
