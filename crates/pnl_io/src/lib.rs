//! pnl_io — single-source-of-truth I/O crate for the PNL governance engine.
//!
//! - Canonical JSON (sorted keys, compact) and atomic artifact writes
//! - SHA-256 digests and `SNP:` snapshot-ID builders
//! - JSON Schema (Draft 2020-12) validation of the two input files
//! - Typed loaders: raw rows + mapping table → validated, digested inputs
//!
//! Strictly offline: no network I/O anywhere in this crate.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for pnl_io (used by canonical_json/hasher/schema/loader).
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors.
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON serialization/deserialization errors with a JSON Pointer hint.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// JSON Schema validation failures (malformed input stream).
    #[error("schema error: {0}")]
    Schema(String),

    /// Hashing-related errors.
    #[error("hash error: {0}")]
    Hash(String),

    /// Generic validation / invariants (e.g. duplicate mapping entries).
    #[error("invalid: {0}")]
    Invalid(String),
}

pub type IoResult<T> = Result<T, IoError>;

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json keeps no pointer; callers may enrich at higher layers.
        IoError::Json { pointer: "/".to_string(), msg: e.to_string() }
    }
}

pub mod canonical_json;
pub mod hasher;
pub mod loader;
pub mod schema;

/// Returns true if `s` looks like a URL (any `<scheme>://`, incl. `file://`).
/// Loading follows a strict offline posture; callers reject these early.
#[inline]
pub fn looks_like_url_strict(s: &str) -> bool {
    s.trim().contains("://")
}

pub mod prelude {
    pub use crate::{looks_like_url_strict, IoError, IoResult};

    pub use crate::canonical_json;
    pub use crate::hasher;
    pub use crate::loader;
    pub use crate::schema;

    pub use crate::canonical_json::to_canonical_bytes;
    pub use crate::hasher::sha256_hex;
}
