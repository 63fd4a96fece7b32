//! Loader: read the two local JSON inputs (raw rows, mapping table),
//! validate via Draft 2020-12 schemas, deserialize into typed form, and
//! record input digests for the snapshot's integrity block. No network I/O.

use std::fs;
use std::path::Path;

use serde_json::Value;

use pnl_core::entities::RawRow;
use pnl_core::mapping::{MappingTable, MetricMapping};

use crate::canonical_json::canonical_json_bytes;
use crate::hasher::sha256_hex;
use crate::{schema, IoError, IoResult};

/// Digests (sha256 hex over canonical bytes) of the two canonical inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDigests {
    pub rows_sha256: String,
    pub mapping_sha256: String,
}

/// Loaded, validated inputs ready for the pipeline.
#[derive(Debug, Clone)]
pub struct LoadedInputs {
    pub rows: Vec<RawRow>,
    pub table: MappingTable,
    pub digests: InputDigests,
}

fn read_value(path: &Path) -> IoResult<Value> {
    let text = fs::read_to_string(path)
        .map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&text).map_err(IoError::from)
}

/// Load + validate the raw-rows file. Returns rows in file order (the
/// caller-supplied ordered sequence) plus the canonical digest.
pub fn load_rows(path: &Path) -> IoResult<(Vec<RawRow>, String)> {
    let v = read_value(path)?;
    schema::validate(&schema::raw_rows_schema(), &v)
        .map_err(|e| IoError::Schema(format!("{}: {e}", path.display())))?;
    let digest = sha256_hex(&canonical_json_bytes(&v));
    let rows: Vec<RawRow> = serde_json::from_value(v)?;
    Ok((rows, digest))
}

/// Load + validate the mapping-table file. Duplicate metric entries are
/// rejected by `MappingTable::new` (surfaced as `Invalid`).
pub fn load_mapping(path: &Path) -> IoResult<(MappingTable, String)> {
    let v = read_value(path)?;
    schema::validate(&schema::mapping_schema(), &v)
        .map_err(|e| IoError::Schema(format!("{}: {e}", path.display())))?;
    let digest = sha256_hex(&canonical_json_bytes(&v));
    let entries: Vec<MetricMapping> = serde_json::from_value(v)?;
    let table = MappingTable::new(entries).map_err(|e| IoError::Invalid(e.to_string()))?;
    Ok((table, digest))
}

/// Load both inputs.
pub fn load_all(rows_path: &Path, mapping_path: &Path) -> IoResult<LoadedInputs> {
    let (rows, rows_sha256) = load_rows(rows_path)?;
    let (table, mapping_sha256) = load_mapping(mapping_path)?;
    Ok(LoadedInputs {
        rows,
        table,
        digests: InputDigests { rows_sha256, mapping_sha256 },
    })
}
