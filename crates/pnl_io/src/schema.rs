//! Embedded JSON Schemas (Draft 2020-12) for the two input files, and the
//! validation entry points the loader runs before any computation.
//!
//! A malformed raw-row stream or mapping table is rejected here — fatal,
//! before extraction starts — mirroring the strict pre-computation posture
//! of the engine (bad inputs never become `NOT_DISCLOSED` noise).

use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Value};

use pnl_core::MetricId;

use crate::{IoError, IoResult};

/// Schema for the raw-rows file: an array of labeled value cells.
pub fn raw_rows_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "sheet": { "type": "string", "minLength": 1 },
                "row": { "type": "integer", "minimum": 0 },
                "col": { "type": "integer", "minimum": 0 },
                "raw_label": { "type": "string" },
                "raw_value": { "type": ["number", "null"] },
                "unit_hint": { "type": ["string", "null"] }
            },
            "required": ["sheet", "row", "col", "raw_label"],
            "additionalProperties": false
        }
    })
}

/// Schema for the mapping-table file: one entry per canonical metric.
pub fn mapping_schema() -> Value {
    let metric_ids: Vec<&str> = MetricId::ALL.iter().map(|m| m.as_str()).collect();
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "metric": { "enum": metric_ids },
                "synonyms": {
                    "type": "array",
                    "items": { "type": "string", "minLength": 1 },
                    "minItems": 1
                },
                "unit_scale": { "enum": ["ones", "thousands", "millions"] },
                "sign": { "enum": ["as_reported", "negated"] },
                "forbidden_tokens": {
                    "type": "array",
                    "items": { "type": "string" }
                }
            },
            "required": ["metric", "synonyms"],
            "additionalProperties": false
        }
    })
}

/// Validate `instance` against `schema`; the first violation is reported
/// with its instance path.
pub fn validate(schema: &Value, instance: &Value) -> IoResult<()> {
    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft202012)
        .compile(schema)
        .map_err(|e| IoError::Schema(format!("schema compile: {e}")))?;

    if let Err(mut errors) = compiled.validate(instance) {
        if let Some(first) = errors.next() {
            return Err(IoError::Schema(format!(
                "{} at {}",
                first, first.instance_path
            )));
        }
        return Err(IoError::Schema("validation failed".into()));
    }
    Ok(())
}
