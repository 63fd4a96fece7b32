//! pnl_core — Core types, closed domains, ordering helpers, and integer-first
//! score numerics for the PNL governance engine.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`pnl_io`, `pnl_algo`, `pnl_pipeline`, `pnl_report`, `pnl_cli`).
//!
//! - Output IDs: `SNP:` snapshot ids; `FileId` registry tokens; A1 cell refs
//! - Closed domains: `MetricId`, `AxisId`, `OrgUnit`, lens axes
//! - Disclosure states: `Disclosure<T>` (never a default/zero fill)
//! - Evidence ledger: append-only anchors + audit notes
//! - Integer-first numerics: `ScoreTenths` (0..=10.0), `ConfidencePct`
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod errors {
    use std::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidId,
        InvalidToken,
        InvalidHex,
        /// Unrecognized value on a lens axis; names the axis. Fatal upstream.
        InvalidLens(&'static str),
        UnknownMetric,
        UnknownAxis,
        UnknownOrg,
        DomainOutOfRange(&'static str),
        DuplicateMapping(&'static str),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidId => write!(f, "invalid id"),
                CoreError::InvalidToken => write!(f, "invalid token"),
                CoreError::InvalidHex => write!(f, "invalid hex"),
                CoreError::InvalidLens(axis) => write!(f, "invalid lens value on axis: {axis}"),
                CoreError::UnknownMetric => write!(f, "unknown canonical metric"),
                CoreError::UnknownAxis => write!(f, "unknown drift axis"),
                CoreError::UnknownOrg => write!(f, "unknown organizational unit"),
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
                CoreError::DuplicateMapping(k) => write!(f, "duplicate mapping: {k}"),
            }
        }
    }

    impl std::error::Error for CoreError {}
}

pub mod axes;
pub mod determinism;
pub mod disclosure;
pub mod entities;
pub mod ids;
pub mod ledger;
pub mod lens;
pub mod mapping;
pub mod metrics;
pub mod numerics;
pub mod variables;

pub use axes::{AxisId, OrgUnit};
pub use disclosure::Disclosure;
pub use errors::CoreError;
pub use ids::{CellRef, FileId, SnapshotId};
pub use ledger::{AuditNote, EvidenceAnchor, EvidenceLedger, LedgerEntry, LedgerScope};
pub use lens::{Cycle, Hold, Lens, Mode, Terms};
pub use mapping::{MappingTable, MetricMapping, SignConvention, UnitScale};
pub use metrics::{MetricId, UnitKind};
pub use numerics::{ConfidencePct, ScoreTenths};
