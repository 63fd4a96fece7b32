//! pnl_algo — pure algorithm layer for the PNL governance engine.
//!
//! Term mapping → metric extraction → baseline/delta → drift scoring →
//! causality graph. Everything here is deterministic, I/O-free, and driven
//! by the closed domains in `pnl_core`; ties are broken by documented total
//! orders, never by iteration luck.

#![forbid(unsafe_code)]

pub mod baseline;
pub mod causality;
pub mod extract;
pub mod mapper;
pub mod score;

pub use baseline::{classify_aging, compare_series, AgingBucket, BaselineDelta, PeriodComparison};
pub use causality::{build_edges, CausalityEdge};
pub use extract::{extract_metrics, ResolvedMetric};
pub use mapper::{match_label, MatchStage};
pub use score::{score_axes, DriftAxisScore};
