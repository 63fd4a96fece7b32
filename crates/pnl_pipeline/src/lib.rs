//! pnl_pipeline — deterministic pipeline surface
//! (load → extract → baseline/delta → score → causality → snapshot → gate).
//!
//! This crate stays I/O-light and delegates JSON/schema/hashing to `pnl_io`
//! and the math to `pnl_algo`. One call computes one immutable snapshot per
//! (file identity, lens); independent snapshots share no state and may run
//! in parallel with no coordination.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::path::Path;

use pnl_algo::baseline::{classify_aging, compare_series, AgingBucket, PeriodComparison};
use pnl_algo::causality::build_edges;
use pnl_algo::extract::extract_metrics;
use pnl_algo::score::score_axes;
use pnl_core::entities::RawRow;
use pnl_core::ledger::EvidenceLedger;
use pnl_core::mapping::MappingTable;
use pnl_core::variables::EngineConfig;
use pnl_core::{CoreError, FileId, Lens, MetricId};
use pnl_io::loader;
use pnl_io::IoError;

pub mod gate;
pub mod period;
pub mod snapshot;

pub use gate::{evaluate as run_gate, GateReport, GateResult, UiState};
pub use snapshot::{AnalysisSnapshot, AxisBlock, EdgeBlock, EngineMeta, KpiBlock};

/// Top-level pipeline outputs: the snapshot plus the default gate report
/// (no UI descriptor). Callers holding a UI-state descriptor re-run
/// `run_gate` with it; the snapshot itself never changes.
#[derive(Debug)]
pub struct PipelineOutputs {
    pub snapshot: AnalysisSnapshot,
    pub gates: GateReport,
}

/// Single error surface for pipeline orchestration. Per-metric and per-axis
/// resolution failures never appear here — they are disclosure states inside
/// the snapshot. Only malformed inputs abort.
#[derive(Debug)]
pub enum PipelineError {
    Io(String),
    Schema(String),
    Lens(String),
    Input(String),
    Build(String),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Io(m) => write!(f, "io: {m}"),
            PipelineError::Schema(m) => write!(f, "schema: {m}"),
            PipelineError::Lens(m) => write!(f, "lens: {m}"),
            PipelineError::Input(m) => write!(f, "input: {m}"),
            PipelineError::Build(m) => write!(f, "build: {m}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<IoError> for PipelineError {
    fn from(e: IoError) -> Self {
        match e {
            IoError::Schema(m) => PipelineError::Schema(m),
            IoError::Json { pointer, msg } => PipelineError::Schema(format!("json {pointer}: {msg}")),
            IoError::Path(m) => PipelineError::Io(m),
            IoError::Hash(m) => PipelineError::Build(m),
            IoError::Invalid(m) => PipelineError::Input(m),
        }
    }
}

impl From<CoreError> for PipelineError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidLens(axis) => PipelineError::Lens(format!("axis {axis}")),
            other => PipelineError::Input(other.to_string()),
        }
    }
}

/// Orchestrate one snapshot computation from in-memory inputs.
///
/// Pure: identical (rows, table, lens, file_id, config) always yield a
/// byte-identical snapshot. Component order is fixed — mapper/extractor,
/// baseline/delta, scorer, causality, ledger finalize, gate.
pub fn run(
    rows: &[RawRow],
    table: &MappingTable,
    lens: &Lens,
    file_id: &FileId,
    config: &EngineConfig,
) -> Result<PipelineOutputs, PipelineError> {
    let digests = snapshot::DigestsBlock {
        rows_sha256: pnl_io::hasher::sha256_canonical(&rows).map_err(PipelineError::from)?,
        mapping_sha256: pnl_io::hasher::sha256_canonical(&table).map_err(PipelineError::from)?,
    };

    let mut ledger = EvidenceLedger::new();

    // EXTRACT — one resolved value (or NOT_DISCLOSED) per mapped metric.
    let resolved = extract_metrics(rows, table, &config.matcher, file_id, &mut ledger);

    // BASELINE/DELTA — per resolved metric, under the lens cycle.
    let mut comparisons: BTreeMap<MetricId, PeriodComparison> = BTreeMap::new();
    for (metric, outcome) in &resolved {
        if let Some(r) = outcome.value() {
            comparisons.insert(*metric, compare_series(&r.series, lens.cycle));
        }
    }

    // SCORE — the eight fixed axes.
    let axes = score_axes(&resolved, &comparisons, lens, config, &mut ledger);

    // CAUSALITY — symptom → owner edges for evidenced axes.
    let edges = build_edges(&axes, &mut ledger);

    // KPI rows in mapping-table order (caller-controlled, stable).
    let kpis: Vec<snapshot::KpiBlock> = table
        .iter()
        .map(|m| {
            let outcome = resolved.get(&m.metric).cloned().unwrap_or(pnl_core::Disclosure::NotDisclosed);
            let aging = aging_bucket_for(m.metric, &outcome, lens);
            snapshot::kpi_block(m.metric, &outcome, comparisons.get(&m.metric), aging)
        })
        .collect();

    let axis_blocks: Vec<snapshot::AxisBlock> =
        axes.iter().map(|(a, o)| snapshot::axis_block(*a, o)).collect();
    let edge_blocks: Vec<snapshot::EdgeBlock> = edges.iter().map(snapshot::edge_block).collect();

    let period = period::detect_period(rows);

    let snapshot = snapshot::build_snapshot(snapshot::SnapshotParts {
        file_id,
        lens,
        period,
        kpis,
        axes: axis_blocks,
        edges: edge_blocks,
        ledger,
        engine: engine_identifiers(),
        digests,
    })?;

    // GATE — never blocks the snapshot; only decides shippability.
    let gates = gate::evaluate(&snapshot, None);

    Ok(PipelineOutputs { snapshot, gates })
}

/// Convenience entry: load + schema-validate the two input files, parse the
/// lens tokens (fatal on any unrecognized value), then run the pipeline.
pub fn run_from_paths(
    rows_path: &Path,
    mapping_path: &Path,
    lens_tokens: (&str, &str, &str, &str),
    file_id: &str,
    config: &EngineConfig,
) -> Result<PipelineOutputs, PipelineError> {
    let lens = Lens::parse(lens_tokens.0, lens_tokens.1, lens_tokens.2, lens_tokens.3)
        .map_err(PipelineError::from)?;
    let file_id: FileId = file_id.parse().map_err(PipelineError::from)?;
    let loaded = loader::load_all(rows_path, mapping_path).map_err(PipelineError::from)?;
    run(&loaded.rows, &loaded.table, &lens, &file_id, config)
}

/// AR day-count metrics surface their aging bucket under the lens terms.
fn aging_bucket_for(
    metric: MetricId,
    outcome: &pnl_core::Disclosure<pnl_algo::extract::ResolvedMetric>,
    lens: &Lens,
) -> Option<String> {
    if metric != MetricId::Dso {
        return None;
    }
    outcome.value().map(|r| {
        match classify_aging(r.value, lens.terms) {
            AgingBucket::Current => "current",
            AgingBucket::Watch => "watch",
            AgingBucket::Overdue => "overdue",
        }
        .to_string()
    })
}

/// Engine identifiers echoed into every snapshot.
pub fn engine_identifiers() -> EngineMeta {
    EngineMeta {
        vendor: "pnl".to_string(),
        name: "pnl_engine".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build: "dev".to_string(),
    }
}
