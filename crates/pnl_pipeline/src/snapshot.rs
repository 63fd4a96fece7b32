//! Snapshot assembly: typed, serializable mirrors of the engine outputs and
//! the content-addressed `SNP:` id computed over the id-less body.
//!
//! A snapshot is created fresh per (file identity, lens) and never mutated;
//! a new lens or file produces a new snapshot.

use serde::{Deserialize, Serialize};

use pnl_algo::baseline::{DeltaDirection, PeriodComparison};
use pnl_algo::causality::CausalityEdge;
use pnl_algo::extract::ResolvedMetric;
use pnl_algo::score::DriftAxisScore;
use pnl_core::ledger::{EvidenceAnchor, EvidenceLedger, LedgerEntry, LedgerScope};
use pnl_core::{
    AxisId, ConfidencePct, Disclosure, FileId, Lens, MetricId, OrgUnit, ScoreTenths, SnapshotId,
    UnitKind,
};

use crate::PipelineError;

/// Engine identifiers (baked by the build in real deployments).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineMeta {
    pub vendor: String,
    pub name: String,
    pub version: String,
    pub build: String,
}

/// One KPI row of the executive scoreboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiBlock {
    pub metric: MetricId,
    pub label: String,
    pub unit: UnitKind,
    pub value: Disclosure<f64>,
    /// Period-over-period delta in tenths of a percent, when comparable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_pct_tenths: Option<i64>,
    /// True when the series was too short for the requested cycle.
    pub single_period: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>, // "up" | "down" | "flat"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<EvidenceAnchor>,
    /// AR aging bucket under the lens terms (day-count metrics only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aging_bucket: Option<String>,
}

/// Scored payload of a disclosed axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisScoreBlock {
    pub score: ScoreTenths,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_pct_tenths: Option<i64>,
    pub single_period: bool,
    pub confidence: ConfidencePct,
    pub evidence: Vec<EvidenceAnchor>,
}

/// One of the eight fixed drift-axis slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisBlock {
    pub axis: AxisId,
    pub code: String,
    pub label: String,
    pub outcome: Disclosure<AxisScoreBlock>,
}

/// Causality edge (symptom axis → owning org).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeBlock {
    pub axis: AxisId,
    pub org: OrgUnit,
    pub evidence: Vec<EvidenceAnchor>,
}

/// Open governance follow-up recorded for unresolved evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacklogItem {
    pub kind: String,   // "MAPPING_GAP"
    pub code: String,   // "ROW_MISSING::<metric>"
    pub status: String, // "OPEN"
}

/// Input digests echoed into the snapshot for integrity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestsBlock {
    pub rows_sha256: String,
    pub mapping_sha256: String,
}

/// The aggregate result for one (file identity, lens) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    pub id: SnapshotId,
    pub file_id: FileId,
    pub lens: Lens,
    pub period: Disclosure<String>,
    pub kpis: Vec<KpiBlock>,
    /// Exactly 8 entries, in `AxisId::ALL` order.
    pub axes: Vec<AxisBlock>,
    pub edges: Vec<EdgeBlock>,
    pub ledger: EvidenceLedger,
    pub backlog: Vec<BacklogItem>,
    pub engine: EngineMeta,
    pub digests: DigestsBlock,
}

// Id-less body used for content addressing.
#[derive(Serialize)]
struct SnapshotBody<'a> {
    file_id: &'a FileId,
    lens: &'a Lens,
    period: &'a Disclosure<String>,
    kpis: &'a [KpiBlock],
    axes: &'a [AxisBlock],
    edges: &'a [EdgeBlock],
    ledger: &'a EvidenceLedger,
    backlog: &'a [BacklogItem],
    engine: &'a EngineMeta,
    digests: &'a DigestsBlock,
}

pub(crate) struct SnapshotParts<'a> {
    pub file_id: &'a FileId,
    pub lens: &'a Lens,
    pub period: Disclosure<String>,
    pub kpis: Vec<KpiBlock>,
    pub axes: Vec<AxisBlock>,
    pub edges: Vec<EdgeBlock>,
    pub ledger: EvidenceLedger,
    pub engine: EngineMeta,
    pub digests: DigestsBlock,
}

pub(crate) fn build_snapshot(parts: SnapshotParts<'_>) -> Result<AnalysisSnapshot, PipelineError> {
    let backlog = backlog_from_ledger(&parts.ledger);

    let body = SnapshotBody {
        file_id: parts.file_id,
        lens: parts.lens,
        period: &parts.period,
        kpis: &parts.kpis,
        axes: &parts.axes,
        edges: &parts.edges,
        ledger: &parts.ledger,
        backlog: &backlog,
        engine: &parts.engine,
        digests: &parts.digests,
    };
    let id = pnl_io::hasher::snapshot_id_from_canonical(&body).map_err(PipelineError::from)?;

    Ok(AnalysisSnapshot {
        id,
        file_id: parts.file_id.clone(),
        lens: *parts.lens,
        period: parts.period,
        kpis: parts.kpis,
        axes: parts.axes,
        edges: parts.edges,
        ledger: parts.ledger,
        backlog,
        engine: parts.engine,
        digests: parts.digests,
    })
}

fn backlog_from_ledger(ledger: &EvidenceLedger) -> Vec<BacklogItem> {
    ledger
        .entries()
        .iter()
        .filter_map(|e| match e {
            LedgerEntry::NotDisclosed { scope: LedgerScope::Metric(m), .. } => Some(BacklogItem {
                kind: "MAPPING_GAP".to_string(),
                code: format!("ROW_MISSING::{m}"),
                status: "OPEN".to_string(),
            }),
            _ => None,
        })
        .collect()
}

/// KPI block from a resolved/unresolved metric plus its comparison.
pub(crate) fn kpi_block(
    metric: MetricId,
    resolved: &Disclosure<ResolvedMetric>,
    comparison: Option<&PeriodComparison>,
    aging_bucket: Option<String>,
) -> KpiBlock {
    let (delta_pct_tenths, single_period, direction) = match comparison {
        Some(PeriodComparison::Delta(d)) => (
            d.delta_pct_tenths,
            false,
            Some(
                match d.direction {
                    DeltaDirection::Up => "up",
                    DeltaDirection::Down => "down",
                    DeltaDirection::Flat => "flat",
                }
                .to_string(),
            ),
        ),
        Some(PeriodComparison::SinglePeriod) => (None, true, None),
        // Unresolved metrics have no comparison at all.
        None => (None, false, None),
    };

    KpiBlock {
        metric,
        label: metric.display().to_string(),
        unit: metric.unit(),
        value: resolved.as_ref().map(|r| r.value),
        delta_pct_tenths,
        single_period,
        direction,
        anchor: resolved.value().map(|r| r.anchor.clone()),
        aging_bucket,
    }
}

/// Axis block from a scored outcome.
pub(crate) fn axis_block(axis: AxisId, outcome: &Disclosure<DriftAxisScore>) -> AxisBlock {
    AxisBlock {
        axis,
        code: axis.code().to_string(),
        label: axis.display().to_string(),
        outcome: outcome.as_ref().map(|s| AxisScoreBlock {
            score: s.score,
            baseline: s.baseline,
            delta_pct_tenths: s.delta_pct_tenths,
            single_period: s.single_period,
            confidence: s.confidence,
            evidence: s.evidence.clone(),
        }),
    }
}

pub(crate) fn edge_block(edge: &CausalityEdge) -> EdgeBlock {
    EdgeBlock { axis: edge.axis, org: edge.org, evidence: edge.evidence.clone() }
}
