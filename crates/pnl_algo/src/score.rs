//! Causality scorer, part 1: the eight fixed drift axes.
//!
//! Per axis: a bounded, deterministic score from the underlying deltas (or
//! levels, for day-count axes), confidence equal to the resolved fraction of
//! the axis's required metrics, and the evidence anchors of those metrics.
//! An axis with zero resolved inputs is itself not disclosed — it is never
//! assigned a score.

use std::collections::BTreeMap;

use pnl_core::ledger::{EvidenceAnchor, EvidenceLedger, LedgerScope};
use pnl_core::lens::Lens;
use pnl_core::variables::{EngineConfig, LevelCurve};
use pnl_core::{AxisId, ConfidencePct, Disclosure, MetricId, ScoreTenths};

use crate::baseline::{classify_aging, AgingBucket, PeriodComparison};
use crate::extract::ResolvedMetric;

/// Scored drift axis. Bounds are structural (`ScoreTenths`, `ConfidencePct`).
#[derive(Clone, Debug, PartialEq)]
pub struct DriftAxisScore {
    pub axis: AxisId,
    pub score: ScoreTenths,
    /// Baseline of the axis's primary metric, when a comparison existed.
    pub baseline: Option<f64>,
    /// Primary-metric delta in tenths of a percent, when defined.
    pub delta_pct_tenths: Option<i64>,
    /// True when the primary series was too short for the requested cycle.
    pub single_period: bool,
    pub confidence: ConfidencePct,
    pub evidence: Vec<EvidenceAnchor>,
}

/// Score all eight axes in `AxisId::ALL` order.
pub fn score_axes(
    resolved: &BTreeMap<MetricId, Disclosure<ResolvedMetric>>,
    comparisons: &BTreeMap<MetricId, PeriodComparison>,
    lens: &Lens,
    cfg: &EngineConfig,
    ledger: &mut EvidenceLedger,
) -> Vec<(AxisId, Disclosure<DriftAxisScore>)> {
    AxisId::ALL
        .iter()
        .map(|axis| (*axis, score_one(*axis, resolved, comparisons, lens, cfg, ledger)))
        .collect()
}

fn score_one(
    axis: AxisId,
    resolved: &BTreeMap<MetricId, Disclosure<ResolvedMetric>>,
    comparisons: &BTreeMap<MetricId, PeriodComparison>,
    lens: &Lens,
    cfg: &EngineConfig,
    ledger: &mut EvidenceLedger,
) -> Disclosure<DriftAxisScore> {
    let required = axis.required_metrics();
    let inputs: Vec<(&MetricId, &ResolvedMetric)> = required
        .iter()
        .filter_map(|m| resolved.get(m).and_then(|d| d.value()).map(|r| (m, r)))
        .collect();

    if inputs.is_empty() {
        let names: Vec<&str> = required.iter().map(|m| m.as_str()).collect();
        ledger.push_not_disclosed(
            LedgerScope::Axis(axis),
            format!("at least one resolved metric of: {}", names.join(", ")),
        );
        return Disclosure::NotDisclosed;
    }

    let confidence = ConfidencePct::fraction(inputs.len(), required.len());

    // Primary metric = first resolved in declaration order; its comparison
    // supplies the axis baseline/delta fields.
    let (primary, _) = inputs[0];
    let (baseline, delta_pct_tenths, single_period) = match comparisons.get(primary) {
        Some(PeriodComparison::Delta(d)) => (Some(d.baseline), d.delta_pct_tenths, false),
        Some(PeriodComparison::SinglePeriod) | None => (None, None, true),
    };

    let score = axis_score(axis, &inputs, delta_pct_tenths, lens, cfg);

    let evidence: Vec<EvidenceAnchor> = inputs.iter().map(|(_, r)| r.anchor.clone()).collect();
    for a in &evidence {
        ledger.push_anchor(LedgerScope::Axis(axis), a.clone());
    }

    Disclosure::Disclosed(DriftAxisScore {
        axis,
        score,
        baseline,
        delta_pct_tenths,
        single_period,
        confidence,
        evidence,
    })
}

/// Neutral midpoint used when inputs resolved but no comparison is possible.
fn neutral() -> ScoreTenths {
    ScoreTenths::saturating(50)
}

fn drift_or_neutral(cfg: &EngineConfig, delta_pct_tenths: Option<i64>) -> ScoreTenths {
    match delta_pct_tenths {
        Some(d) => {
            let mag = d.unsigned_abs().min(u64::from(u16::MAX)) as u16;
            cfg.drift_curve.score(mag)
        }
        None => neutral(),
    }
}

fn current_value(
    inputs: &[(&MetricId, &ResolvedMetric)],
    metric: MetricId,
) -> Option<f64> {
    inputs.iter().find(|(m, _)| **m == metric).map(|(_, r)| r.value)
}

fn axis_score(
    axis: AxisId,
    inputs: &[(&MetricId, &ResolvedMetric)],
    delta_pct_tenths: Option<i64>,
    lens: &Lens,
    cfg: &EngineConfig,
) -> ScoreTenths {
    match axis {
        // Level-driven: the absolute cash-cycle length carries the signal.
        AxisId::CashCycleDrift => match current_value(inputs, MetricId::Ccc) {
            Some(ccc) => LevelCurve::ccc().score(ccc),
            None => drift_or_neutral(cfg, delta_pct_tenths),
        },
        // Terms-driven: DSO classified against the lens's credit terms.
        AxisId::ArQualityDrift => match current_value(inputs, MetricId::Dso) {
            Some(dso) => match classify_aging(dso, lens.terms) {
                AgingBucket::Current => ScoreTenths::saturating(40),
                AgingBucket::Watch => ScoreTenths::saturating(65),
                AgingBucket::Overdue => ScoreTenths::saturating(85),
            },
            None => drift_or_neutral(cfg, delta_pct_tenths),
        },
        // Ratio-driven: OPEX share of revenue.
        AxisId::CostStructureDrift => {
            match (current_value(inputs, MetricId::Opex), current_value(inputs, MetricId::Revenue))
            {
                (Some(opex), Some(rev)) if rev != 0.0 => {
                    let ratio = (opex / rev).abs();
                    if ratio >= 0.35 {
                        ScoreTenths::saturating(75)
                    } else if ratio >= 0.25 {
                        ScoreTenths::saturating(65)
                    } else {
                        ScoreTenths::saturating(45)
                    }
                }
                _ => drift_or_neutral(cfg, delta_pct_tenths),
            }
        }
        // Delta-driven axes share the configured drift curve.
        AxisId::RevenueDrift
        | AxisId::ConcentrationDrift
        | AxisId::MarginDrift
        | AxisId::InventoryDrift
        | AxisId::ExecutionDrift => drift_or_neutral(cfg, delta_pct_tenths),
    }
}
