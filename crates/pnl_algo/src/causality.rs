//! Causality scorer, part 2: the bipartite symptom → owner graph.
//!
//! One edge per (disclosed axis, owning org) pair for which supporting
//! evidence exists. An axis that is not disclosed, or that somehow carries
//! no anchors, produces no edges — there are no dangling or zero-evidence
//! edges by construction.

use pnl_core::ledger::{EvidenceAnchor, EvidenceLedger, LedgerScope};
use pnl_core::{AxisId, Disclosure, OrgUnit};

use crate::score::DriftAxisScore;

/// Edge of the causality graph. `evidence` is non-empty by construction.
#[derive(Clone, Debug, PartialEq)]
pub struct CausalityEdge {
    pub axis: AxisId,
    pub org: OrgUnit,
    pub evidence: Vec<EvidenceAnchor>,
}

/// Build the graph from scored axes; edges appear in (axis, owner-table)
/// order, which is total and reproducible.
pub fn build_edges(
    axes: &[(AxisId, Disclosure<DriftAxisScore>)],
    ledger: &mut EvidenceLedger,
) -> Vec<CausalityEdge> {
    let mut edges = Vec::new();
    for (axis, outcome) in axes {
        let Some(score) = outcome.value() else { continue };
        if score.evidence.is_empty() {
            continue;
        }
        for org in axis.owners() {
            ledger.push_anchor(
                LedgerScope::Edge { axis: *axis, org: *org },
                score.evidence[0].clone(),
            );
            edges.push(CausalityEdge {
                axis: *axis,
                org: *org,
                evidence: score.evidence.clone(),
            });
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnl_core::ids::CellRef;
    use pnl_core::{ConfidencePct, MetricId, ScoreTenths};

    fn anchor() -> EvidenceAnchor {
        EvidenceAnchor {
            file_id: "sample".parse().unwrap(),
            cell: CellRef::new("IS", 2, 3),
            raw_value: 42.0,
            unit: MetricId::Revenue.unit(),
            metric: MetricId::Revenue,
            relevance_note: "test".into(),
        }
    }

    fn scored(axis: AxisId, evidence: Vec<EvidenceAnchor>) -> Disclosure<DriftAxisScore> {
        Disclosure::Disclosed(DriftAxisScore {
            axis,
            score: ScoreTenths::saturating(70),
            baseline: None,
            delta_pct_tenths: None,
            single_period: true,
            confidence: ConfidencePct::FULL,
            evidence,
        })
    }

    #[test]
    fn disclosed_axis_links_every_static_owner() {
        let axes = vec![(AxisId::RevenueDrift, scored(AxisId::RevenueDrift, vec![anchor()]))];
        let mut ledger = EvidenceLedger::new();
        let edges = build_edges(&axes, &mut ledger);

        assert_eq!(edges.len(), AxisId::RevenueDrift.owners().len());
        assert!(edges.iter().all(|e| !e.evidence.is_empty()));
        assert!(edges.iter().all(|e| AxisId::RevenueDrift.owners().contains(&e.org)));
        assert!(ledger.covers(LedgerScope::Edge {
            axis: AxisId::RevenueDrift,
            org: AxisId::RevenueDrift.owners()[0],
        }));
    }

    #[test]
    fn undisclosed_or_anchorless_axes_produce_no_edges() {
        let axes = vec![
            (AxisId::RevenueDrift, Disclosure::NotDisclosed),
            (AxisId::MarginDrift, scored(AxisId::MarginDrift, vec![])),
        ];
        let mut ledger = EvidenceLedger::new();
        let edges = build_edges(&axes, &mut ledger);
        assert!(edges.is_empty());
        assert!(ledger.is_empty());
    }
}
