//! Append-only evidence ledger.
//!
//! Every numeric, scored, or graph output appends an anchor (or an explicit
//! `NOT_DISCLOSED` marker) here before it may enter the snapshot. The ledger
//! is queryable by canonical metric or by axis for audit, and the snapshot
//! gate re-checks coverage against it.

use crate::axes::{AxisId, OrgUnit};
use crate::ids::{CellRef, FileId};
use crate::metrics::{MetricId, UnitKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pointer from a computed figure back to its exact source cell.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EvidenceAnchor {
    pub file_id: FileId,
    pub cell: CellRef,
    pub raw_value: f64,
    pub unit: UnitKind,
    pub metric: MetricId,
    /// Why this cell supports the figure (match stage, derivation formula, …).
    pub relevance_note: String,
}

/// What a ledger entry is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LedgerScope {
    Metric(MetricId),
    Axis(AxisId),
    Edge { axis: AxisId, org: OrgUnit },
}

/// One ledger record: either resolved-with-anchor or explicitly not disclosed
/// (with a note naming the evidence that would resolve it).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LedgerEntry {
    Resolved {
        scope: LedgerScope,
        anchor: EvidenceAnchor,
    },
    NotDisclosed {
        scope: LedgerScope,
        /// What evidence is required to resolve this scope.
        required: String,
    },
}

impl LedgerEntry {
    pub fn scope(&self) -> LedgerScope {
        match self {
            LedgerEntry::Resolved { scope, .. } => *scope,
            LedgerEntry::NotDisclosed { scope, .. } => *scope,
        }
    }
}

/// Audit-only note (e.g. deterministic tie-break on ambiguous candidates).
/// Never a failure; retained for inspection.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AuditNote {
    pub code: String,
    pub detail: String,
}

/// Append-only collector. Entries keep insertion order (which is itself
/// deterministic: component order is fixed and each component iterates
/// closed domains in declaration order).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EvidenceLedger {
    entries: Vec<LedgerEntry>,
    audit: Vec<AuditNote>,
}

impl EvidenceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_anchor(&mut self, scope: LedgerScope, anchor: EvidenceAnchor) {
        self.entries.push(LedgerEntry::Resolved { scope, anchor });
    }

    pub fn push_not_disclosed(&mut self, scope: LedgerScope, required: impl Into<String>) {
        self.entries.push(LedgerEntry::NotDisclosed { scope, required: required.into() });
    }

    pub fn push_audit(&mut self, code: impl Into<String>, detail: impl Into<String>) {
        self.audit.push(AuditNote { code: code.into(), detail: detail.into() });
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn audit(&self) -> &[AuditNote] {
        &self.audit
    }

    /// Anchors recorded for one canonical metric.
    pub fn anchors_for_metric(&self, metric: MetricId) -> Vec<&EvidenceAnchor> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                LedgerEntry::Resolved { scope: LedgerScope::Metric(m), anchor } if *m == metric => {
                    Some(anchor)
                }
                _ => None,
            })
            .collect()
    }

    /// Anchors recorded for one drift axis.
    pub fn anchors_for_axis(&self, axis: AxisId) -> Vec<&EvidenceAnchor> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                LedgerEntry::Resolved { scope: LedgerScope::Axis(a), anchor } if *a == axis => {
                    Some(anchor)
                }
                _ => None,
            })
            .collect()
    }

    /// True when the ledger holds any entry (resolved or not-disclosed) for
    /// the given scope. The snapshot gate uses this for coverage checks.
    pub fn covers(&self, scope: LedgerScope) -> bool {
        self.entries.iter().any(|e| e.scope() == scope)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(metric: MetricId, row: u32) -> EvidenceAnchor {
        EvidenceAnchor {
            file_id: "f1".parse().unwrap(),
            cell: CellRef::new("IS", row, 3),
            raw_value: 100.0,
            unit: metric.unit(),
            metric,
            relevance_note: "exact label match".into(),
        }
    }

    #[test]
    fn queries_filter_by_scope() {
        let mut l = EvidenceLedger::new();
        l.push_anchor(LedgerScope::Metric(MetricId::Revenue), anchor(MetricId::Revenue, 5));
        l.push_anchor(LedgerScope::Axis(AxisId::RevenueDrift), anchor(MetricId::Revenue, 5));
        l.push_not_disclosed(LedgerScope::Metric(MetricId::Ccc), "a CCC / cash-cycle row");

        assert_eq!(l.anchors_for_metric(MetricId::Revenue).len(), 1);
        assert_eq!(l.anchors_for_metric(MetricId::Ccc).len(), 0);
        assert_eq!(l.anchors_for_axis(AxisId::RevenueDrift).len(), 1);
        assert!(l.covers(LedgerScope::Metric(MetricId::Ccc)));
        assert!(!l.covers(LedgerScope::Metric(MetricId::Opex)));
    }

    #[test]
    fn audit_notes_do_not_enter_entries() {
        let mut l = EvidenceLedger::new();
        l.push_audit("MappingAmbiguous", "revenue: rows 5 and 9 tied at stage exact");
        assert!(l.is_empty());
        assert_eq!(l.audit().len(), 1);
    }
}
