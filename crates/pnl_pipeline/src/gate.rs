//! Validator Gate: the fixed, ordered battery of ship-stopper checks.
//!
//! Each check evaluates independently against a completed snapshot (and,
//! where relevant, a UI-state descriptor supplied by the presentation
//! layer) and returns pass/fail with a reason. The overall verdict is the
//! conjunction, but every individual result is retained for diagnostics.
//! A failing gate never blocks snapshot computation — it only clears the
//! shippable flag.

use serde::{Deserialize, Serialize};

use pnl_core::ledger::LedgerScope;
use pnl_core::AxisId;

use crate::snapshot::AnalysisSnapshot;

/// Presentation-layer state descriptor for the delegated contract checks.
/// Supplied by the caller; absent fields mean "not evaluated".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiState {
    /// The rendered view shows an explicit "Not disclosed" placeholder
    /// (rather than omitting or zero-filling) for undisclosed fields.
    pub renders_not_disclosed_placeholder: bool,
    /// Interactive controls exposed that the contract disallows.
    pub disallowed_controls: Vec<String>,
    /// The gate panel (pass/fail with reasons) is surfaced, not hidden.
    pub gate_panel_visible: bool,
}

/// One named check's outcome.
#[derive(Debug, Clone, Serialize)]
pub struct GateResult {
    pub gate_id: &'static str,
    pub passed: bool,
    pub reason: String,
}

/// Full battery outcome. `shippable` is the conjunction of all results.
#[derive(Debug, Clone, Serialize)]
pub struct GateReport {
    pub results: Vec<GateResult>,
    pub pass: bool,
    pub shippable: bool,
}

impl GateReport {
    pub fn failing(&self) -> impl Iterator<Item = &GateResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}

/// Evaluate the battery. Check order is fixed; results keep that order.
pub fn evaluate(snapshot: &AnalysisSnapshot, ui: Option<&UiState>) -> GateReport {
    let mut results = vec![
        check_no_fabrication(snapshot),
        check_ledger_coverage(snapshot),
        check_score_bounds(snapshot),
        check_confidence_bounds(snapshot),
        check_axis_count(snapshot),
        check_edge_anchors(snapshot),
        check_edge_targets(snapshot),
        check_kpi_uniqueness(snapshot),
    ];
    if let Some(ui) = ui {
        results.push(check_ui_placeholder(ui));
        results.push(check_ui_controls(ui));
        results.push(check_ui_gate_panel(ui));
    }

    let pass = results.iter().all(|r| r.passed);
    GateReport { results, pass, shippable: pass }
}

fn pass(gate_id: &'static str, reason: impl Into<String>) -> GateResult {
    GateResult { gate_id, passed: true, reason: reason.into() }
}

fn fail(gate_id: &'static str, reason: impl Into<String>) -> GateResult {
    GateResult { gate_id, passed: false, reason: reason.into() }
}

/// GATE-FAB-001 — no numeric/score field without an anchor or an explicit
/// disclosure marker.
fn check_no_fabrication(s: &AnalysisSnapshot) -> GateResult {
    const ID: &str = "GATE-FAB-001";

    for k in &s.kpis {
        if k.value.is_disclosed() && k.anchor.is_none() {
            return fail(ID, format!("kpi {} has a value but no evidence anchor", k.metric));
        }
    }
    for a in &s.axes {
        if let Some(score) = a.outcome.value() {
            if score.evidence.is_empty() {
                return fail(
                    ID,
                    format!("axis {} carries a score but zero evidence anchors", a.code),
                );
            }
        }
    }
    pass(ID, "every disclosed value carries evidence")
}

/// GATE-FAB-002 — the ledger covers every KPI metric and every axis slot
/// (resolved or explicitly not disclosed).
fn check_ledger_coverage(s: &AnalysisSnapshot) -> GateResult {
    const ID: &str = "GATE-FAB-002";

    for k in &s.kpis {
        if !s.ledger.covers(LedgerScope::Metric(k.metric)) {
            return fail(ID, format!("kpi {} reached the snapshot without a ledger entry", k.metric));
        }
    }
    for a in &s.axes {
        if !s.ledger.covers(LedgerScope::Axis(a.axis)) {
            return fail(ID, format!("axis {} reached the snapshot without a ledger entry", a.code));
        }
    }
    pass(ID, "ledger covers all kpis and axes")
}

/// GATE-BOUNDS-001 — scores within [0, 10].
fn check_score_bounds(s: &AnalysisSnapshot) -> GateResult {
    const ID: &str = "GATE-BOUNDS-001";
    for a in &s.axes {
        if let Some(score) = a.outcome.value() {
            if score.score.tenths() > 100 {
                return fail(ID, format!("axis {} score out of range", a.code));
            }
        }
    }
    pass(ID, "all scores within [0,10]")
}

/// GATE-BOUNDS-002 — confidences within [0, 1].
fn check_confidence_bounds(s: &AnalysisSnapshot) -> GateResult {
    const ID: &str = "GATE-BOUNDS-002";
    for a in &s.axes {
        if let Some(score) = a.outcome.value() {
            if score.confidence.pct() > 100 {
                return fail(ID, format!("axis {} confidence out of range", a.code));
            }
        }
    }
    pass(ID, "all confidences within [0,1]")
}

/// GATE-AXES-001 — exactly 8 axis slots, one per library axis, in order.
fn check_axis_count(s: &AnalysisSnapshot) -> GateResult {
    const ID: &str = "GATE-AXES-001";
    if s.axes.len() != AxisId::ALL.len() {
        return fail(ID, format!("expected 8 axis slots, found {}", s.axes.len()));
    }
    for (slot, expected) in s.axes.iter().zip(AxisId::ALL.iter()) {
        if slot.axis != *expected {
            return fail(ID, format!("axis slot {} out of library order", slot.code));
        }
    }
    pass(ID, "exactly 8 axes in library order")
}

/// GATE-EDGE-001 — every causality edge carries at least one anchor.
fn check_edge_anchors(s: &AnalysisSnapshot) -> GateResult {
    const ID: &str = "GATE-EDGE-001";
    for e in &s.edges {
        if e.evidence.is_empty() {
            return fail(ID, format!("edge {}→{} has no evidence anchors", e.axis.code(), e.org));
        }
    }
    pass(ID, "all edges carry evidence")
}

/// GATE-EDGE-002 — edges reference a disclosed axis and a valid owner.
fn check_edge_targets(s: &AnalysisSnapshot) -> GateResult {
    const ID: &str = "GATE-EDGE-002";
    for e in &s.edges {
        let Some(slot) = s.axes.iter().find(|a| a.axis == e.axis) else {
            return fail(ID, format!("edge references axis {} missing from snapshot", e.axis.code()));
        };
        if !slot.outcome.is_disclosed() {
            return fail(ID, format!("edge {}→{} hangs off an undisclosed axis", e.axis.code(), e.org));
        }
        if !e.axis.owners().contains(&e.org) {
            return fail(ID, format!("edge {}→{} names a non-owner org", e.axis.code(), e.org));
        }
    }
    pass(ID, "all edges reference disclosed axes and valid owners")
}

/// GATE-KPI-001 — canonical metric ids unique within the snapshot.
fn check_kpi_uniqueness(s: &AnalysisSnapshot) -> GateResult {
    const ID: &str = "GATE-KPI-001";
    let mut seen = std::collections::BTreeSet::new();
    for k in &s.kpis {
        if !seen.insert(k.metric) {
            return fail(ID, format!("duplicate kpi entry for {}", k.metric));
        }
    }
    pass(ID, "kpi metric ids unique")
}

/// GATE-UI-001 — undisclosed fields render an explicit placeholder.
fn check_ui_placeholder(ui: &UiState) -> GateResult {
    const ID: &str = "GATE-UI-001";
    if ui.renders_not_disclosed_placeholder {
        pass(ID, "not-disclosed placeholder rendered")
    } else {
        fail(ID, "view omits or zero-fills undisclosed fields instead of a placeholder")
    }
}

/// GATE-UI-002 — no disallowed interactive controls exposed.
fn check_ui_controls(ui: &UiState) -> GateResult {
    const ID: &str = "GATE-UI-002";
    if ui.disallowed_controls.is_empty() {
        pass(ID, "no disallowed controls exposed")
    } else {
        fail(ID, format!("disallowed controls exposed: {}", ui.disallowed_controls.join(", ")))
    }
}

/// GATE-UI-003 — gate verdicts are surfaced, not hidden.
fn check_ui_gate_panel(ui: &UiState) -> GateResult {
    const ID: &str = "GATE-UI-003";
    if ui.gate_panel_visible {
        pass(ID, "gate panel surfaced with reasons")
    } else {
        fail(ID, "gate verdicts hidden from the rendered view")
    }
}
