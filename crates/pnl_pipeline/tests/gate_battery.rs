//! Validator Gate battery against real and hand-damaged snapshots.

mod common;

use common::{sample_file_id, sample_lens, sample_rows, sample_table};
use pnl_core::variables::EngineConfig;
use pnl_core::{AxisId, Disclosure, MetricId};
use pnl_pipeline::{run, run_gate, UiState};

fn computed() -> pnl_pipeline::AnalysisSnapshot {
    run(
        &sample_rows(),
        &sample_table(),
        &sample_lens(),
        &sample_file_id(),
        &EngineConfig::default(),
    )
    .unwrap()
    .snapshot
}

#[test]
fn clean_snapshot_passes_every_check() {
    let snapshot = computed();
    let report = run_gate(&snapshot, None);
    assert!(report.pass);
    assert!(report.results.iter().all(|r| r.passed));
    // Fixed battery order, diagnostics retained per check.
    assert_eq!(report.results[0].gate_id, "GATE-FAB-001");
    assert!(report.results.len() >= 8);
}

#[test]
fn score_without_anchors_fails_no_fabrication_naming_the_axis() {
    let mut snapshot = computed();
    let slot = snapshot
        .axes
        .iter_mut()
        .find(|a| a.axis == AxisId::RevenueDrift)
        .unwrap();
    if let Disclosure::Disclosed(score) = &mut slot.outcome {
        score.evidence.clear();
    } else {
        panic!("fixture resolves revenue drift");
    }

    let report = run_gate(&snapshot, None);
    assert!(!report.pass);
    assert!(!report.shippable);
    let failing: Vec<_> = report.failing().collect();
    assert!(failing
        .iter()
        .any(|r| r.gate_id == "GATE-FAB-001" && r.reason.contains("D01")));
}

#[test]
fn kpi_value_without_anchor_fails_no_fabrication() {
    let mut snapshot = computed();
    let kpi = snapshot
        .kpis
        .iter_mut()
        .find(|k| k.metric == MetricId::Revenue)
        .unwrap();
    kpi.anchor = None;

    let report = run_gate(&snapshot, None);
    assert!(report
        .failing()
        .any(|r| r.gate_id == "GATE-FAB-001" && r.reason.contains("revenue")));
}

#[test]
fn edge_without_evidence_fails_edge_integrity() {
    let mut snapshot = computed();
    assert!(!snapshot.edges.is_empty(), "fixture produces edges");
    snapshot.edges[0].evidence.clear();

    let report = run_gate(&snapshot, None);
    assert!(report.failing().any(|r| r.gate_id == "GATE-EDGE-001"));
}

#[test]
fn edge_to_non_owner_org_fails_edge_targets() {
    let mut snapshot = computed();
    let edge = snapshot
        .edges
        .iter_mut()
        .find(|e| e.axis == AxisId::RevenueDrift)
        .expect("revenue drift owns edges");
    // Procurement does not own revenue drift.
    edge.org = pnl_core::OrgUnit::Procurement;

    let report = run_gate(&snapshot, None);
    assert!(report.failing().any(|r| r.gate_id == "GATE-EDGE-002"));
}

#[test]
fn missing_axis_slot_fails_axis_count() {
    let mut snapshot = computed();
    snapshot.axes.pop();
    let report = run_gate(&snapshot, None);
    assert!(report
        .failing()
        .any(|r| r.gate_id == "GATE-AXES-001" && r.reason.contains("7")));
}

#[test]
fn duplicate_kpi_metric_fails_uniqueness() {
    let mut snapshot = computed();
    let dup = snapshot.kpis[0].clone();
    snapshot.kpis.push(dup);
    let report = run_gate(&snapshot, None);
    assert!(report.failing().any(|r| r.gate_id == "GATE-KPI-001"));
}

#[test]
fn ui_contract_checks_are_delegated_pass_throughs() {
    let snapshot = computed();

    let good = UiState {
        renders_not_disclosed_placeholder: true,
        disallowed_controls: vec![],
        gate_panel_visible: true,
    };
    assert!(run_gate(&snapshot, Some(&good)).pass);

    let bad = UiState {
        renders_not_disclosed_placeholder: false,
        disallowed_controls: vec!["raw-cell-editor".into()],
        gate_panel_visible: false,
    };
    let report = run_gate(&snapshot, Some(&bad));
    let ids: Vec<&str> = report.failing().map(|r| r.gate_id).collect();
    assert!(ids.contains(&"GATE-UI-001"));
    assert!(ids.contains(&"GATE-UI-002"));
    assert!(ids.contains(&"GATE-UI-003"));
    // UI failures gate shipping, not computation: snapshot is untouched.
    assert!(!report.shippable);
}

#[test]
fn gate_failure_never_blocks_snapshot_computation() {
    // The fixture's inventory metric is unresolved; the snapshot still
    // computes, discloses the gap, and the gate verdict rides alongside.
    let out = run(
        &sample_rows(),
        &sample_table(),
        &sample_lens(),
        &sample_file_id(),
        &EngineConfig::default(),
    )
    .unwrap();
    assert!(out
        .snapshot
        .backlog
        .iter()
        .any(|b| b.code == "ROW_MISSING::inventory" && b.kind == "MAPPING_GAP"));
    assert!(!out.snapshot.kpis.iter().any(|k| k.metric == MetricId::Inventory && k.value.is_disclosed()));
}
