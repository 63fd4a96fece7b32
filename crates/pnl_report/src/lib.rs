//! pnl_report — Pure offline report model + JSON renderer.
//!
//! Determinism rules:
//! - No network, no I/O here. Callers supply artifacts already in-memory.
//! - Scores/deltas render from their integer (tenths) wire form; no float
//!   arithmetic on scored quantities.
//! - Stable section order and field names.
//!
//! Inputs are accepted as JSON values (`serde_json::Value`) to avoid tight
//! coupling with pnl_pipeline concrete types while keeping signatures stable
//! across the workspace. "Not disclosed" always renders as an explicit
//! placeholder ("—" plus status), never as an omitted or zero field.

#![deny(unsafe_code)]

pub use pnl_core::ids::SnapshotId;
pub use pnl_core::numerics::delta_tenths_string;

// ---- Artifact type aliases (loosely-coupled) ----
pub type SnapshotArtifact = serde_json::Value;
pub type GateReportArtifact = serde_json::Value;

/// Placeholder the presentation contract requires for undisclosed values.
pub const NOT_DISCLOSED_PLACEHOLDER: &str = "—";

// ===== Errors =====
#[derive(Debug)]
pub enum ReportError {
    MissingField(&'static str),
    Inconsistent(&'static str),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::MissingField(p) => write!(f, "missing field: {p}"),
            ReportError::Inconsistent(p) => write!(f, "inconsistent artifact: {p}"),
        }
    }
}

impl std::error::Error for ReportError {}

// ===== Model =====
#[derive(Clone, Debug, serde::Serialize)]
pub struct ReportModel {
    pub cover: SectionCover,
    pub scoreboard: SectionScoreboard,
    pub drift_panel: SectionDrift,
    pub causality: SectionCausality,
    pub evidence: SectionEvidence,
    pub gates_panel: SectionGates,
    pub integrity: SectionIntegrity,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct SectionCover {
    pub title: String,
    pub period: String,
    pub lens_line: String,
    pub shippable: bool,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct KpiRow {
    pub metric: String,
    pub label: String,
    pub value: String,
    pub delta: String,
    pub disclosed: bool,
    pub anchor: Option<String>,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct SectionScoreboard {
    pub rows: Vec<KpiRow>,
    /// One-line narrative naming the two largest moves, or an explicit
    /// "no comparison" note — never fabricated numbers.
    pub top_deltas: String,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct DriftRow {
    pub code: String,
    pub label: String,
    pub score: String,
    pub confidence: String,
    pub disclosed: bool,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct SectionDrift {
    pub rows: Vec<DriftRow>,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct EdgeRow {
    pub axis: String,
    pub org: String,
    pub anchors: u64,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct SectionCausality {
    pub edges: Vec<EdgeRow>,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct EvidenceRow {
    pub metric: String,
    pub anchor: String,
    pub value: String,
    pub unit: String,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct SectionEvidence {
    pub rows: Vec<EvidenceRow>,
    pub open_gaps: Vec<String>,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct GateRow {
    pub gate_id: String,
    pub pass: bool,
    pub reason: String,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct SectionGates {
    pub rows: Vec<GateRow>,
    pub pass: bool,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct SectionIntegrity {
    pub snapshot_id: String,
    pub file_id: String,
    pub engine_vendor: String,
    pub engine_name: String,
    pub engine_version: String,
    pub rows_sha256: String,
    pub mapping_sha256: String,
}

// ===== API =====

/// Build the report model from artifacts (pure, offline).
pub fn build_model(
    snapshot: &SnapshotArtifact,
    gates: &GateReportArtifact,
) -> Result<ReportModel, ReportError> {
    // ---- Cover ----
    let period = disclosure_str(snapshot.pointer("/period"));
    let lens_line = ["cycle", "terms", "mode", "hold"]
        .iter()
        .filter_map(|k| {
            snapshot
                .pointer(&format!("/lens/{k}"))
                .and_then(|v| v.as_str())
                .map(|v| format!("{k}:{v}"))
        })
        .collect::<Vec<_>>()
        .join(" | ");
    let shippable = gates.pointer("/shippable").and_then(|v| v.as_bool()).unwrap_or(false);
    let cover = SectionCover {
        title: "P&L Governance Snapshot".to_string(),
        period,
        lens_line,
        shippable,
    };

    // ---- Scoreboard ----
    let kpis = snapshot
        .pointer("/kpis")
        .and_then(|v| v.as_array())
        .ok_or(ReportError::MissingField("kpis"))?;
    let mut rows = Vec::with_capacity(kpis.len());
    let mut deltas: Vec<(u64, i64, String)> = Vec::new();
    for k in kpis {
        let metric = json_str(k, "/metric")?;
        let label = json_str(k, "/label")?;
        let unit = json_str(k, "/unit")?;
        let disclosed = k.pointer("/value/status").and_then(|v| v.as_str()) == Some("DISCLOSED");
        let value = if disclosed {
            k.pointer("/value/value")
                .and_then(|v| v.as_f64())
                .map(|v| format_value(v, &unit))
                .ok_or(ReportError::Inconsistent("kpi value disclosed but non-numeric"))?
        } else {
            NOT_DISCLOSED_PLACEHOLDER.to_string()
        };
        let delta = match k.pointer("/delta_pct_tenths").and_then(|v| v.as_i64()) {
            Some(t) => {
                deltas.push((t.unsigned_abs(), t, label.clone()));
                format!("{}%", delta_tenths_string(t))
            }
            None if k.pointer("/single_period").and_then(|v| v.as_bool()).unwrap_or(false) => {
                "single-period".to_string()
            }
            None => NOT_DISCLOSED_PLACEHOLDER.to_string(),
        };
        rows.push(KpiRow {
            metric,
            label,
            value,
            delta,
            disclosed,
            anchor: k
                .pointer("/anchor/cell")
                .map(cell_a1)
                .transpose()?,
        });
    }
    deltas.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.2.cmp(&b.2)));
    let top_deltas = if deltas.is_empty() {
        "Top deltas: N/A (missing prior / baseline)".to_string()
    } else {
        let items: Vec<String> = deltas
            .iter()
            .take(2)
            .map(|(_, t, label)| {
                let sign = if *t > 0 { "+" } else { "" };
                format!("{label} {sign}{}%", delta_tenths_string(*t))
            })
            .collect();
        format!("Top deltas: {}", items.join("; "))
    };
    let scoreboard = SectionScoreboard { rows, top_deltas };

    // ---- Drift panel (exactly the 8 library slots) ----
    let axes = snapshot
        .pointer("/axes")
        .and_then(|v| v.as_array())
        .ok_or(ReportError::MissingField("axes"))?;
    let mut drift_rows = Vec::with_capacity(axes.len());
    for a in axes {
        let disclosed = a.pointer("/outcome/status").and_then(|v| v.as_str()) == Some("DISCLOSED");
        let (score, confidence) = if disclosed {
            let score_tenths = a
                .pointer("/outcome/value/score")
                .and_then(|v| v.as_u64())
                .ok_or(ReportError::Inconsistent("axis disclosed without score"))?;
            let conf_pct = a
                .pointer("/outcome/value/confidence")
                .and_then(|v| v.as_u64())
                .ok_or(ReportError::Inconsistent("axis disclosed without confidence"))?;
            (
                format!("{}.{}/10", score_tenths / 10, score_tenths % 10),
                format!("{}.{:02}", conf_pct / 100, conf_pct % 100),
            )
        } else {
            (
                NOT_DISCLOSED_PLACEHOLDER.to_string(),
                NOT_DISCLOSED_PLACEHOLDER.to_string(),
            )
        };
        drift_rows.push(DriftRow {
            code: json_str(a, "/code")?,
            label: json_str(a, "/label")?,
            score,
            confidence,
            disclosed,
        });
    }
    let drift_panel = SectionDrift { rows: drift_rows };

    // ---- Causality ----
    let edges = snapshot
        .pointer("/edges")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .map(|e| {
                    Ok(EdgeRow {
                        axis: json_str(e, "/axis")?,
                        org: json_str(e, "/org")?,
                        anchors: e
                            .pointer("/evidence")
                            .and_then(|v| v.as_array())
                            .map(|a| a.len() as u64)
                            .unwrap_or(0),
                    })
                })
                .collect::<Result<Vec<_>, ReportError>>()
        })
        .transpose()?
        .unwrap_or_default();
    let causality = SectionCausality { edges };

    // ---- Evidence appendix (resolved ledger entries + open gaps) ----
    let mut ev_rows = Vec::new();
    if let Some(entries) = snapshot.pointer("/ledger/entries").and_then(|v| v.as_array()) {
        for e in entries {
            let Some(res) = e.pointer("/resolved") else { continue };
            let anchor = res.pointer("/anchor").ok_or(ReportError::MissingField("ledger anchor"))?;
            ev_rows.push(EvidenceRow {
                metric: json_str(anchor, "/metric")?,
                anchor: anchor
                    .pointer("/cell")
                    .map(cell_a1)
                    .transpose()?
                    .ok_or(ReportError::MissingField("anchor cell"))?,
                value: anchor
                    .pointer("/raw_value")
                    .and_then(|v| v.as_f64())
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| NOT_DISCLOSED_PLACEHOLDER.to_string()),
                unit: json_str(anchor, "/unit")?,
            });
        }
    }
    let open_gaps = snapshot
        .pointer("/backlog")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|b| b.pointer("/code").and_then(|v| v.as_str()).map(String::from))
                .collect()
        })
        .unwrap_or_default();
    let evidence = SectionEvidence { rows: ev_rows, open_gaps };

    // ---- Gates panel ----
    let gate_rows = gates
        .pointer("/results")
        .and_then(|v| v.as_array())
        .ok_or(ReportError::MissingField("gates.results"))?
        .iter()
        .map(|r| {
            Ok(GateRow {
                gate_id: json_str(r, "/gate_id")?,
                pass: r.pointer("/passed").and_then(|v| v.as_bool()).unwrap_or(false),
                reason: json_str(r, "/reason")?,
            })
        })
        .collect::<Result<Vec<_>, ReportError>>()?;
    let gates_panel = SectionGates {
        rows: gate_rows,
        pass: gates.pointer("/pass").and_then(|v| v.as_bool()).unwrap_or(false),
    };

    // ---- Integrity ----
    let integrity = SectionIntegrity {
        snapshot_id: json_str(snapshot, "/id")?,
        file_id: json_str(snapshot, "/file_id")?,
        engine_vendor: json_str(snapshot, "/engine/vendor")?,
        engine_name: json_str(snapshot, "/engine/name")?,
        engine_version: json_str(snapshot, "/engine/version")?,
        rows_sha256: json_str(snapshot, "/digests/rows_sha256")?,
        mapping_sha256: json_str(snapshot, "/digests/mapping_sha256")?,
    };

    Ok(ReportModel {
        cover,
        scoreboard,
        drift_panel,
        causality,
        evidence,
        gates_panel,
        integrity,
    })
}

// ===== Renderers =====

/// Serialize the model as JSON (deterministic field order via struct layout).
#[cfg(feature = "render_json")]
pub fn render_json(model: &ReportModel) -> Result<String, ReportError> {
    serde_json::to_string(model).map_err(|_| ReportError::Inconsistent("json_serialize"))
}

// ===== Helpers (pure) =====

fn json_str(root: &serde_json::Value, ptr: &str) -> Result<String, ReportError> {
    root.pointer(ptr)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or(ReportError::MissingField("string field"))
}

fn disclosure_str(v: Option<&serde_json::Value>) -> String {
    match v {
        Some(d) if d.pointer("/status").and_then(|s| s.as_str()) == Some("DISCLOSED") => d
            .pointer("/value")
            .and_then(|s| s.as_str())
            .unwrap_or(NOT_DISCLOSED_PLACEHOLDER)
            .to_string(),
        _ => NOT_DISCLOSED_PLACEHOLDER.to_string(),
    }
}

fn cell_a1(cell: &serde_json::Value) -> Result<String, ReportError> {
    let sheet = cell
        .pointer("/sheet")
        .and_then(|v| v.as_str())
        .ok_or(ReportError::MissingField("cell sheet"))?;
    let row = cell
        .pointer("/row")
        .and_then(|v| v.as_u64())
        .ok_or(ReportError::MissingField("cell row"))?;
    let col = cell
        .pointer("/col")
        .and_then(|v| v.as_u64())
        .ok_or(ReportError::MissingField("cell col"))?;
    Ok(pnl_core::CellRef::new(sheet, row as u32, col as u32).a1())
}

/// Display form per unit kind. Large currency amounts read in millions.
fn format_value(v: f64, unit: &str) -> String {
    match unit {
        "percent" => format!("{v:.1}%"),
        "days" => format!("{v:.1}"),
        "currency" if v.abs() >= 1_000_000.0 => format!("{:.1}M", v / 1_000_000.0),
        _ => format!("{v:.0}"),
    }
}
