//! Metric extractor: best-matching row per canonical metric, with anchors.
//!
//! Candidate rows are grouped by (sheet, row) and ranked by the total order
//! (match stage, sheet, row) — first wins, so two rows both labeled
//! "Revenue" at indices 5 and 9 always resolve to row 5. Within the winning
//! row, the value cells ordered by column are the period columns; the
//! rightmost is the current value and carries the anchor.
//!
//! Every resolved value appends one anchor to the ledger; every unresolved
//! metric appends a `NOT_DISCLOSED` marker naming the evidence required.

use std::collections::BTreeMap;

use pnl_core::determinism::{sort_stable, StableOrd};
use pnl_core::entities::{PeriodPoint, PeriodSeries, RawRow};
use pnl_core::ledger::{EvidenceAnchor, EvidenceLedger, LedgerScope};
use pnl_core::mapping::{MappingTable, MetricMapping, UnitScale};
use pnl_core::variables::MatcherConfig;
use pnl_core::{CellRef, Disclosure, FileId, MetricId};

use crate::mapper::{match_label, MatchStage};

/// One resolved canonical metric: normalized current value, its anchor, and
/// the full ordered period cells for downstream baseline/delta work.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedMetric {
    pub value: f64,
    pub stage: MatchStage,
    pub anchor: EvidenceAnchor,
    /// Ordered (oldest → newest) normalized values of the winning row.
    pub series: PeriodSeries,
}

struct Candidate<'a> {
    stage: MatchStage,
    sheet: &'a str,
    row: u32,
    /// (col, raw value, cell-level scale hint) cells of this row.
    cells: Vec<(u32, f64, Option<UnitScale>)>,
    label: &'a str,
}

// Total, reproducible candidate order: stage rank, then sheet, then row.
impl<'a> StableOrd for Candidate<'a> {
    type Key = (u8, &'a str, u32);
    fn stable_key(&self) -> Self::Key {
        (self.stage.rank(), self.sheet, self.row)
    }
}

/// Extract one value (or `NOT_DISCLOSED`) per mapped canonical metric.
pub fn extract_metrics(
    rows: &[RawRow],
    table: &MappingTable,
    cfg: &MatcherConfig,
    file_id: &FileId,
    ledger: &mut EvidenceLedger,
) -> BTreeMap<MetricId, Disclosure<ResolvedMetric>> {
    let mut out = BTreeMap::new();

    for mapping in table.iter() {
        let resolved = extract_one(rows, mapping, cfg, file_id, ledger);
        match &resolved {
            Disclosure::Disclosed(r) => {
                ledger.push_anchor(LedgerScope::Metric(mapping.metric), r.anchor.clone());
            }
            Disclosure::NotDisclosed => {
                ledger.push_not_disclosed(
                    LedgerScope::Metric(mapping.metric),
                    format!(
                        "a row labeled like {:?} with a numeric value",
                        mapping.synonyms.first().map(String::as_str).unwrap_or("?")
                    ),
                );
            }
        }
        out.insert(mapping.metric, resolved);
    }

    derive_gross_margin(&mut out, table, ledger);
    out
}

fn extract_one(
    rows: &[RawRow],
    mapping: &MetricMapping,
    cfg: &MatcherConfig,
    file_id: &FileId,
    ledger: &mut EvidenceLedger,
) -> Disclosure<ResolvedMetric> {
    // Group matching value cells by (sheet, row); remember the stage reached.
    let mut groups: BTreeMap<(&str, u32), Candidate<'_>> = BTreeMap::new();
    for r in rows {
        let Some(v) = r.raw_value else { continue };
        let Some(stage) = match_label(mapping, cfg, &r.raw_label) else { continue };
        let entry = groups.entry((r.sheet.as_str(), r.row)).or_insert(Candidate {
            stage,
            sheet: r.sheet.as_str(),
            row: r.row,
            cells: Vec::new(),
            label: r.raw_label.as_str(),
        });
        // A row carries one label; keep the strongest stage seen for it.
        if stage < entry.stage {
            entry.stage = stage;
        }
        let hint = r.unit_hint.as_deref().and_then(UnitScale::from_hint);
        entry.cells.push((r.col, v, hint));
    }

    let mut candidates: Vec<Candidate<'_>> = groups.into_values().collect();
    sort_stable(&mut candidates);

    let Some(winner) = candidates.first() else {
        return Disclosure::NotDisclosed;
    };

    if candidates.len() > 1 && candidates[1].stage == winner.stage {
        ledger.push_audit(
            "MappingAmbiguous",
            format!(
                "{}: rows {} and {} tied at stage {}; row {} selected",
                mapping.metric,
                winner.row,
                candidates[1].row,
                winner.stage.as_str(),
                winner.row
            ),
        );
    }

    let mut cells = winner.cells.clone();
    cells.sort_by_key(|(col, _, _)| *col);
    let (curr_col, curr_raw, curr_hint) =
        *cells.last().expect("candidate groups hold >=1 cell");

    let series = PeriodSeries {
        metric: mapping.metric,
        points: cells
            .iter()
            .map(|(col, v, hint)| PeriodPoint {
                period: format!("col{col:02}"),
                value: mapping.normalize_hinted(*v, *hint),
            })
            .collect(),
    };

    Disclosure::Disclosed(ResolvedMetric {
        value: mapping.normalize_hinted(curr_raw, curr_hint),
        stage: winner.stage,
        anchor: EvidenceAnchor {
            file_id: file_id.clone(),
            cell: CellRef::new(winner.sheet, winner.row, curr_col),
            raw_value: curr_raw,
            unit: mapping.metric.unit(),
            metric: mapping.metric,
            relevance_note: format!(
                "label {:?} matched at stage {}",
                winner.label,
                winner.stage.as_str()
            ),
        },
        series,
    })
}

/// Gross margin is derivable when the ratio row is absent but both inputs
/// resolved from cells. The derived value anchors both input cells and the
/// note records the formula; nothing is derived from derived values.
fn derive_gross_margin(
    out: &mut BTreeMap<MetricId, Disclosure<ResolvedMetric>>,
    table: &MappingTable,
    ledger: &mut EvidenceLedger,
) {
    if table.get(MetricId::GrossMargin).is_none() {
        return;
    }
    if matches!(out.get(&MetricId::GrossMargin), Some(Disclosure::Disclosed(_))) {
        return;
    }
    let (Some(Disclosure::Disclosed(gp)), Some(Disclosure::Disclosed(rev))) =
        (out.get(&MetricId::GrossProfit), out.get(&MetricId::Revenue))
    else {
        return;
    };
    if rev.value == 0.0 {
        return;
    }
    let value = gp.value / rev.value * 100.0;

    let anchor = |src: &ResolvedMetric| EvidenceAnchor {
        metric: MetricId::GrossMargin,
        relevance_note: format!(
            "derived: gross_profit / revenue, input {}",
            src.anchor.cell.a1()
        ),
        ..src.anchor.clone()
    };
    let primary = anchor(gp);
    ledger.push_anchor(LedgerScope::Metric(MetricId::GrossMargin), primary.clone());
    ledger.push_anchor(LedgerScope::Metric(MetricId::GrossMargin), anchor(rev));

    out.insert(
        MetricId::GrossMargin,
        Disclosure::Disclosed(ResolvedMetric {
            value,
            stage: MatchStage::TokenOverlap,
            anchor: primary,
            series: PeriodSeries::new(MetricId::GrossMargin),
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnl_core::mapping::{SignConvention, UnitScale};

    fn row(sheet: &str, r: u32, c: u32, label: &str, v: Option<f64>) -> RawRow {
        RawRow {
            sheet: sheet.into(),
            row: r,
            col: c,
            raw_label: label.into(),
            raw_value: v,
            unit_hint: None,
        }
    }

    fn mapping(metric: MetricId, synonyms: &[&str], forbidden: &[&str]) -> MetricMapping {
        MetricMapping {
            metric,
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
            unit_scale: UnitScale::Ones,
            sign: SignConvention::AsReported,
            forbidden_tokens: forbidden.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn table(entries: Vec<MetricMapping>) -> MappingTable {
        MappingTable::new(entries).unwrap()
    }

    fn file_id() -> FileId {
        "sample".parse().unwrap()
    }

    #[test]
    fn forbidden_token_never_steals_the_absolute_metric() {
        let rows = vec![
            row("IS", 3, 2, "Gross Profit Margin", Some(0.11)),
            row("IS", 7, 2, "Gross Profit", Some(1_200_000.0)),
        ];
        let t = table(vec![mapping(
            MetricId::GrossProfit,
            &["Gross Profit"],
            &["margin", "%", "率"],
        )]);
        let mut ledger = EvidenceLedger::new();
        let out = extract_metrics(&rows, &t, &MatcherConfig::default(), &file_id(), &mut ledger);

        let r = out[&MetricId::GrossProfit].value().expect("resolved");
        assert_eq!(r.value, 1_200_000.0);
        assert_eq!(r.anchor.cell.row, 7);
        assert_eq!(ledger.anchors_for_metric(MetricId::GrossProfit).len(), 1);
    }

    #[test]
    fn tie_break_selects_lowest_row_and_logs_ambiguity() {
        let rows = vec![
            row("IS", 9, 2, "Revenue", Some(900.0)),
            row("IS", 5, 2, "Revenue", Some(500.0)),
        ];
        let t = table(vec![mapping(MetricId::Revenue, &["Revenue"], &[])]);
        let mut ledger = EvidenceLedger::new();
        let out = extract_metrics(&rows, &t, &MatcherConfig::default(), &file_id(), &mut ledger);

        let r = out[&MetricId::Revenue].value().expect("resolved");
        assert_eq!(r.anchor.cell.row, 5);
        assert_eq!(r.value, 500.0);
        assert!(ledger.audit().iter().any(|n| n.code == "MappingAmbiguous"));
    }

    #[test]
    fn rightmost_column_is_current_and_series_is_ordered() {
        let rows = vec![
            row("IS", 4, 5, "Revenue", Some(110.0)),
            row("IS", 4, 3, "Revenue", Some(90.0)),
            row("IS", 4, 4, "Revenue", Some(100.0)),
        ];
        let t = table(vec![mapping(MetricId::Revenue, &["Revenue"], &[])]);
        let mut ledger = EvidenceLedger::new();
        let out = extract_metrics(&rows, &t, &MatcherConfig::default(), &file_id(), &mut ledger);

        let r = out[&MetricId::Revenue].value().expect("resolved");
        assert_eq!(r.value, 110.0);
        assert_eq!(r.anchor.cell.col, 5);
        let vals: Vec<f64> = r.series.points.iter().map(|p| p.value).collect();
        assert_eq!(vals, vec![90.0, 100.0, 110.0]);
    }

    #[test]
    fn missing_metric_is_not_disclosed_with_required_note() {
        let rows = vec![row("IS", 1, 2, "Revenue", Some(100.0))];
        let t = table(vec![
            mapping(MetricId::Revenue, &["Revenue"], &[]),
            mapping(MetricId::Ccc, &["CCC", "現金循環"], &[]),
        ]);
        let mut ledger = EvidenceLedger::new();
        let out = extract_metrics(&rows, &t, &MatcherConfig::default(), &file_id(), &mut ledger);

        assert!(!out[&MetricId::Ccc].is_disclosed());
        assert!(ledger.covers(LedgerScope::Metric(MetricId::Ccc)));
        assert!(ledger.anchors_for_metric(MetricId::Ccc).is_empty());
    }

    #[test]
    fn gross_margin_derives_from_resolved_inputs_only() {
        let rows = vec![
            row("IS", 1, 2, "Revenue", Some(2_000.0)),
            row("IS", 2, 2, "Gross Profit", Some(500.0)),
        ];
        let t = table(vec![
            mapping(MetricId::Revenue, &["Revenue"], &[]),
            mapping(MetricId::GrossProfit, &["Gross Profit"], &["margin"]),
            mapping(MetricId::GrossMargin, &["Gross Margin"], &[]),
        ]);
        let mut ledger = EvidenceLedger::new();
        let out = extract_metrics(&rows, &t, &MatcherConfig::default(), &file_id(), &mut ledger);

        let gm = out[&MetricId::GrossMargin].value().expect("derived");
        assert_eq!(gm.value, 25.0);
        assert!(gm.anchor.relevance_note.starts_with("derived:"));
        assert_eq!(ledger.anchors_for_metric(MetricId::GrossMargin).len(), 2);
    }

    #[test]
    fn cell_scale_hint_overrides_mapping_scale() {
        let mut r = row("IS", 2, 3, "Revenue", Some(1_200.0));
        r.unit_hint = Some("NT$ thousands".into());
        let t = table(vec![mapping(MetricId::Revenue, &["Revenue"], &[])]);
        let mut ledger = EvidenceLedger::new();
        let out = extract_metrics(&[r], &t, &MatcherConfig::default(), &file_id(), &mut ledger);

        let resolved = out[&MetricId::Revenue].value().expect("resolved");
        assert_eq!(resolved.value, 1_200_000.0);
        // Anchors keep the raw cell value; normalization is derived.
        assert_eq!(resolved.anchor.raw_value, 1_200.0);
    }

    #[test]
    fn blank_cells_are_skipped_not_zeroed() {
        let rows = vec![row("IS", 1, 2, "Revenue", None)];
        let t = table(vec![mapping(MetricId::Revenue, &["Revenue"], &[])]);
        let mut ledger = EvidenceLedger::new();
        let out = extract_metrics(&rows, &t, &MatcherConfig::default(), &file_id(), &mut ledger);
        assert!(!out[&MetricId::Revenue].is_disclosed());
    }
}
