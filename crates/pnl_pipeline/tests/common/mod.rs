//! Shared fixtures: a small bilingual income-statement export plus the
//! mapping table the engine ships against it.

#![allow(dead_code)] // each test binary uses a subset of these helpers

use pnl_core::entities::RawRow;
use pnl_core::mapping::{MappingTable, MetricMapping, SignConvention, UnitScale};
use pnl_core::{FileId, Lens, MetricId};

pub fn row(sheet: &str, r: u32, c: u32, label: &str, v: Option<f64>) -> RawRow {
    RawRow {
        sheet: sheet.into(),
        row: r,
        col: c,
        raw_label: label.into(),
        raw_value: v,
        unit_hint: None,
    }
}

fn mapping(
    metric: MetricId,
    synonyms: &[&str],
    forbidden: &[&str],
) -> MetricMapping {
    MetricMapping {
        metric,
        synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        unit_scale: UnitScale::Ones,
        sign: SignConvention::AsReported,
        forbidden_tokens: forbidden.iter().map(|s| s.to_string()).collect(),
    }
}

/// Mapping table covering the fixture sheets; `inventory` deliberately has
/// no matching rows so not-disclosed propagation stays observable.
pub fn sample_table() -> MappingTable {
    MappingTable::new(vec![
        mapping(MetricId::Revenue, &["Revenue", "營業收入"], &[]),
        mapping(MetricId::GrossProfit, &["Gross Profit", "營業毛利"], &["margin", "%", "率"]),
        mapping(MetricId::GrossMargin, &["Gross Margin", "毛利率"], &[]),
        mapping(MetricId::Opex, &["Operating Expense", "營業費用"], &[]),
        mapping(MetricId::NetIncome, &["Net Income", "本期淨利"], &["margin", "%", "率"]),
        mapping(MetricId::Dso, &["DSO", "應收天數"], &[]),
        mapping(MetricId::Ccc, &["CCC", "現金循環"], &[]),
        mapping(MetricId::Inventory, &["Inventory", "存貨"], &[]),
    ])
    .unwrap()
}

/// Two-period income statement (cols 3 = prior, 4 = current) plus a KPI
/// sheet whose name carries the reporting period.
pub fn sample_rows() -> Vec<RawRow> {
    vec![
        row("TWN_IS_2017-08", 5, 3, "Revenue", Some(1_000_000.0)),
        row("TWN_IS_2017-08", 5, 4, "Revenue", Some(650_000.0)),
        row("TWN_IS_2017-08", 6, 4, "Gross Profit Margin", Some(0.11)),
        row("TWN_IS_2017-08", 7, 3, "Gross Profit", Some(300_000.0)),
        row("TWN_IS_2017-08", 7, 4, "Gross Profit", Some(280_000.0)),
        row("TWN_IS_2017-08", 9, 3, "營業費用", Some(210_000.0)),
        row("TWN_IS_2017-08", 9, 4, "營業費用", Some(228_000.0)),
        row("TWN_IS_2017-08", 11, 4, "本期淨利", Some(52_000.0)),
        row("KPI", 2, 1, "DSO", Some(55.0)),
        row("KPI", 3, 1, "CCC", Some(130.0)),
    ]
}

pub fn sample_lens() -> Lens {
    Lens::parse("MONTHLY", "NET_30", "EVIDENCE_FIRST", "UNKNOWN").unwrap()
}

pub fn sample_file_id() -> FileId {
    "ebn-2017-08".parse().unwrap()
}
