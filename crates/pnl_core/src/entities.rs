//! Input entities produced by the external spreadsheet parser.
//!
//! `RawRow` records are immutable and consumed read-only: one record per
//! labeled value cell. Several records sharing (sheet, row, raw_label) with
//! different columns are the period columns of one spreadsheet row.

use crate::metrics::MetricId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One labeled value cell from a parsed sheet.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawRow {
    pub sheet: String,
    /// 0-based row index of the spreadsheet row the label belongs to.
    pub row: u32,
    /// 0-based column index of the value cell.
    pub col: u32,
    pub raw_label: String,
    /// `None` for blank/non-numeric cells; never coerced to zero.
    pub raw_value: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unit_hint: Option<String>,
}

/// One (period, value) observation inside a series.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeriodPoint {
    pub period: String,
    pub value: f64,
}

/// Ordered (oldest → newest) observations for one canonical metric.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeriodSeries {
    pub metric: MetricId,
    pub points: Vec<PeriodPoint>,
}

impl PeriodSeries {
    pub fn new(metric: MetricId) -> Self {
        Self { metric, points: Vec::new() }
    }

    pub fn latest(&self) -> Option<&PeriodPoint> {
        self.points.last()
    }

    /// Baseline observation `shift` periods before the latest, if the series
    /// is long enough.
    pub fn baseline(&self, shift: usize) -> Option<&PeriodPoint> {
        if shift == 0 || self.points.len() <= shift {
            return None;
        }
        self.points.get(self.points.len() - 1 - shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(vals: &[f64]) -> PeriodSeries {
        PeriodSeries {
            metric: MetricId::Revenue,
            points: vals
                .iter()
                .enumerate()
                .map(|(i, v)| PeriodPoint { period: format!("p{i}"), value: *v })
                .collect(),
        }
    }

    #[test]
    fn baseline_respects_shift() {
        let s = series(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.latest().unwrap().value, 4.0);
        assert_eq!(s.baseline(1).unwrap().value, 3.0);
        assert_eq!(s.baseline(3).unwrap().value, 1.0);
        assert!(s.baseline(4).is_none());
    }

    #[test]
    fn single_period_has_no_baseline() {
        let s = series(&[42.0]);
        assert!(s.baseline(1).is_none());
    }
}
