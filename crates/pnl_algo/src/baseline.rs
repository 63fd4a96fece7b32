//! Baseline & delta engine.
//!
//! Given an ordered `PeriodSeries` and the lens cycle, produce the baseline
//! and delta for the current period — or a single-period marker when the
//! series is too short for the requested comparison. A missing comparison is
//! never a delta of zero.
//!
//! Terms thresholds classify AR aging buckets as a pure lookup; nothing here
//! is learned or heuristic.

use pnl_core::entities::PeriodSeries;
use pnl_core::lens::{Cycle, Terms};
use pnl_core::numerics::pct_delta_tenths;

/// Direction of the period-over-period move.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeltaDirection {
    Up,
    Down,
    Flat,
}

/// Computed baseline/delta for one metric under one cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct BaselineDelta {
    pub baseline: f64,
    pub current: f64,
    pub delta_abs: f64,
    /// Percent delta in tenths; `None` when the baseline is zero (relative
    /// change undefined).
    pub delta_pct_tenths: Option<i64>,
    pub direction: DeltaDirection,
}

/// Outcome of a comparison request.
#[derive(Clone, Debug, PartialEq)]
pub enum PeriodComparison {
    Delta(BaselineDelta),
    /// Fewer periods than the cycle requires; delta is not disclosed.
    SinglePeriod,
}

impl PeriodComparison {
    pub fn delta(&self) -> Option<&BaselineDelta> {
        match self {
            PeriodComparison::Delta(d) => Some(d),
            PeriodComparison::SinglePeriod => None,
        }
    }

    pub fn is_single_period(&self) -> bool {
        matches!(self, PeriodComparison::SinglePeriod)
    }
}

/// Compare the latest observation against the cycle's baseline period.
pub fn compare_series(series: &PeriodSeries, cycle: Cycle) -> PeriodComparison {
    let shift = cycle.shift();
    let (Some(curr), Some(base)) = (series.latest(), series.baseline(shift)) else {
        return PeriodComparison::SinglePeriod;
    };

    let delta_abs = curr.value - base.value;
    let direction = if delta_abs > 0.0 {
        DeltaDirection::Up
    } else if delta_abs < 0.0 {
        DeltaDirection::Down
    } else {
        DeltaDirection::Flat
    };

    PeriodComparison::Delta(BaselineDelta {
        baseline: base.value,
        current: curr.value,
        delta_abs,
        delta_pct_tenths: pct_delta_tenths(curr.value, base.value),
        direction,
    })
}

/// AR aging bucket under the configured credit terms.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum AgingBucket {
    /// Within the net-days window.
    Current,
    /// Past terms but within the 30-day grace band.
    Watch,
    /// Beyond terms + 30 days.
    Overdue,
}

/// Pure threshold lookup; the boundary comes from the lens, never from data.
pub fn classify_aging(days_outstanding: f64, terms: Terms) -> AgingBucket {
    let net = f64::from(terms.net_days());
    if days_outstanding <= net {
        AgingBucket::Current
    } else if days_outstanding <= net + 30.0 {
        AgingBucket::Watch
    } else {
        AgingBucket::Overdue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnl_core::entities::PeriodPoint;
    use pnl_core::MetricId;

    fn series(vals: &[f64]) -> PeriodSeries {
        PeriodSeries {
            metric: MetricId::Revenue,
            points: vals
                .iter()
                .enumerate()
                .map(|(i, v)| PeriodPoint { period: format!("col{i:02}"), value: *v })
                .collect(),
        }
    }

    #[test]
    fn single_period_under_quarterly_is_not_a_zero_delta() {
        let s = series(&[1_000.0]);
        let c = compare_series(&s, Cycle::Quarterly);
        assert!(c.is_single_period());
        assert!(c.delta().is_none());
    }

    #[test]
    fn quarterly_shift_reaches_three_periods_back() {
        let s = series(&[100.0, 105.0, 95.0, 110.0]);
        let c = compare_series(&s, Cycle::Quarterly);
        let d = c.delta().expect("enough periods");
        assert_eq!(d.baseline, 100.0);
        assert_eq!(d.current, 110.0);
        assert_eq!(d.delta_pct_tenths, Some(100));
        assert_eq!(d.direction, DeltaDirection::Up);
    }

    #[test]
    fn monthly_on_two_periods_works() {
        let s = series(&[200.0, 190.0]);
        let d = compare_series(&s, Cycle::Monthly);
        let d = d.delta().unwrap();
        assert_eq!(d.delta_abs, -10.0);
        assert_eq!(d.direction, DeltaDirection::Down);
        assert_eq!(d.delta_pct_tenths, Some(-50));
    }

    #[test]
    fn zero_baseline_keeps_relative_delta_undisclosed() {
        let s = series(&[0.0, 50.0]);
        let d = compare_series(&s, Cycle::Monthly);
        let d = d.delta().unwrap();
        assert_eq!(d.delta_pct_tenths, None);
        assert_eq!(d.delta_abs, 50.0);
    }

    #[test]
    fn aging_buckets_follow_terms_thresholds() {
        assert_eq!(classify_aging(30.0, Terms::Net30), AgingBucket::Current);
        assert_eq!(classify_aging(31.0, Terms::Net30), AgingBucket::Watch);
        assert_eq!(classify_aging(60.0, Terms::Net30), AgingBucket::Watch);
        assert_eq!(classify_aging(61.0, Terms::Net30), AgingBucket::Overdue);
        assert_eq!(classify_aging(61.0, Terms::Net70), AgingBucket::Current);
        assert_eq!(classify_aging(100.0, Terms::Custom(90)), AgingBucket::Watch);
    }
}
