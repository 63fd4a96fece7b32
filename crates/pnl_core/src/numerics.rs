//! Integer-first score and confidence numerics.
//!
//! Scores and confidences are stored as scaled integers so the bounds
//! invariants hold by construction and snapshot bytes compare exactly across
//! runs. Raw cell values stay `f64` (they come from spreadsheets); only the
//! derived, displayed quantities are integer-backed.

use crate::errors::CoreError;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Drift score in tenths: 0..=100 ⇒ 0.0..=10.0.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ScoreTenths(u8);

impl ScoreTenths {
    pub const MIN: ScoreTenths = ScoreTenths(0);
    pub const MAX: ScoreTenths = ScoreTenths(100);

    pub fn new_checked(tenths: u8) -> Result<Self, CoreError> {
        if tenths <= 100 {
            Ok(Self(tenths))
        } else {
            Err(CoreError::DomainOutOfRange("score_tenths"))
        }
    }

    /// Construct clamped to the valid range (curve outputs are already in
    /// range; clamping guards arithmetic on caller side).
    pub fn saturating(tenths: u16) -> Self {
        Self(tenths.min(100) as u8)
    }

    pub fn tenths(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl fmt::Display for ScoreTenths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// Confidence in integer percent: 0..=100 ⇒ 0.00..=1.00.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ConfidencePct(u8);

impl ConfidencePct {
    pub const ZERO: ConfidencePct = ConfidencePct(0);
    pub const FULL: ConfidencePct = ConfidencePct(100);

    pub fn new_checked(pct: u8) -> Result<Self, CoreError> {
        if pct <= 100 {
            Ok(Self(pct))
        } else {
            Err(CoreError::DomainOutOfRange("confidence_pct"))
        }
    }

    /// `resolved / required` as floor percent. `required == 0` is a caller
    /// bug for axes (every axis requires ≥1 metric) and maps to zero.
    pub fn fraction(resolved: usize, required: usize) -> Self {
        if required == 0 {
            return Self(0);
        }
        Self(((resolved.min(required) * 100) / required) as u8)
    }

    pub fn pct(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl fmt::Display for ConfidencePct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Period-over-period delta in tenths of a percent, rounded half-away-from-
/// zero. `None` when the baseline is zero or either side is non-finite —
/// a delta is then undefined, not zero.
pub fn pct_delta_tenths(current: f64, baseline: f64) -> Option<i64> {
    if !current.is_finite() || !baseline.is_finite() || baseline == 0.0 {
        return None;
    }
    let raw = (current - baseline) / baseline.abs() * 1000.0;
    if !raw.is_finite() {
        return None;
    }
    Some(raw.round() as i64)
}

/// Render delta tenths as a signed one-decimal percent string ("-12.5").
pub fn delta_tenths_string(tenths: i64) -> String {
    let sign = if tenths < 0 { "-" } else { "" };
    format!("{}{}.{}", sign, (tenths / 10).abs(), (tenths % 10).abs())
}
