//! Engine tunables: matcher ranking threshold, score curves, aging levels.
//!
//! Explicit, immutable config passed into computations — never global
//! state. The score/confidence bounds hold under any values here; the
//! defaults are the curves the engine ships with.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::numerics::ScoreTenths;

/// Term-mapper knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MatcherConfig {
    /// Minimum percentage of a synonym's tokens that must appear in the label
    /// for a token-overlap match (the weakest stage) to be accepted.
    pub min_token_overlap_pct: u8,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        // 60 keeps a single generic token ("gross", 1 of 2) from carrying a
        // two-token synonym, while 2-of-3 overlaps still pass.
        Self { min_token_overlap_pct: 60 }
    }
}

/// Piecewise-constant curve mapping |delta%| (in tenths) to a drift score.
/// Breakpoints ascend; the score for a magnitude is the band it falls in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScoreCurve {
    /// |Δ| below this (tenths of a percent) scores `calm`.
    pub minor_tenths: u16,
    /// |Δ| at/above `minor` but below this scores `elevated`.
    pub major_tenths: u16,
    /// |Δ| at/above `major` but below this scores `high`; at/above: `severe`.
    pub severe_tenths: u16,
    pub calm: ScoreTenths,
    pub elevated: ScoreTenths,
    pub high: ScoreTenths,
    pub severe: ScoreTenths,
}

impl ScoreCurve {
    pub fn score(&self, delta_abs_tenths: u16) -> ScoreTenths {
        if delta_abs_tenths >= self.severe_tenths {
            self.severe
        } else if delta_abs_tenths >= self.major_tenths {
            self.high
        } else if delta_abs_tenths >= self.minor_tenths {
            self.elevated
        } else {
            self.calm
        }
    }
}

impl Default for ScoreCurve {
    fn default() -> Self {
        // 5% / 10% / 30% bands → 4.0 / 6.0 / 7.5 / 9.0
        Self {
            minor_tenths: 50,
            major_tenths: 100,
            severe_tenths: 300,
            calm: ScoreTenths::saturating(40),
            elevated: ScoreTenths::saturating(60),
            high: ScoreTenths::saturating(75),
            severe: ScoreTenths::saturating(90),
        }
    }
}

/// Level curve for day-count metrics (CCC, DSO): the absolute level, not the
/// delta, carries the risk signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelCurve {
    /// Levels at/below this are healthy.
    pub low_days: u16,
    /// Levels at/below this are watch; above: stressed.
    pub high_days: u16,
    pub healthy: ScoreTenths,
    pub watch: ScoreTenths,
    pub stressed: ScoreTenths,
}

impl LevelCurve {
    pub fn score(&self, days: f64) -> ScoreTenths {
        if days <= f64::from(self.low_days) {
            self.healthy
        } else if days <= f64::from(self.high_days) {
            self.watch
        } else {
            self.stressed
        }
    }

    /// Reference curve for cash-conversion-cycle levels.
    pub fn ccc() -> Self {
        Self {
            low_days: 60,
            high_days: 120,
            healthy: ScoreTenths::saturating(40),
            watch: ScoreTenths::saturating(65),
            stressed: ScoreTenths::saturating(85),
        }
    }

    /// Reference curve for days-sales-outstanding levels.
    pub fn dso() -> Self {
        Self {
            low_days: 45,
            high_days: 75,
            healthy: ScoreTenths::saturating(40),
            watch: ScoreTenths::saturating(65),
            stressed: ScoreTenths::saturating(85),
        }
    }
}

/// Bundled engine configuration with reference defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub matcher: MatcherConfig,
    pub drift_curve: ScoreCurve,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_bands_are_inclusive_at_breakpoints() {
        let c = ScoreCurve::default();
        assert_eq!(c.score(49).tenths(), 40);
        assert_eq!(c.score(50).tenths(), 60);
        assert_eq!(c.score(100).tenths(), 75);
        assert_eq!(c.score(300).tenths(), 90);
        assert_eq!(c.score(u16::MAX).tenths(), 90);
    }

    #[test]
    fn level_curves_step_at_thresholds() {
        let c = LevelCurve::ccc();
        assert_eq!(c.score(60.0).tenths(), 40);
        assert_eq!(c.score(60.5).tenths(), 65);
        assert_eq!(c.score(121.0).tenths(), 85);
    }
}
