//! Lens domains: the four independent output-condition axes
//! (cycle / terms / mode / hold).
//!
//! Parsing is strict: an unrecognized token on any axis is `InvalidLens` and
//! must be rejected before any computation begins — never defaulted.
//! Wire form is the uppercase token (`MONTHLY`, `NET_30`, `ROLLING_4`, …);
//! serde round-trips through the same strings so lens echoes stay canonical.

use crate::errors::CoreError;
use std::fmt;
use std::str::FromStr;

/// Comparison cycle selecting how far back the baseline period sits.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Cycle {
    Monthly,
    Quarterly,
    Yearly,
    /// Rolling window of N periods (N ≥ 1).
    Rolling(u8),
}

impl Cycle {
    /// How many periods back the baseline sits in an ordered series.
    pub fn shift(self) -> usize {
        match self {
            Cycle::Monthly => 1,
            Cycle::Quarterly => 3,
            Cycle::Yearly => 12,
            Cycle::Rolling(n) => n as usize,
        }
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cycle::Monthly => f.write_str("MONTHLY"),
            Cycle::Quarterly => f.write_str("QUARTERLY"),
            Cycle::Yearly => f.write_str("YEARLY"),
            Cycle::Rolling(n) => write!(f, "ROLLING_{n}"),
        }
    }
}

impl FromStr for Cycle {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MONTHLY" => Ok(Cycle::Monthly),
            "QUARTERLY" => Ok(Cycle::Quarterly),
            "YEARLY" => Ok(Cycle::Yearly),
            _ => {
                let n = s
                    .strip_prefix("ROLLING_")
                    .and_then(|rest| rest.parse::<u8>().ok())
                    .filter(|n| *n >= 1)
                    .ok_or(CoreError::InvalidLens("cycle"))?;
                Ok(Cycle::Rolling(n))
            }
        }
    }
}

/// Credit/overdue terms applied when classifying AR aging buckets.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Terms {
    Net30,
    Net70,
    /// Custom net-days threshold (1..=365).
    Custom(u16),
}

impl Terms {
    pub fn net_days(self) -> u16 {
        match self {
            Terms::Net30 => 30,
            Terms::Net70 => 70,
            Terms::Custom(d) => d,
        }
    }
}

impl fmt::Display for Terms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terms::Net30 => f.write_str("NET_30"),
            Terms::Net70 => f.write_str("NET_70"),
            Terms::Custom(d) => write!(f, "CUSTOM:{d}"),
        }
    }
}

impl FromStr for Terms {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NET_30" => Ok(Terms::Net30),
            "NET_70" => Ok(Terms::Net70),
            _ => {
                let d = s
                    .strip_prefix("CUSTOM:")
                    .and_then(|rest| rest.parse::<u16>().ok())
                    .filter(|d| (1..=365).contains(d))
                    .ok_or(CoreError::InvalidLens("terms"))?;
                Ok(Terms::Custom(d))
            }
        }
    }
}

/// Output emphasis requested by the caller. The core computes identically
/// under both; the mode is echoed for the presentation layer.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Mode {
    EvidenceFirst,
    ExecutiveFirst,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::EvidenceFirst => f.write_str("EVIDENCE_FIRST"),
            Mode::ExecutiveFirst => f.write_str("EXECUTIVE_FIRST"),
        }
    }
}

impl FromStr for Mode {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EVIDENCE_FIRST" => Ok(Mode::EvidenceFirst),
            "EXECUTIVE_FIRST" => Ok(Mode::ExecutiveFirst),
            _ => Err(CoreError::InvalidLens("mode")),
        }
    }
}

/// Hold flag (period under accounting hold). Tri-state on purpose: absence of
/// knowledge is `Unknown`, not a default `HoldNo`.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Hold {
    Unknown,
    HoldYes,
    HoldNo,
}

impl fmt::Display for Hold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hold::Unknown => f.write_str("UNKNOWN"),
            Hold::HoldYes => f.write_str("HOLD_YES"),
            Hold::HoldNo => f.write_str("HOLD_NO"),
        }
    }
}

impl FromStr for Hold {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNKNOWN" => Ok(Hold::Unknown),
            "HOLD_YES" => Ok(Hold::HoldYes),
            "HOLD_NO" => Ok(Hold::HoldNo),
            _ => Err(CoreError::InvalidLens("hold")),
        }
    }
}

/// The four-axis lens. One snapshot is computed per (file identity, lens);
/// a different lens is a different snapshot, never a mutation.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct Lens {
    pub cycle: Cycle,
    pub terms: Terms,
    pub mode: Mode,
    pub hold: Hold,
}

impl Lens {
    /// Parse the four raw axis tokens; any unrecognized token is fatal.
    pub fn parse(cycle: &str, terms: &str, mode: &str, hold: &str) -> Result<Self, CoreError> {
        Ok(Self {
            cycle: cycle.parse()?,
            terms: terms.parse()?,
            mode: mode.parse()?,
            hold: hold.parse()?,
        })
    }
}

impl fmt::Display for Lens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cycle:{} | terms:{} | mode:{} | hold:{}",
            self.cycle, self.terms, self.mode, self.hold
        )
    }
}

// String-form serde keeps lens echoes identical to the tokens callers sent.
#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    macro_rules! string_serde {
        ($ty:ty) => {
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                    s.collect_str(self)
                }
            }
            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                    let raw = String::deserialize(d)?;
                    raw.parse().map_err(D::Error::custom)
                }
            }
        };
    }

    string_serde!(Cycle);
    string_serde!(Terms);
    string_serde!(Mode);
    string_serde!(Hold);

    #[derive(Serialize, Deserialize)]
    struct LensWire {
        cycle: Cycle,
        terms: Terms,
        mode: Mode,
        hold: Hold,
    }

    impl Serialize for Lens {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            LensWire {
                cycle: self.cycle,
                terms: self.terms,
                mode: self.mode,
                hold: self.hold,
            }
            .serialize(s)
        }
    }

    impl<'de> Deserialize<'de> for Lens {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            let w = LensWire::deserialize(d)?;
            Ok(Lens { cycle: w.cycle, terms: w.terms, mode: w.mode, hold: w.hold })
        }
    }
}
