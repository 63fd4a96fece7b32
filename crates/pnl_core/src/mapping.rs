//! Term-mapping configuration: label synonyms (multi-language), unit scale,
//! sign convention, and forbidden tokens per canonical metric.
//!
//! Loaded once, immutable for the lifetime of a snapshot computation, and
//! passed explicitly into the mapper/extractor — never global state.

use crate::errors::CoreError;
use crate::metrics::MetricId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Magnitude scale raw values are recorded in on the sheet.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnitScale {
    #[default]
    Ones,
    Thousands,
    Millions,
}

impl UnitScale {
    pub fn multiplier(self) -> f64 {
        match self {
            UnitScale::Ones => 1.0,
            UnitScale::Thousands => 1_000.0,
            UnitScale::Millions => 1_000_000.0,
        }
    }

    /// Parse a cell-level unit hint ("thousands", "千", "NT$ millions", "百萬").
    /// Unrecognized hints resolve to `None` and the mapping's scale applies.
    pub fn from_hint(hint: &str) -> Option<Self> {
        let h = hint.trim().to_lowercase();
        if h.is_empty() {
            return None;
        }
        if h.contains("million") || h.contains("百萬") || h == "m" {
            Some(UnitScale::Millions)
        } else if h.contains("thousand") || h.contains("千") || h == "k" {
            Some(UnitScale::Thousands)
        } else {
            None
        }
    }
}

/// Sign convention of the source rows for a metric (some exports record
/// expenses as negatives).
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SignConvention {
    #[default]
    AsReported,
    Negated,
}

impl SignConvention {
    pub fn apply(self, v: f64) -> f64 {
        match self {
            SignConvention::AsReported => v,
            SignConvention::Negated => -v,
        }
    }
}

/// Mapping entry for one canonical metric.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetricMapping {
    pub metric: MetricId,
    /// Label synonyms in any language, most canonical first.
    pub synonyms: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unit_scale: UnitScale,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sign: SignConvention,
    /// Tokens whose presence disqualifies a label for this metric
    /// (e.g. "margin" / "%" / "率" when extracting the absolute figure).
    #[cfg_attr(feature = "serde", serde(default))]
    pub forbidden_tokens: Vec<String>,
}

impl MetricMapping {
    /// Normalized value: scale multiplier then sign convention. A cell-level
    /// hint overrides the mapping's configured scale.
    pub fn normalize_hinted(&self, raw: f64, hint: Option<UnitScale>) -> f64 {
        let scale = hint.unwrap_or(self.unit_scale);
        self.sign.apply(raw * scale.multiplier())
    }

    pub fn normalize(&self, raw: f64) -> f64 {
        self.normalize_hinted(raw, None)
    }
}

/// The immutable mapping table. Metric ids are unique by construction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<MetricMapping>", into = "Vec<MetricMapping>"))]
pub struct MappingTable {
    entries: Vec<MetricMapping>,
}

impl MappingTable {
    pub fn new(entries: Vec<MetricMapping>) -> Result<Self, CoreError> {
        let mut seen = std::collections::BTreeSet::new();
        for e in &entries {
            if !seen.insert(e.metric) {
                return Err(CoreError::DuplicateMapping(e.metric.as_str()));
            }
        }
        Ok(Self { entries })
    }

    pub fn get(&self, metric: MetricId) -> Option<&MetricMapping> {
        self.entries.iter().find(|e| e.metric == metric)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricMapping> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Vec<MetricMapping>> for MappingTable {
    type Error = CoreError;
    fn try_from(entries: Vec<MetricMapping>) -> Result<Self, Self::Error> {
        MappingTable::new(entries)
    }
}

impl From<MappingTable> for Vec<MetricMapping> {
    fn from(t: MappingTable) -> Self {
        t.entries
    }
}
