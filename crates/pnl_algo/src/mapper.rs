//! Term mapper: raw row labels → canonical metrics.
//!
//! Matching runs most-specific-first through four ordered stages; a later
//! stage never outranks an earlier one. At every stage a label containing a
//! forbidden token for the metric is excluded outright — this is what keeps
//! a "Gross Profit Margin" row from resolving the absolute Gross Profit
//! figure. No match at any stage means the metric is not disclosed by that
//! row; nothing is ever substituted.

use pnl_core::mapping::MetricMapping;
use pnl_core::variables::MatcherConfig;

/// Match stages, strongest first. `rank()` is the primary sort key when the
/// extractor picks between candidate rows.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum MatchStage {
    /// Trimmed label equals a synonym byte-for-byte.
    Exact,
    /// Case/whitespace-normalized label equals a normalized synonym.
    NormalizedExact,
    /// Normalized label starts with a normalized synonym.
    StartsWith,
    /// Enough of a synonym's tokens appear in the label (threshold from
    /// `MatcherConfig`).
    TokenOverlap,
}

impl MatchStage {
    pub fn rank(self) -> u8 {
        match self {
            MatchStage::Exact => 0,
            MatchStage::NormalizedExact => 1,
            MatchStage::StartsWith => 2,
            MatchStage::TokenOverlap => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchStage::Exact => "exact",
            MatchStage::NormalizedExact => "normalized_exact",
            MatchStage::StartsWith => "starts_with",
            MatchStage::TokenOverlap => "token_overlap",
        }
    }
}

/// Lowercase and strip all whitespace (incl. full-width spaces common in
/// CJK exports).
pub fn normalize(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Split a synonym into overlap tokens: maximal alphanumeric runs, normalized.
/// CJK synonyms usually carry no separators and yield a single token, which
/// degrades token-overlap to containment — the intended behavior.
fn tokens(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(normalize)
        .collect()
}

fn contains_forbidden(norm_label: &str, mapping: &MetricMapping) -> bool {
    mapping.forbidden_tokens.iter().any(|t| {
        let t = normalize(t);
        !t.is_empty() && norm_label.contains(&t)
    })
}

/// Match one raw label against one metric's mapping. Returns the strongest
/// stage any synonym reaches, or `None` (not disclosed by this label).
pub fn match_label(
    mapping: &MetricMapping,
    cfg: &MatcherConfig,
    raw_label: &str,
) -> Option<MatchStage> {
    let trimmed = raw_label.trim();
    if trimmed.is_empty() {
        return None;
    }
    let norm_label = normalize(trimmed);
    if contains_forbidden(&norm_label, mapping) {
        return None;
    }

    // Stage by stage across all synonyms; first stage with any hit wins.
    if mapping.synonyms.iter().any(|s| s.trim() == trimmed) {
        return Some(MatchStage::Exact);
    }
    if mapping.synonyms.iter().any(|s| normalize(s) == norm_label) {
        return Some(MatchStage::NormalizedExact);
    }
    if mapping
        .synonyms
        .iter()
        .map(|s| normalize(s))
        .any(|s| !s.is_empty() && norm_label.starts_with(&s))
    {
        return Some(MatchStage::StartsWith);
    }
    for syn in &mapping.synonyms {
        let toks = tokens(syn);
        if toks.is_empty() {
            continue;
        }
        let hit = toks.iter().filter(|t| norm_label.contains(t.as_str())).count();
        if hit * 100 >= toks.len() * usize::from(cfg.min_token_overlap_pct) && hit > 0 {
            return Some(MatchStage::TokenOverlap);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnl_core::mapping::{SignConvention, UnitScale};
    use pnl_core::MetricId;

    fn gross_profit_mapping() -> MetricMapping {
        MetricMapping {
            metric: MetricId::GrossProfit,
            synonyms: vec!["Gross Profit".into(), "營業毛利".into()],
            unit_scale: UnitScale::Ones,
            sign: SignConvention::AsReported,
            forbidden_tokens: vec!["margin".into(), "%".into(), "率".into()],
        }
    }

    #[test]
    fn stages_rank_most_specific_first() {
        let m = gross_profit_mapping();
        let cfg = MatcherConfig::default();
        assert_eq!(match_label(&m, &cfg, "Gross Profit"), Some(MatchStage::Exact));
        assert_eq!(
            match_label(&m, &cfg, "  gross  PROFIT "),
            Some(MatchStage::NormalizedExact)
        );
        assert_eq!(
            match_label(&m, &cfg, "Gross Profit (consolidated)"),
            Some(MatchStage::StartsWith)
        );
        assert_eq!(
            match_label(&m, &cfg, "Consolidated gross profit"),
            Some(MatchStage::TokenOverlap)
        );
        assert_eq!(match_label(&m, &cfg, "Operating Expense"), None);
    }

    #[test]
    fn forbidden_token_excludes_at_every_stage() {
        let m = gross_profit_mapping();
        let cfg = MatcherConfig::default();
        assert_eq!(match_label(&m, &cfg, "Gross Profit Margin"), None);
        assert_eq!(match_label(&m, &cfg, "毛利率"), None);
        assert_eq!(match_label(&m, &cfg, "Gross Profit %"), None);
    }

    #[test]
    fn cjk_synonym_matches_by_containment() {
        let m = gross_profit_mapping();
        let cfg = MatcherConfig::default();
        assert_eq!(match_label(&m, &cfg, "營業毛利"), Some(MatchStage::Exact));
        assert_eq!(
            match_label(&m, &cfg, "營業毛利（合併）"),
            Some(MatchStage::StartsWith)
        );
    }

    #[test]
    fn token_overlap_respects_threshold() {
        let m = MetricMapping {
            metric: MetricId::Revenue,
            synonyms: vec!["total operating revenue".into()],
            unit_scale: UnitScale::Ones,
            sign: SignConvention::AsReported,
            forbidden_tokens: vec![],
        };
        // 1 of 3 tokens (33%) misses the default 60% bar; 2 of 3 clears it.
        let cfg = MatcherConfig::default();
        assert_eq!(match_label(&m, &cfg, "misc revenue adjustments"), None);
        assert_eq!(
            match_label(&m, &cfg, "revenue, operating segment"),
            Some(MatchStage::TokenOverlap)
        );
    }
}
