//! Canonical metric identifiers: the closed set of well-known financial
//! quantities this engine extracts, independent of source label language.

use crate::errors::CoreError;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Closed set of canonical metrics. String-keyed branching on raw labels is
/// confined to the term mapper; everything downstream speaks `MetricId`.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MetricId {
    Revenue,
    GrossProfit,
    Opex,
    NetIncome,
    GrossMargin,
    Dso,
    Dio,
    Dpo,
    Ccc,
    TopCustomerShare,
    ArOverdue,
    Inventory,
}

/// Measurement kind a metric's value is expressed in.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnitKind {
    Currency,
    Percent,
    Days,
    Ratio,
}

impl MetricId {
    pub const ALL: [MetricId; 12] = [
        MetricId::Revenue,
        MetricId::GrossProfit,
        MetricId::Opex,
        MetricId::NetIncome,
        MetricId::GrossMargin,
        MetricId::Dso,
        MetricId::Dio,
        MetricId::Dpo,
        MetricId::Ccc,
        MetricId::TopCustomerShare,
        MetricId::ArOverdue,
        MetricId::Inventory,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricId::Revenue => "revenue",
            MetricId::GrossProfit => "gross_profit",
            MetricId::Opex => "opex",
            MetricId::NetIncome => "net_income",
            MetricId::GrossMargin => "gross_margin",
            MetricId::Dso => "dso",
            MetricId::Dio => "dio",
            MetricId::Dpo => "dpo",
            MetricId::Ccc => "ccc",
            MetricId::TopCustomerShare => "top_customer_share",
            MetricId::ArOverdue => "ar_overdue",
            MetricId::Inventory => "inventory",
        }
    }

    /// Unit a resolved value is normalized to after scale/sign application.
    pub fn unit(self) -> UnitKind {
        match self {
            MetricId::Revenue
            | MetricId::GrossProfit
            | MetricId::Opex
            | MetricId::NetIncome
            | MetricId::ArOverdue
            | MetricId::Inventory => UnitKind::Currency,
            MetricId::GrossMargin | MetricId::TopCustomerShare => UnitKind::Percent,
            MetricId::Dso | MetricId::Dio | MetricId::Dpo | MetricId::Ccc => UnitKind::Days,
        }
    }

    /// English display label (raw sheet labels may be any language; output
    /// labels are canonical English).
    pub fn display(self) -> &'static str {
        match self {
            MetricId::Revenue => "Revenue",
            MetricId::GrossProfit => "Gross Profit",
            MetricId::Opex => "Operating Expense",
            MetricId::NetIncome => "Net Profit",
            MetricId::GrossMargin => "Gross Margin %",
            MetricId::Dso => "DSO",
            MetricId::Dio => "DIO",
            MetricId::Dpo => "DPO",
            MetricId::Ccc => "CCC",
            MetricId::TopCustomerShare => "Top Customer Share %",
            MetricId::ArOverdue => "AR Overdue",
            MetricId::Inventory => "Inventory",
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricId {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricId::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or(CoreError::UnknownMetric)
    }
}
