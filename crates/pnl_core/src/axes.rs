//! The fixed 8-axis drift library and the organizational owner set.
//!
//! Axis count is a structural constant: snapshots carry exactly one slot per
//! `AxisId::ALL` entry, and the causality graph may only reference these
//! axes and these organizational units.

use crate::errors::CoreError;
use crate::metrics::MetricId;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The eight drift/risk axes, scored 0..=10.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AxisId {
    RevenueDrift,
    ConcentrationDrift,
    MarginDrift,
    CostStructureDrift,
    InventoryDrift,
    ArQualityDrift,
    CashCycleDrift,
    ExecutionDrift,
}

/// Organizational units a drift symptom can be owned by.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OrgUnit {
    Sales,
    Finance,
    Operations,
    Procurement,
    Pmo,
    CustomerSuccess,
}

impl AxisId {
    pub const ALL: [AxisId; 8] = [
        AxisId::RevenueDrift,
        AxisId::ConcentrationDrift,
        AxisId::MarginDrift,
        AxisId::CostStructureDrift,
        AxisId::InventoryDrift,
        AxisId::ArQualityDrift,
        AxisId::CashCycleDrift,
        AxisId::ExecutionDrift,
    ];

    /// Stable wire code ("D01".."D08"), in `ALL` order.
    pub fn code(self) -> &'static str {
        match self {
            AxisId::RevenueDrift => "D01",
            AxisId::ConcentrationDrift => "D02",
            AxisId::MarginDrift => "D03",
            AxisId::CostStructureDrift => "D04",
            AxisId::InventoryDrift => "D05",
            AxisId::ArQualityDrift => "D06",
            AxisId::CashCycleDrift => "D07",
            AxisId::ExecutionDrift => "D08",
        }
    }

    pub fn display(self) -> &'static str {
        match self {
            AxisId::RevenueDrift => "Revenue Drift",
            AxisId::ConcentrationDrift => "Customer Concentration Drift",
            AxisId::MarginDrift => "Margin Drift",
            AxisId::CostStructureDrift => "Cost Structure Drift",
            AxisId::InventoryDrift => "Inventory Health Drift",
            AxisId::ArQualityDrift => "AR Quality / Credit Drift",
            AxisId::CashCycleDrift => "Cash Cycle / Liquidity Drift",
            AxisId::ExecutionDrift => "Execution Volatility",
        }
    }

    /// Metrics an axis needs to be fully confident. Confidence is the
    /// resolved fraction of this set; zero resolved ⇒ the axis itself is
    /// not disclosed.
    pub fn required_metrics(self) -> &'static [MetricId] {
        match self {
            AxisId::RevenueDrift => &[MetricId::Revenue],
            AxisId::ConcentrationDrift => &[MetricId::TopCustomerShare],
            AxisId::MarginDrift => &[MetricId::GrossMargin, MetricId::GrossProfit],
            AxisId::CostStructureDrift => &[MetricId::Opex, MetricId::Revenue],
            AxisId::InventoryDrift => &[MetricId::Inventory, MetricId::Dio],
            AxisId::ArQualityDrift => &[MetricId::ArOverdue, MetricId::Dso],
            AxisId::CashCycleDrift => {
                &[MetricId::Ccc, MetricId::Dso, MetricId::Dio, MetricId::Dpo]
            }
            AxisId::ExecutionDrift => &[MetricId::NetIncome, MetricId::Opex],
        }
    }

    /// Static ownership table for the causality graph. An axis with no owner
    /// here would simply produce no edges; every current axis has owners.
    pub fn owners(self) -> &'static [OrgUnit] {
        match self {
            AxisId::RevenueDrift => &[OrgUnit::Sales, OrgUnit::Finance],
            AxisId::ConcentrationDrift => &[OrgUnit::Sales, OrgUnit::CustomerSuccess],
            AxisId::MarginDrift => &[OrgUnit::Sales, OrgUnit::Finance, OrgUnit::Pmo],
            AxisId::CostStructureDrift => {
                &[OrgUnit::Finance, OrgUnit::Operations, OrgUnit::Pmo]
            }
            AxisId::InventoryDrift => &[OrgUnit::Operations, OrgUnit::Procurement],
            AxisId::ArQualityDrift => &[OrgUnit::Sales, OrgUnit::Finance],
            AxisId::CashCycleDrift => {
                &[OrgUnit::Finance, OrgUnit::Operations, OrgUnit::Procurement]
            }
            AxisId::ExecutionDrift => &[OrgUnit::Operations, OrgUnit::Pmo],
        }
    }
}

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AxisId {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AxisId::ALL
            .iter()
            .copied()
            .find(|a| a.code() == s)
            .ok_or(CoreError::UnknownAxis)
    }
}

impl OrgUnit {
    pub const ALL: [OrgUnit; 6] = [
        OrgUnit::Sales,
        OrgUnit::Finance,
        OrgUnit::Operations,
        OrgUnit::Procurement,
        OrgUnit::Pmo,
        OrgUnit::CustomerSuccess,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrgUnit::Sales => "sales",
            OrgUnit::Finance => "finance",
            OrgUnit::Operations => "operations",
            OrgUnit::Procurement => "procurement",
            OrgUnit::Pmo => "pmo",
            OrgUnit::CustomerSuccess => "customer_success",
        }
    }

    pub fn display(self) -> &'static str {
        match self {
            OrgUnit::Sales => "Sales",
            OrgUnit::Finance => "Finance",
            OrgUnit::Operations => "Operations",
            OrgUnit::Procurement => "Procurement",
            OrgUnit::Pmo => "PMO",
            OrgUnit::CustomerSuccess => "Customer Success",
        }
    }
}

impl fmt::Display for OrgUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrgUnit {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrgUnit::ALL
            .iter()
            .copied()
            .find(|o| o.as_str() == s)
            .ok_or(CoreError::UnknownOrg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_eight_axes_with_unique_codes() {
        assert_eq!(AxisId::ALL.len(), 8);
        let mut codes: Vec<&str> = AxisId::ALL.iter().map(|a| a.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 8);
    }

    #[test]
    fn every_axis_has_required_metrics_and_owners() {
        for a in AxisId::ALL {
            assert!(!a.required_metrics().is_empty(), "{a:?}");
            assert!(!a.owners().is_empty(), "{a:?}");
        }
    }

    #[test]
    fn codes_parse_back() {
        for a in AxisId::ALL {
            assert_eq!(a.code().parse::<AxisId>().unwrap(), a);
        }
        assert!("D09".parse::<AxisId>().is_err());
    }
}
