use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RegStressError;
use crate::model::funding::FundingType;
use crate::types::{Rate, MAX_RATE};
use crate::RegStressResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum LCR requirement: 100%
pub const DEFAULT_LCR_REQUIREMENT: Decimal = dec!(1.00);
/// Basel III minimum Tier 1 ratio
pub const DEFAULT_TIER1_MINIMUM: Decimal = dec!(0.06);
/// Basel III minimum total capital ratio
pub const DEFAULT_TOTAL_CAPITAL_MINIMUM: Decimal = dec!(0.08);
/// Basel III leverage ratio minimum
pub const DEFAULT_LEVERAGE_MINIMUM: Decimal = dec!(0.03);
/// Large exposure limit as a fraction of Tier 1
pub const DEFAULT_LARGE_EXPOSURE_LIMIT: Decimal = dec!(0.25);

pub const DEFAULT_CONSERVATION_BUFFER: Decimal = dec!(0.025);
pub const DEFAULT_COUNTERCYCLICAL_BUFFER: Decimal = dec!(0.010);
pub const DEFAULT_SYSTEMIC_BUFFER: Decimal = dec!(0.005);

pub const DEFAULT_HAIRCUT_L1: Decimal = dec!(0.00);
pub const DEFAULT_HAIRCUT_L2A: Decimal = dec!(0.15);
pub const DEFAULT_HAIRCUT_L2B: Decimal = dec!(0.25);
/// Level 2B cap: 40% of final HQLA
pub const DEFAULT_LEVEL2B_CAP: Decimal = dec!(0.40);

/// Stable retail run-off
pub const DEFAULT_RETAIL_OUTFLOW: Decimal = dec!(0.05);
/// Operational corporate run-off
pub const DEFAULT_CORPORATE_OUTFLOW: Decimal = dec!(0.25);
pub const DEFAULT_WHOLESALE_OUTFLOW: Decimal = dec!(1.00);
pub const DEFAULT_SECURED_OUTFLOW: Decimal = dec!(0.25);
/// Net outflows never fall below 25% of gross outflows
pub const DEFAULT_NET_OUTFLOW_FLOOR: Decimal = dec!(0.25);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Capital buffer rates, applied to RWA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferRates {
    pub conservation: Rate,
    pub countercyclical: Rate,
    pub systemic: Rate,
}

impl Default for BufferRates {
    fn default() -> Self {
        Self {
            conservation: DEFAULT_CONSERVATION_BUFFER,
            countercyclical: DEFAULT_COUNTERCYCLICAL_BUFFER,
            systemic: DEFAULT_SYSTEMIC_BUFFER,
        }
    }
}

impl BufferRates {
    pub fn total(&self) -> Rate {
        self.conservation + self.countercyclical + self.systemic
    }
}

/// LCR haircuts, caps and run-off rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LcrCalibration {
    pub haircut_l1: Rate,
    pub haircut_l2a: Rate,
    pub haircut_l2b: Rate,
    pub level2b_cap: Rate,
    pub retail_outflow_rate: Rate,
    pub corporate_outflow_rate: Rate,
    pub wholesale_outflow_rate: Rate,
    pub secured_outflow_rate: Rate,
    pub net_outflow_floor: Rate,
}

impl Default for LcrCalibration {
    fn default() -> Self {
        Self {
            haircut_l1: DEFAULT_HAIRCUT_L1,
            haircut_l2a: DEFAULT_HAIRCUT_L2A,
            haircut_l2b: DEFAULT_HAIRCUT_L2B,
            level2b_cap: DEFAULT_LEVEL2B_CAP,
            retail_outflow_rate: DEFAULT_RETAIL_OUTFLOW,
            corporate_outflow_rate: DEFAULT_CORPORATE_OUTFLOW,
            wholesale_outflow_rate: DEFAULT_WHOLESALE_OUTFLOW,
            secured_outflow_rate: DEFAULT_SECURED_OUTFLOW,
            net_outflow_floor: DEFAULT_NET_OUTFLOW_FLOOR,
        }
    }
}

impl LcrCalibration {
    pub fn outflow_rate(&self, funding_type: FundingType) -> Rate {
        match funding_type {
            FundingType::RetailDeposits => self.retail_outflow_rate,
            FundingType::CorporateDeposits => self.corporate_outflow_rate,
            FundingType::WholesaleFunding => self.wholesale_outflow_rate,
            FundingType::SecuredFunding => self.secured_outflow_rate,
        }
    }
}

/// A jurisdiction/date-scoped rule set. Immutable for the duration of a
/// calculation; compare regimes by constructing a second value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegulatoryParameters {
    pub jurisdiction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<NaiveDate>,
    pub lcr_requirement: Rate,
    pub tier1_minimum: Rate,
    pub total_capital_minimum: Rate,
    pub leverage_minimum: Rate,
    pub large_exposure_limit: Rate,
    pub buffers: BufferRates,
    pub calibration: LcrCalibration,
}

impl Default for RegulatoryParameters {
    fn default() -> Self {
        Self {
            jurisdiction: "BCBS".to_string(),
            effective_date: None,
            lcr_requirement: DEFAULT_LCR_REQUIREMENT,
            tier1_minimum: DEFAULT_TIER1_MINIMUM,
            total_capital_minimum: DEFAULT_TOTAL_CAPITAL_MINIMUM,
            leverage_minimum: DEFAULT_LEVERAGE_MINIMUM,
            large_exposure_limit: DEFAULT_LARGE_EXPOSURE_LIMIT,
            buffers: BufferRates::default(),
            calibration: LcrCalibration::default(),
        }
    }
}

impl RegulatoryParameters {
    pub fn with_lcr_requirement(mut self, requirement: Rate) -> Self {
        self.lcr_requirement = requirement;
        self
    }

    pub fn with_tier1_minimum(mut self, minimum: Rate) -> Self {
        self.tier1_minimum = minimum;
        self
    }

    pub fn with_total_capital_minimum(mut self, minimum: Rate) -> Self {
        self.total_capital_minimum = minimum;
        self
    }

    pub fn with_leverage_minimum(mut self, minimum: Rate) -> Self {
        self.leverage_minimum = minimum;
        self
    }

    pub fn with_buffers(mut self, buffers: BufferRates) -> Self {
        self.buffers = buffers;
        self
    }

    /// Tier 1 ratio below which the institution is eating into its buffers.
    pub fn tier1_with_buffers(&self) -> Rate {
        self.tier1_minimum + self.buffers.total()
    }

    /// Reject out-of-range parameter sets before any calculation runs.
    pub fn validate(&self) -> RegStressResult<()> {
        let minimums = [
            ("parameters.lcr_requirement", self.lcr_requirement),
            ("parameters.tier1_minimum", self.tier1_minimum),
            ("parameters.total_capital_minimum", self.total_capital_minimum),
            ("parameters.leverage_minimum", self.leverage_minimum),
            ("parameters.buffers.conservation", self.buffers.conservation),
            ("parameters.buffers.countercyclical", self.buffers.countercyclical),
            ("parameters.buffers.systemic", self.buffers.systemic),
        ];
        for (field, value) in minimums {
            if value < Decimal::ZERO {
                return Err(RegStressError::invalid(
                    field,
                    format!("Regulatory minimum cannot be negative (got {}).", value),
                ));
            }
            if value > MAX_RATE {
                return Err(RegStressError::invalid(
                    field,
                    format!("Regulatory minimum cannot exceed {} (got {}).", MAX_RATE, value),
                ));
            }
        }

        if self.tier1_minimum > self.total_capital_minimum {
            return Err(RegStressError::invalid(
                "parameters.tier1_minimum",
                "Tier 1 minimum cannot exceed the total capital minimum.",
            ));
        }

        if self.large_exposure_limit <= Decimal::ZERO || self.large_exposure_limit > Decimal::ONE
        {
            return Err(RegStressError::invalid(
                "parameters.large_exposure_limit",
                "Large exposure limit must be in (0, 1].",
            ));
        }

        let cal = &self.calibration;
        let unit_rates = [
            ("parameters.calibration.haircut_l1", cal.haircut_l1),
            ("parameters.calibration.haircut_l2a", cal.haircut_l2a),
            ("parameters.calibration.haircut_l2b", cal.haircut_l2b),
            ("parameters.calibration.retail_outflow_rate", cal.retail_outflow_rate),
            ("parameters.calibration.corporate_outflow_rate", cal.corporate_outflow_rate),
            ("parameters.calibration.wholesale_outflow_rate", cal.wholesale_outflow_rate),
            ("parameters.calibration.secured_outflow_rate", cal.secured_outflow_rate),
            ("parameters.calibration.net_outflow_floor", cal.net_outflow_floor),
        ];
        for (field, value) in unit_rates {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(RegStressError::invalid(
                    field,
                    format!("Rate must be between 0 and 1 (got {}).", value),
                ));
            }
        }

        if cal.level2b_cap < Decimal::ZERO || cal.level2b_cap >= Decimal::ONE {
            return Err(RegStressError::invalid(
                "parameters.calibration.level2b_cap",
                "Level 2B cap must be in [0, 1).",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = RegulatoryParameters::default();
        assert_eq!(p.lcr_requirement, dec!(1.00));
        assert_eq!(p.tier1_minimum, dec!(0.06));
        assert_eq!(p.total_capital_minimum, dec!(0.08));
        assert_eq!(p.leverage_minimum, dec!(0.03));
        assert_eq!(p.large_exposure_limit, dec!(0.25));
        assert_eq!(p.buffers.total(), dec!(0.040));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let p: RegulatoryParameters =
            serde_json::from_str(r#"{"jurisdiction": "EU", "lcr_requirement": "1.10"}"#).unwrap();
        assert_eq!(p.jurisdiction, "EU");
        assert_eq!(p.lcr_requirement, dec!(1.10));
        assert_eq!(p.tier1_minimum, dec!(0.06));
        assert_eq!(p.calibration.haircut_l2b, dec!(0.25));
    }

    #[test]
    fn test_negative_minimum_rejected() {
        let p = RegulatoryParameters::default().with_leverage_minimum(dec!(-0.01));
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("leverage_minimum"));
    }

    #[test]
    fn test_large_exposure_limit_range() {
        let mut p = RegulatoryParameters::default();
        p.large_exposure_limit = Decimal::ZERO;
        assert!(p.validate().is_err());
        p.large_exposure_limit = dec!(1.2);
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_level2b_cap_of_one_rejected() {
        let mut p = RegulatoryParameters::default();
        p.calibration.level2b_cap = Decimal::ONE;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_tier1_above_total_rejected() {
        let p = RegulatoryParameters::default().with_tier1_minimum(dec!(0.09));
        assert!(p.validate().is_err());
    }
}
