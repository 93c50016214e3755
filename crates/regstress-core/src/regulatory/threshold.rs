use serde::{Deserialize, Serialize};

use crate::regulatory::capital::CapitalAdequacyResult;
use crate::regulatory::liquidity::LcrResult;
use crate::types::{guarded_ratio, ComplianceStatus, Rate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    Lcr,
    Tier1Ratio,
    TotalCapitalRatio,
    LeverageRatio,
    LargeExposures,
}

impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lcr => write!(f, "LCR"),
            Self::Tier1Ratio => write!(f, "Tier 1 ratio"),
            Self::TotalCapitalRatio => write!(f, "Total capital ratio"),
            Self::LeverageRatio => write!(f, "Leverage ratio"),
            Self::LargeExposures => write!(f, "Large exposures"),
        }
    }
}

/// One threshold evaluated against a position.
///
/// For ratios the requirement is a minimum. For large exposures the value is
/// the largest reported counterparty exposure as a share of Tier 1 and the
/// requirement is the maximum permitted share.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdCheck {
    pub threshold: Threshold,
    pub value: Option<Rate>,
    pub requirement: Rate,
    pub status: ComplianceStatus,
}

/// Every threshold, in reporting order.
pub fn threshold_checks(lcr: &LcrResult, capital: &CapitalAdequacyResult) -> [ThresholdCheck; 5] {
    let check = |threshold, value, requirement, status| ThresholdCheck {
        threshold,
        value,
        requirement,
        status,
    };
    [
        check(Threshold::Lcr, lcr.lcr_ratio, lcr.requirement, lcr.status),
        check(
            Threshold::Tier1Ratio,
            capital.tier1_ratio,
            capital.tier1_minimum,
            capital.tier1_status,
        ),
        check(
            Threshold::TotalCapitalRatio,
            capital.total_capital_ratio,
            capital.total_capital_minimum,
            capital.total_capital_status,
        ),
        check(
            Threshold::LeverageRatio,
            capital.leverage_ratio,
            capital.leverage_minimum,
            capital.leverage_status,
        ),
        check(
            Threshold::LargeExposures,
            largest_exposure_share(capital),
            capital.large_exposure_limit_rate,
            capital.large_exposure_status,
        ),
    ]
}

/// Names of the thresholds the position fails.
pub fn breached_thresholds(lcr: &LcrResult, capital: &CapitalAdequacyResult) -> Vec<String> {
    threshold_checks(lcr, capital)
        .iter()
        .filter(|c| !c.status.is_compliant())
        .map(|c| c.threshold.to_string())
        .collect()
}

fn largest_exposure_share(result: &CapitalAdequacyResult) -> Option<Rate> {
    let largest = result.large_exposures.iter().map(|e| e.exposure).max()?;
    guarded_ratio(largest, result.tier1_capital)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::asset::{AssetClass, PortfolioAsset};
    use crate::model::capital_base::CapitalBase;
    use crate::model::funding::FundingProfile;
    use crate::model::parameters::RegulatoryParameters;
    use crate::regulatory::capital::CapitalAdequacyCalculator;
    use crate::regulatory::liquidity::LiquidityCoverageRatioCalculator;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn evaluate(
        assets: &[PortfolioAsset],
        capital: &CapitalBase,
    ) -> (LcrResult, CapitalAdequacyResult) {
        let params = RegulatoryParameters::default();
        let funding = FundingProfile::default();
        (
            LiquidityCoverageRatioCalculator::new(&params).calculate(assets, &funding),
            CapitalAdequacyCalculator::new(&params).calculate(assets, capital),
        )
    }

    #[test]
    fn test_large_exposure_requirement_is_regime_rate_without_tier1() {
        let assets = vec![PortfolioAsset::new("loan", AssetClass::Corporate, dec!(100))
            .with_counterparty("Acme")];
        let (lcr, capital) = evaluate(&assets, &CapitalBase::new(Decimal::ZERO, dec!(10)));

        let checks = threshold_checks(&lcr, &capital);
        let large = checks[4];
        assert_eq!(large.threshold, Threshold::LargeExposures);
        assert_eq!(large.requirement, dec!(0.25));
        assert_eq!(large.value, None);
    }

    #[test]
    fn test_breaches_named_in_order() {
        // Tier 1 of 10 against 1000 of corporate RWA fails every capital test
        let assets = vec![PortfolioAsset::new("loan", AssetClass::Corporate, dec!(1000))
            .with_counterparty("Acme")];
        let (lcr, capital) = evaluate(&assets, &CapitalBase::new(dec!(10), Decimal::ZERO));

        assert_eq!(
            breached_thresholds(&lcr, &capital),
            vec![
                "Tier 1 ratio".to_string(),
                "Total capital ratio".to_string(),
                "Leverage ratio".to_string(),
                "Large exposures".to_string(),
            ]
        );
    }
}
