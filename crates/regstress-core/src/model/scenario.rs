use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::RegStressError;
use crate::model::asset::AssetClass;
use crate::model::capital_base::CapitalBase;
use crate::model::funding::FundingType;
use crate::types::{check_magnitude, Rate, MAX_RATE};
use crate::RegStressResult;

/// A named set of proportional shocks. Negative asset shocks are losses;
/// positive funding shocks grow a bucket (and therefore its outflows).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressScenario {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub asset_shocks: BTreeMap<AssetClass, Rate>,
    #[serde(default)]
    pub funding_shocks: BTreeMap<FundingType, Rate>,
    /// Replaces the engine's base capital for this scenario
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capital_override: Option<CapitalBase>,
}

impl StressScenario {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            asset_shocks: BTreeMap::new(),
            funding_shocks: BTreeMap::new(),
            capital_override: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_asset_shock(mut self, asset_class: AssetClass, shock: Rate) -> Self {
        self.asset_shocks.insert(asset_class, shock);
        self
    }

    pub fn with_funding_shock(mut self, funding_type: FundingType, shock: Rate) -> Self {
        self.funding_shocks.insert(funding_type, shock);
        self
    }

    pub fn with_capital_override(mut self, capital: CapitalBase) -> Self {
        self.capital_override = Some(capital);
        self
    }

    /// Shock for an asset class; omitted classes are unshocked.
    pub fn asset_shock(&self, asset_class: AssetClass) -> Rate {
        self.asset_shocks
            .get(&asset_class)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn funding_shock(&self, funding_type: FundingType) -> Rate {
        self.funding_shocks
            .get(&funding_type)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Structural checks only. Shocks below -100% are accepted so that
    /// extreme scenarios can be modelled; they are reported as warnings.
    pub fn validate(&self, warnings: &mut Vec<String>) -> RegStressResult<()> {
        if self.id.trim().is_empty() {
            return Err(RegStressError::invalid(
                "scenario.id",
                "Scenario identifier must not be empty.",
            ));
        }
        if let Some(capital) = &self.capital_override {
            capital.validate()?;
        }
        for (asset_class, shock) in &self.asset_shocks {
            let field = format!("scenario.asset_shocks.{}", asset_class);
            check_magnitude(field, *shock, MAX_RATE)?;
            if *shock < -Decimal::ONE {
                warnings.push(format!(
                    "Scenario '{}': {} shock {} implies a loss above 100%; stressed values will be negative.",
                    self.id, asset_class, shock
                ));
            }
        }
        for (funding_type, shock) in &self.funding_shocks {
            let field = format!("scenario.funding_shocks.{}", funding_type);
            check_magnitude(field, *shock, MAX_RATE)?;
            if *shock < -Decimal::ONE {
                warnings.push(format!(
                    "Scenario '{}': {} shock {} is below -100%; bucket will be floored.",
                    self.id, funding_type, shock
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_omitted_shocks_are_zero() {
        let s = StressScenario::new("s", "S").with_asset_shock(AssetClass::Equity, dec!(-0.4));
        assert_eq!(s.asset_shock(AssetClass::Equity), dec!(-0.4));
        assert_eq!(s.asset_shock(AssetClass::Corporate), Decimal::ZERO);
        assert_eq!(s.funding_shock(FundingType::RetailDeposits), Decimal::ZERO);
    }

    #[test]
    fn test_unbounded_shock_rejected() {
        let s = StressScenario::new("boom", "Boom")
            .with_asset_shock(AssetClass::Equity, dec!(1000000000000000000000));
        let mut warnings = Vec::new();
        assert!(s.validate(&mut warnings).is_err());
    }

    #[test]
    fn test_extreme_shock_accepted_with_warning() {
        let s = StressScenario::new("wipeout", "Wipeout")
            .with_asset_shock(AssetClass::Equity, dec!(-1.5));
        let mut warnings = Vec::new();
        assert!(s.validate(&mut warnings).is_ok());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_deserialize_shock_maps() {
        let json = r#"{
            "id": "custom",
            "name": "Custom",
            "asset_shocks": {"CORPORATE": "-0.30", "EQUITY": "-0.45"},
            "funding_shocks": {"wholesale_funding": "0.20"}
        }"#;
        let s: StressScenario = serde_json::from_str(json).unwrap();
        assert_eq!(s.asset_shock(AssetClass::Corporate), dec!(-0.30));
        assert_eq!(s.funding_shock(FundingType::WholesaleFunding), dec!(0.20));
        assert!(s.capital_override.is_none());
    }
}
