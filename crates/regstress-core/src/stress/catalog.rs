use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RegStressError;
use crate::model::asset::AssetClass;
use crate::model::funding::FundingType;
use crate::model::scenario::StressScenario;
use crate::RegStressResult;

/// Named scenarios addressable by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioCatalog {
    scenarios: Vec<StressScenario>,
}

impl ScenarioCatalog {
    pub fn new(scenarios: Vec<StressScenario>) -> Self {
        let mut catalog = Self::default();
        for scenario in scenarios {
            catalog.insert(scenario);
        }
        catalog
    }

    /// Predefined supervisory scenarios.
    pub fn supervisory() -> Self {
        Self::new(vec![
            baseline(),
            fed_severely_adverse(),
            eba_adverse(),
            boe_acs(),
            idiosyncratic_liquidity_run(),
        ])
    }

    /// Add a scenario, replacing any existing one with the same id.
    pub fn insert(&mut self, scenario: StressScenario) {
        match self.scenarios.iter_mut().find(|s| s.id == scenario.id) {
            Some(existing) => *existing = scenario,
            None => self.scenarios.push(scenario),
        }
    }

    pub fn get(&self, id: &str) -> RegStressResult<&StressScenario> {
        self.scenarios
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| RegStressError::ScenarioNotFound(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.scenarios.iter().map(|s| s.id.as_str())
    }

    pub fn scenarios(&self) -> &[StressScenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

fn baseline() -> StressScenario {
    StressScenario::new("baseline", "Baseline")
        .with_description("No shocks; reproduces the unstressed position")
}

fn fed_severely_adverse() -> StressScenario {
    StressScenario::new("fed_severely_adverse", "Federal Reserve Severely Adverse")
        .with_description(
            "Severe global recession: equities -45%, commercial real estate -35%, \
             corporate credit spreads widen sharply, wholesale funding runs",
        )
        .with_asset_shock(AssetClass::Equity, dec!(-0.45))
        .with_asset_shock(AssetClass::Property, dec!(-0.35))
        .with_asset_shock(AssetClass::Corporate, dec!(-0.15))
        .with_asset_shock(AssetClass::Derivative, dec!(-0.10))
        .with_funding_shock(FundingType::RetailDeposits, dec!(0.05))
        .with_funding_shock(FundingType::CorporateDeposits, dec!(0.10))
        .with_funding_shock(FundingType::WholesaleFunding, dec!(0.20))
}

fn eba_adverse() -> StressScenario {
    StressScenario::new("eba_adverse", "EBA EU-wide Adverse")
        .with_description(
            "Prolonged stagflation: sovereign spreads widen, equities -38%, \
             residential and commercial property -30%",
        )
        .with_asset_shock(AssetClass::Sovereign, dec!(-0.05))
        .with_asset_shock(AssetClass::Equity, dec!(-0.38))
        .with_asset_shock(AssetClass::Property, dec!(-0.30))
        .with_asset_shock(AssetClass::Corporate, dec!(-0.12))
        .with_asset_shock(AssetClass::Derivative, dec!(-0.08))
        .with_funding_shock(FundingType::CorporateDeposits, dec!(0.10))
        .with_funding_shock(FundingType::WholesaleFunding, dec!(0.15))
}

fn boe_acs() -> StressScenario {
    StressScenario::new("boe_acs", "Bank of England Annual Cyclical Scenario")
        .with_description(
            "UK and global downturn: equities -35%, commercial property -33%, \
             corporate defaults rise",
        )
        .with_asset_shock(AssetClass::Sovereign, dec!(-0.03))
        .with_asset_shock(AssetClass::Equity, dec!(-0.35))
        .with_asset_shock(AssetClass::Property, dec!(-0.33))
        .with_asset_shock(AssetClass::Corporate, dec!(-0.10))
        .with_funding_shock(FundingType::WholesaleFunding, dec!(0.10))
}

fn idiosyncratic_liquidity_run() -> StressScenario {
    StressScenario::new("idiosyncratic_liquidity_run", "Idiosyncratic Liquidity Run")
        .with_description("Name-specific loss of confidence: deposit and wholesale run-off")
        .with_asset_shock(AssetClass::Equity, dec!(-0.10))
        .with_funding_shock(FundingType::RetailDeposits, dec!(0.20))
        .with_funding_shock(FundingType::CorporateDeposits, dec!(0.40))
        .with_funding_shock(FundingType::WholesaleFunding, dec!(0.50))
        .with_funding_shock(FundingType::SecuredFunding, dec!(0.25))
}
