//! Modeled credit losses deducted from Tier 1 capital under stress.
//!
//! Losses are charged only on Corporate and Property exposures, and only in
//! proportion to the negative shock the scenario applies to that class:
//!
//! `loss = max(value, 0) * min(|min(shock, 0)|, 1) * loss_rate(class, band) * sector_factor`
//!
//! A scenario with no negative shock on these classes produces no loss.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::model::asset::{AssetClass, PortfolioAsset, RatingBand};
use crate::model::scenario::StressScenario;
use crate::types::{Money, Rate};

/// Surcharge for sectors with cyclical collateral values
const CYCLICAL_SECTOR_FACTOR: Decimal = dec!(1.25);
const CYCLICAL_SECTORS: [&str; 4] = ["real_estate", "construction", "energy", "hospitality"];

/// Flat property loss rate, independent of rating
const PROPERTY_LOSS_RATE: Decimal = dec!(0.40);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetCreditLoss {
    pub id: String,
    pub asset_class: AssetClass,
    pub exposure: Money,
    pub shock: Rate,
    pub loss_rate: Rate,
    pub sector_factor: Rate,
    pub loss: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditLossBreakdown {
    pub total: Money,
    pub by_asset: Vec<AssetCreditLoss>,
}

/// Loss rate per unit of shock severity, or `None` when the class carries
/// no modeled credit loss.
pub fn loss_rate(asset_class: AssetClass, band: RatingBand) -> Option<Rate> {
    match asset_class {
        AssetClass::Corporate => Some(match band {
            RatingBand::Aaa => dec!(0.05),
            RatingBand::Aa => dec!(0.10),
            RatingBand::A => dec!(0.20),
            RatingBand::Bbb => dec!(0.35),
            RatingBand::Bb => dec!(0.50),
            RatingBand::B => dec!(0.60),
            RatingBand::CccOrBelow => dec!(0.75),
            RatingBand::Unrated => dec!(0.60),
        }),
        AssetClass::Property => Some(PROPERTY_LOSS_RATE),
        _ => None,
    }
}

pub fn sector_factor(sector: Option<&str>) -> Rate {
    let Some(sector) = sector else {
        return Decimal::ONE;
    };
    let normalised = sector.trim().to_lowercase().replace([' ', '-'], "_");
    if CYCLICAL_SECTORS.contains(&normalised.as_str()) {
        CYCLICAL_SECTOR_FACTOR
    } else {
        Decimal::ONE
    }
}

/// Credit loss on the unstressed portfolio implied by `scenario`.
pub fn modeled_credit_loss(
    assets: &[PortfolioAsset],
    scenario: &StressScenario,
) -> CreditLossBreakdown {
    let mut breakdown = CreditLossBreakdown::default();

    for asset in assets {
        let Some(rate) = loss_rate(asset.asset_class, asset.rating_band()) else {
            continue;
        };
        let shock = scenario.asset_shock(asset.asset_class);
        let severity = (-shock.min(Decimal::ZERO)).min(Decimal::ONE);
        let exposure = asset.market_value.max(Decimal::ZERO);
        if severity.is_zero() || exposure.is_zero() {
            continue;
        }

        let factor = sector_factor(asset.sector.as_deref());
        let loss = exposure * severity * rate * factor;
        breakdown.total += loss;
        breakdown.by_asset.push(AssetCreditLoss {
            id: asset.id.clone(),
            asset_class: asset.asset_class,
            exposure,
            shock,
            loss_rate: rate,
            sector_factor: factor,
            loss,
        });
    }

    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_shock_no_loss() {
        let assets = vec![PortfolioAsset::new("loan", AssetClass::Corporate, dec!(100))];
        let scenario = StressScenario::new("flat", "Flat");
        let loss = modeled_credit_loss(&assets, &scenario);
        assert_eq!(loss.total, Decimal::ZERO);
        assert!(loss.by_asset.is_empty());
    }

    #[test]
    fn test_corporate_loss_by_rating() {
        let assets = vec![
            PortfolioAsset::new("a", AssetClass::Corporate, dec!(100)).with_rating("A+"),
            PortfolioAsset::new("bb", AssetClass::Corporate, dec!(100)).with_rating("BB"),
        ];
        let scenario =
            StressScenario::new("s", "S").with_asset_shock(AssetClass::Corporate, dec!(-0.20));
        let loss = modeled_credit_loss(&assets, &scenario);
        // 100 * 0.2 * 0.2 + 100 * 0.2 * 0.5
        assert_eq!(loss.total, dec!(14));
    }

    #[test]
    fn test_property_with_cyclical_sector() {
        let assets = vec![
            PortfolioAsset::new("tower", AssetClass::Property, dec!(200)).with_sector("Real Estate"),
        ];
        let scenario =
            StressScenario::new("s", "S").with_asset_shock(AssetClass::Property, dec!(-0.10));
        let loss = modeled_credit_loss(&assets, &scenario);
        // 200 * 0.1 * 0.4 * 1.25
        assert_eq!(loss.total, dec!(10));
        assert_eq!(loss.by_asset[0].sector_factor, dec!(1.25));
    }

    #[test]
    fn test_other_classes_carry_no_loss() {
        let assets = vec![
            PortfolioAsset::new("stock", AssetClass::Equity, dec!(100)),
            PortfolioAsset::new("gilt", AssetClass::Sovereign, dec!(100)),
        ];
        let scenario = StressScenario::new("s", "S")
            .with_asset_shock(AssetClass::Equity, dec!(-0.5))
            .with_asset_shock(AssetClass::Sovereign, dec!(-0.5));
        assert_eq!(modeled_credit_loss(&assets, &scenario).total, Decimal::ZERO);
    }

    #[test]
    fn test_positive_shock_no_loss() {
        let assets = vec![PortfolioAsset::new("loan", AssetClass::Corporate, dec!(100))];
        let scenario =
            StressScenario::new("s", "S").with_asset_shock(AssetClass::Corporate, dec!(0.10));
        assert_eq!(modeled_credit_loss(&assets, &scenario).total, Decimal::ZERO);
    }

    #[test]
    fn test_severity_capped_at_full_loss() {
        let assets = vec![PortfolioAsset::new("loan", AssetClass::Corporate, dec!(100))];
        let scenario =
            StressScenario::new("s", "S").with_asset_shock(AssetClass::Corporate, dec!(-3));
        // unrated: 100 * 1 * 0.6
        assert_eq!(modeled_credit_loss(&assets, &scenario).total, dec!(60));
    }
}
