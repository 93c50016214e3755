use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RegStressError;
use crate::types::{check_magnitude, Money, Rate, MAX_AMOUNT};
use crate::RegStressResult;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Broad exposure class used for risk weighting and scenario shocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetClass {
    Sovereign,
    Corporate,
    Equity,
    Derivative,
    Cash,
    Property,
}

impl AssetClass {
    pub const ALL: [AssetClass; 6] = [
        Self::Sovereign,
        Self::Corporate,
        Self::Equity,
        Self::Derivative,
        Self::Cash,
        Self::Property,
    ];
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sovereign => write!(f, "Sovereign"),
            Self::Corporate => write!(f, "Corporate"),
            Self::Equity => write!(f, "Equity"),
            Self::Derivative => write!(f, "Derivative"),
            Self::Cash => write!(f, "Cash"),
            Self::Property => write!(f, "Property"),
        }
    }
}

/// Basel III liquidity classification of an asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HqlaLevel {
    /// Cash, central bank reserves, 0% RW sovereigns. No haircut.
    #[serde(rename = "HQLA_L1")]
    HqlaL1,
    /// 20% RW sovereigns, covered bonds, high-grade corporates.
    #[serde(rename = "HQLA_L2A")]
    HqlaL2A,
    /// RMBS, lower-grade corporates, equities.
    #[serde(rename = "HQLA_L2B")]
    HqlaL2B,
    #[default]
    #[serde(rename = "NON_HQLA")]
    NonHqla,
}

impl std::fmt::Display for HqlaLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HqlaL1 => write!(f, "Level 1"),
            Self::HqlaL2A => write!(f, "Level 2A"),
            Self::HqlaL2B => write!(f, "Level 2B"),
            Self::NonHqla => write!(f, "Non-HQLA"),
        }
    }
}

/// External rating bucket. Notch modifiers ("+", "-") are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RatingBand {
    Aaa,
    Aa,
    A,
    Bbb,
    Bb,
    B,
    CccOrBelow,
    Unrated,
}

impl RatingBand {
    /// Bucket a free-text rating such as "AA-", "bbb+" or "NR".
    pub fn from_rating(rating: Option<&str>) -> Self {
        let Some(raw) = rating else {
            return Self::Unrated;
        };
        let letters: String = raw
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_uppercase();

        match letters.as_str() {
            "AAA" => Self::Aaa,
            "AA" => Self::Aa,
            "A" => Self::A,
            "BBB" => Self::Bbb,
            "BB" => Self::Bb,
            "B" => Self::B,
            "CCC" | "CC" | "C" | "D" | "SD" | "RD" => Self::CccOrBelow,
            _ => Self::Unrated,
        }
    }
}

// ---------------------------------------------------------------------------
// Portfolio asset
// ---------------------------------------------------------------------------

/// An individual exposure held by the bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAsset {
    pub id: String,
    pub asset_class: AssetClass,
    /// Single source of truth for valuation.
    pub market_value: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notional_value: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maturity_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<String>,
    /// Override risk weight; if None, derived from asset_class + rating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_weight: Option<Rate>,
    /// Absent means non-HQLA
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidity_classification: Option<HqlaLevel>,
}

impl PortfolioAsset {
    pub fn new(id: impl Into<String>, asset_class: AssetClass, market_value: Money) -> Self {
        Self {
            id: id.into(),
            asset_class,
            market_value,
            notional_value: None,
            maturity_date: None,
            credit_rating: None,
            jurisdiction: None,
            sector: None,
            counterparty: None,
            risk_weight: None,
            liquidity_classification: None,
        }
    }

    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.credit_rating = Some(rating.into());
        self
    }

    pub fn with_hqla(mut self, level: HqlaLevel) -> Self {
        self.liquidity_classification = Some(level);
        self
    }

    pub fn with_counterparty(mut self, counterparty: impl Into<String>) -> Self {
        self.counterparty = Some(counterparty.into());
        self
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_risk_weight(mut self, risk_weight: Rate) -> Self {
        self.risk_weight = Some(risk_weight);
        self
    }

    pub fn hqla_level(&self) -> HqlaLevel {
        self.liquidity_classification.unwrap_or_default()
    }

    pub fn rating_band(&self) -> RatingBand {
        RatingBand::from_rating(self.credit_rating.as_deref())
    }

    /// Copy of this asset with its market value scaled by `(1 + shock)`.
    /// Classifiers are carried over unchanged.
    pub fn shocked(&self, shock: Rate) -> Self {
        Self {
            market_value: self.market_value * (Decimal::ONE + shock),
            ..self.clone()
        }
    }
}

/// Highest risk weight an override may carry (1250%).
pub const MAX_RISK_WEIGHT: Rate = dec!(12.5);

/// Data-entry validation for a portfolio. The calculators themselves accept
/// any numeric input; this is applied at the boundary functions.
pub fn validate_assets(assets: &[PortfolioAsset]) -> RegStressResult<()> {
    for (i, asset) in assets.iter().enumerate() {
        if asset.id.trim().is_empty() {
            return Err(RegStressError::invalid(
                format!("assets[{}].id", i),
                "Asset identifier must not be empty.",
            ));
        }
        if asset.market_value < Decimal::ZERO {
            return Err(RegStressError::invalid(
                format!("assets[{}].market_value", i),
                format!(
                    "Asset '{}' has negative market value: {}",
                    asset.id, asset.market_value
                ),
            ));
        }
        check_magnitude(format!("assets[{}].market_value", i), asset.market_value, MAX_AMOUNT)?;
        if let Some(rw) = asset.risk_weight {
            if rw < Decimal::ZERO || rw > MAX_RISK_WEIGHT {
                return Err(RegStressError::invalid(
                    format!("assets[{}].risk_weight", i),
                    format!("Risk weight must be between 0 and {}.", MAX_RISK_WEIGHT),
                ));
            }
        }
    }
    Ok(())
}
