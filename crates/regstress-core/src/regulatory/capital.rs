use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::model::asset::{validate_assets, AssetClass, PortfolioAsset, RatingBand};
use crate::model::capital_base::CapitalBase;
use crate::model::parameters::RegulatoryParameters;
use crate::types::{guarded_ratio, with_metadata, ComplianceStatus, ComputationOutput, Money, Rate};
use crate::RegStressResult;

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalAdequacyInput {
    pub assets: Vec<PortfolioAsset>,
    pub capital_base: CapitalBase,
    #[serde(default)]
    pub parameters: RegulatoryParameters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskWeightSource {
    Explicit,
    Standardised,
}

/// Per-asset risk weight application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureDetail {
    pub id: String,
    pub asset_class: AssetClass,
    pub market_value: Money,
    pub risk_weight: Rate,
    pub risk_weight_source: RiskWeightSource,
    pub rwa: Money,
}

/// Capital buffers as currency amounts (rate x RWA).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferRequirements {
    pub conservation: Money,
    pub countercyclical: Money,
    pub systemic: Money,
    pub total: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LargeExposureStatus {
    /// Above the reporting threshold but within the limit
    Reportable,
    Breach,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LargeExposure {
    pub counterparty: String,
    pub exposure: Money,
    pub limit: Money,
    /// exposure / limit; `None` when the limit is zero
    pub utilisation: Option<Rate>,
    pub status: LargeExposureStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalAdequacyResult {
    pub rwa: Money,
    /// Unweighted sum of market values
    pub total_exposure: Money,
    pub exposure_details: Vec<ExposureDetail>,

    pub tier1_capital: Money,
    pub tier2_capital: Money,
    pub total_capital: Money,

    pub tier1_ratio: Option<Rate>,
    pub total_capital_ratio: Option<Rate>,
    pub leverage_ratio: Option<Rate>,

    pub tier1_minimum: Rate,
    pub total_capital_minimum: Rate,
    pub leverage_minimum: Rate,

    pub tier1_status: ComplianceStatus,
    pub total_capital_status: ComplianceStatus,
    pub leverage_status: ComplianceStatus,

    pub buffers: BufferRequirements,
    /// tier1_minimum x RWA
    pub minimum_tier1_capital: Money,
    /// total_capital_minimum x RWA
    pub minimum_total_capital: Money,
    /// Minimum total capital plus all buffers
    pub combined_requirement: Money,

    pub tier1_shortfall: Money,
    /// Shortfall against Tier 1 minimum plus buffers
    pub tier1_buffer_shortfall: Money,
    pub total_capital_shortfall: Money,
    pub leverage_shortfall: Money,

    /// Permitted share of Tier 1 per counterparty
    pub large_exposure_limit_rate: Rate,
    /// large_exposure_limit_rate x Tier 1
    pub large_exposure_limit: Money,
    pub large_exposures: Vec<LargeExposure>,
    pub large_exposure_status: ComplianceStatus,

    pub degenerate_rwa: bool,
    pub degenerate_exposure: bool,
    pub meets_requirements: bool,
}

impl CapitalAdequacyResult {
    pub fn large_exposure_breaches(&self) -> impl Iterator<Item = &LargeExposure> {
        self.large_exposures
            .iter()
            .filter(|e| e.status == LargeExposureStatus::Breach)
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Counterparties above this share of the large exposure limit are reported
const LARGE_EXPOSURE_REPORTING_THRESHOLD: Decimal = dec!(0.10);

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// Risk-weighted capital adequacy under one regulatory parameter set.
#[derive(Debug, Clone, Copy)]
pub struct CapitalAdequacyCalculator<'a> {
    parameters: &'a RegulatoryParameters,
}

impl<'a> CapitalAdequacyCalculator<'a> {
    pub fn new(parameters: &'a RegulatoryParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &RegulatoryParameters {
        self.parameters
    }

    pub fn calculate(
        &self,
        assets: &[PortfolioAsset],
        capital: &CapitalBase,
    ) -> CapitalAdequacyResult {
        let p = self.parameters;

        // -- RWA --
        let exposure_details: Vec<ExposureDetail> = assets.iter().map(exposure_detail).collect();
        let rwa: Money = exposure_details.iter().map(|d| d.rwa).sum();
        let total_exposure: Money = assets.iter().map(|a| a.market_value).sum();

        // -- Ratios --
        let tier1_capital = capital.tier1_capital;
        let tier2_capital = capital.tier2_capital;
        let total_capital = capital.total_capital();

        let tier1_ratio = guarded_ratio(tier1_capital, rwa);
        let total_capital_ratio = guarded_ratio(total_capital, rwa);
        let leverage_ratio = guarded_ratio(tier1_capital, total_exposure);

        let tier1_status = ComplianceStatus::evaluate(tier1_ratio, p.tier1_minimum);
        let total_capital_status =
            ComplianceStatus::evaluate(total_capital_ratio, p.total_capital_minimum);
        let leverage_status = ComplianceStatus::evaluate(leverage_ratio, p.leverage_minimum);

        // -- Buffers and minimum amounts --
        let buffers = BufferRequirements {
            conservation: rwa * p.buffers.conservation,
            countercyclical: rwa * p.buffers.countercyclical,
            systemic: rwa * p.buffers.systemic,
            total: rwa * p.buffers.total(),
        };
        let minimum_tier1_capital = rwa * p.tier1_minimum;
        let minimum_total_capital = rwa * p.total_capital_minimum;
        let combined_requirement = minimum_total_capital + buffers.total;

        let tier1_shortfall = shortfall(minimum_tier1_capital, tier1_capital);
        let tier1_buffer_shortfall = shortfall(minimum_tier1_capital + buffers.total, tier1_capital);
        let total_capital_shortfall = shortfall(minimum_total_capital, total_capital);
        let leverage_shortfall = shortfall(total_exposure * p.leverage_minimum, tier1_capital);

        // -- Large exposures --
        let large_exposure_limit = p.large_exposure_limit * tier1_capital;
        let large_exposures = large_exposures(assets, large_exposure_limit);
        let large_exposure_status = if large_exposures
            .iter()
            .any(|e| e.status == LargeExposureStatus::Breach)
        {
            ComplianceStatus::NonCompliant
        } else {
            ComplianceStatus::Compliant
        };

        let meets_requirements = tier1_status.is_compliant()
            && total_capital_status.is_compliant()
            && leverage_status.is_compliant()
            && large_exposure_status.is_compliant();

        CapitalAdequacyResult {
            rwa,
            total_exposure,
            exposure_details,
            tier1_capital,
            tier2_capital,
            total_capital,
            tier1_ratio,
            total_capital_ratio,
            leverage_ratio,
            tier1_minimum: p.tier1_minimum,
            total_capital_minimum: p.total_capital_minimum,
            leverage_minimum: p.leverage_minimum,
            tier1_status,
            total_capital_status,
            leverage_status,
            buffers,
            minimum_tier1_capital,
            minimum_total_capital,
            combined_requirement,
            tier1_shortfall,
            tier1_buffer_shortfall,
            total_capital_shortfall,
            leverage_shortfall,
            large_exposure_limit_rate: p.large_exposure_limit,
            large_exposure_limit,
            large_exposures,
            large_exposure_status,
            degenerate_rwa: tier1_ratio.is_none() || total_capital_ratio.is_none(),
            degenerate_exposure: leverage_ratio.is_none(),
            meets_requirements,
        }
    }
}

fn shortfall(required: Money, available: Money) -> Money {
    (required - available).max(Decimal::ZERO)
}

fn exposure_detail(asset: &PortfolioAsset) -> ExposureDetail {
    let (risk_weight, risk_weight_source) = match asset.risk_weight {
        Some(rw) => (rw, RiskWeightSource::Explicit),
        None => (
            standard_risk_weight(asset.asset_class, asset.rating_band()),
            RiskWeightSource::Standardised,
        ),
    };
    ExposureDetail {
        id: asset.id.clone(),
        asset_class: asset.asset_class,
        market_value: asset.market_value,
        risk_weight,
        risk_weight_source,
        rwa: asset.market_value * risk_weight,
    }
}

/// Standardised risk weight by asset class and rating band.
pub fn standard_risk_weight(asset_class: AssetClass, band: RatingBand) -> Rate {
    match asset_class {
        AssetClass::Cash => dec!(0),
        AssetClass::Sovereign => match band {
            RatingBand::Aaa => dec!(0),
            _ => dec!(0.20),
        },
        AssetClass::Corporate => match band {
            RatingBand::Aaa | RatingBand::Aa => dec!(0.20),
            RatingBand::A => dec!(0.50),
            _ => dec!(1.00),
        },
        AssetClass::Equity => dec!(2.50),
        AssetClass::Property => dec!(1.00),
        AssetClass::Derivative => dec!(1.00),
    }
}

/// Aggregate exposure by counterparty and keep those above the reporting
/// threshold, largest first.
fn large_exposures(assets: &[PortfolioAsset], limit: Money) -> Vec<LargeExposure> {
    let mut by_counterparty: BTreeMap<&str, Money> = BTreeMap::new();
    for asset in assets {
        if let Some(counterparty) = asset.counterparty.as_deref() {
            *by_counterparty.entry(counterparty).or_insert(Decimal::ZERO) += asset.market_value;
        }
    }

    let threshold = limit * LARGE_EXPOSURE_REPORTING_THRESHOLD;
    let mut reported: Vec<LargeExposure> = by_counterparty
        .into_iter()
        .filter(|(_, exposure)| *exposure > threshold)
        .map(|(counterparty, exposure)| LargeExposure {
            counterparty: counterparty.to_string(),
            exposure,
            limit,
            utilisation: guarded_ratio(exposure, limit),
            status: if exposure > limit {
                LargeExposureStatus::Breach
            } else {
                LargeExposureStatus::Reportable
            },
        })
        .collect();

    reported.sort_by(|a, b| {
        b.exposure
            .cmp(&a.exposure)
            .then_with(|| a.counterparty.cmp(&b.counterparty))
    });
    reported
}

// ---------------------------------------------------------------------------
// Boundary function
// ---------------------------------------------------------------------------

/// Calculate risk-weighted capital adequacy, leverage, buffers and large
/// exposure concentration.
pub fn calculate_capital_adequacy(
    input: &CapitalAdequacyInput,
) -> RegStressResult<ComputationOutput<CapitalAdequacyResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.parameters.validate()?;
    validate_assets(&input.assets)?;
    input.capital_base.validate()?;

    if input.assets.is_empty() {
        warnings.push("No assets provided; RWA and exposure will be zero.".into());
    }

    let result = CapitalAdequacyCalculator::new(&input.parameters)
        .calculate(&input.assets, &input.capital_base);
    capital_warnings(&result, &mut warnings);

    let p = &input.parameters;
    let assumptions = serde_json::json!({
        "framework": "Basel III Standardised Approach",
        "credit_risk": "SA risk weights by asset class and external rating",
        "minimum_tier1": p.tier1_minimum.to_string(),
        "minimum_total_capital": p.total_capital_minimum.to_string(),
        "minimum_leverage": p.leverage_minimum.to_string(),
        "large_exposure_limit": p.large_exposure_limit.to_string(),
        "buffers": {
            "conservation": p.buffers.conservation.to_string(),
            "countercyclical": p.buffers.countercyclical.to_string(),
            "systemic": p.buffers.systemic.to_string(),
        },
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Basel III Capital Adequacy (Standardised Approach)",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

pub(crate) fn capital_warnings(result: &CapitalAdequacyResult, warnings: &mut Vec<String>) {
    if result.degenerate_rwa {
        warnings.push("Total RWA is zero or too small to divide by; capital ratios undefined and treated as compliant.".into());
    }
    if result.degenerate_exposure {
        warnings.push("Total exposure is zero or too small to divide by; leverage ratio undefined and treated as compliant.".into());
    }
    for breach in result.large_exposure_breaches() {
        warnings.push(format!(
            "Large exposure breach: '{}' exposure {} exceeds limit {}.",
            breach.counterparty, breach.exposure, breach.limit
        ));
    }
    if !result.meets_requirements {
        warnings.push("Institution does NOT meet minimum capital requirements.".into());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
