use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::model::asset::{validate_assets, HqlaLevel, PortfolioAsset};
use crate::model::funding::{FundingProfile, FundingType};
use crate::model::parameters::RegulatoryParameters;
use crate::types::{guarded_ratio, with_metadata, ComplianceStatus, ComputationOutput, Money, Rate};
use crate::RegStressResult;

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LcrInput {
    pub assets: Vec<PortfolioAsset>,
    pub funding: FundingProfile,
    #[serde(default)]
    pub parameters: RegulatoryParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HqlaBreakdown {
    pub level1: Money,
    /// Market value before the Level 2A haircut
    pub level2a_gross: Money,
    pub level2a: Money,
    /// Market value before the Level 2B haircut
    pub level2b_gross: Money,
    pub level2b_after_haircut: Money,
    /// Level 2B admitted after the cap
    pub level2b: Money,
    pub level2b_cap_applied: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutflowDetail {
    pub funding_type: FundingType,
    pub amount: Money,
    pub rate: Rate,
    pub weighted_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingConcentration {
    pub counterparty: String,
    pub amount: Money,
    pub share_of_funding: Option<Rate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LcrResult {
    pub hqla: Money,
    pub hqla_breakdown: HqlaBreakdown,
    pub gross_outflows: Money,
    pub inflows: Money,
    pub net_outflows: Money,
    pub net_outflow_floor_applied: bool,
    pub outflow_details: Vec<OutflowDetail>,
    /// `None` when net outflows are zero
    pub lcr_ratio: Option<Rate>,
    pub requirement: Rate,
    pub required_hqla: Money,
    /// Positive = buffer, negative = deficit
    pub buffer_or_deficit: Money,
    pub status: ComplianceStatus,
    pub degenerate_denominator: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub largest_funding_counterparty: Option<FundingConcentration>,
}

impl LcrResult {
    pub fn is_compliant(&self) -> bool {
        self.status.is_compliant()
    }

    /// HQLA still needed to meet the requirement (zero when compliant).
    pub fn shortfall(&self) -> Money {
        (-self.buffer_or_deficit).max(Decimal::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// Basel III Liquidity Coverage Ratio under one regulatory parameter set.
///
/// LCR = HQLA / net 30-day stressed cash outflows.
#[derive(Debug, Clone, Copy)]
pub struct LiquidityCoverageRatioCalculator<'a> {
    parameters: &'a RegulatoryParameters,
}

impl<'a> LiquidityCoverageRatioCalculator<'a> {
    pub fn new(parameters: &'a RegulatoryParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &RegulatoryParameters {
        self.parameters
    }

    pub fn calculate(&self, assets: &[PortfolioAsset], funding: &FundingProfile) -> LcrResult {
        let cal = &self.parameters.calibration;
        let requirement = self.parameters.lcr_requirement;

        let hqla_breakdown = self.hqla_breakdown(assets);
        let hqla = hqla_breakdown.level1 + hqla_breakdown.level2a + hqla_breakdown.level2b;

        // -- Outflows --
        let outflow_details: Vec<OutflowDetail> = FundingType::ALL
            .iter()
            .map(|&funding_type| {
                let amount = funding.amount(funding_type);
                let rate = cal.outflow_rate(funding_type);
                OutflowDetail {
                    funding_type,
                    amount,
                    rate,
                    weighted_amount: amount * rate,
                }
            })
            .collect();
        let gross_outflows: Money = outflow_details.iter().map(|d| d.weighted_amount).sum();

        // -- Net outflows, floored at a share of gross --
        let inflows = funding.contractual_inflows;
        let floor = gross_outflows * cal.net_outflow_floor;
        let unfloored = gross_outflows - inflows;
        let (net_outflows, net_outflow_floor_applied) = if unfloored < floor {
            (floor, true)
        } else {
            (unfloored, false)
        };

        // -- Ratio and verdict --
        let lcr_ratio = guarded_ratio(hqla, net_outflows);
        let required_hqla = net_outflows * requirement;

        LcrResult {
            hqla,
            hqla_breakdown,
            gross_outflows,
            inflows,
            net_outflows,
            net_outflow_floor_applied,
            outflow_details,
            lcr_ratio,
            requirement,
            required_hqla,
            buffer_or_deficit: hqla - required_hqla,
            status: ComplianceStatus::evaluate(lcr_ratio, requirement),
            degenerate_denominator: lcr_ratio.is_none(),
            largest_funding_counterparty: largest_counterparty(funding),
        }
    }

    /// Haircut each level, then admit Level 2B only up to the cap share of
    /// the final HQLA total:
    ///
    /// L2B <= cap * (L1 + L2A + L2B)  =>  L2B <= (L1 + L2A) * cap / (1 - cap)
    fn hqla_breakdown(&self, assets: &[PortfolioAsset]) -> HqlaBreakdown {
        let cal = &self.parameters.calibration;

        let level1_gross = sum_level(assets, HqlaLevel::HqlaL1);
        let level2a_gross = sum_level(assets, HqlaLevel::HqlaL2A);
        let level2b_gross = sum_level(assets, HqlaLevel::HqlaL2B);

        let level1 = level1_gross * (Decimal::ONE - cal.haircut_l1);
        let level2a = level2a_gross * (Decimal::ONE - cal.haircut_l2a);
        let level2b_after_haircut = level2b_gross * (Decimal::ONE - cal.haircut_l2b);

        // A cap close enough to 1 that the bound overflows admits all of L2B
        let level2b_max =
            guarded_ratio((level1 + level2a) * cal.level2b_cap, Decimal::ONE - cal.level2b_cap);
        let (level2b, level2b_cap_applied) = match level2b_max {
            Some(max) if level2b_after_haircut > max => (max, true),
            _ => (level2b_after_haircut, false),
        };

        HqlaBreakdown {
            level1,
            level2a_gross,
            level2a,
            level2b_gross,
            level2b_after_haircut,
            level2b,
            level2b_cap_applied,
        }
    }
}

fn sum_level(assets: &[PortfolioAsset], level: HqlaLevel) -> Money {
    assets
        .iter()
        .filter(|a| a.hqla_level() == level)
        .map(|a| a.market_value)
        .sum()
}

fn largest_counterparty(funding: &FundingProfile) -> Option<FundingConcentration> {
    let (counterparty, amount) = funding
        .counterparty_concentration
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))?;
    Some(FundingConcentration {
        counterparty: counterparty.clone(),
        amount: *amount,
        share_of_funding: guarded_ratio(*amount, funding.total_funding()),
    })
}

// ---------------------------------------------------------------------------
// Boundary function
// ---------------------------------------------------------------------------

/// Calculate the Liquidity Coverage Ratio for a portfolio / funding pair.
///
/// Validates the parameter set and inputs, then wraps the result in the
/// standard computation envelope.
pub fn calculate_lcr(input: &LcrInput) -> RegStressResult<ComputationOutput<LcrResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.parameters.validate()?;
    validate_assets(&input.assets)?;
    input.funding.validate()?;

    let result = LiquidityCoverageRatioCalculator::new(&input.parameters)
        .calculate(&input.assets, &input.funding);
    lcr_warnings(&result, &mut warnings);

    let cal = &input.parameters.calibration;
    let assumptions = serde_json::json!({
        "framework": "Basel III LCR",
        "formula": "LCR = HQLA / max(outflows - inflows, floor * outflows)",
        "hqla_haircuts": {
            "level1": cal.haircut_l1.to_string(),
            "level2a": cal.haircut_l2a.to_string(),
            "level2b": cal.haircut_l2b.to_string(),
        },
        "level2b_cap": cal.level2b_cap.to_string(),
        "outflow_rates": {
            "retail_deposits": cal.retail_outflow_rate.to_string(),
            "corporate_deposits": cal.corporate_outflow_rate.to_string(),
            "wholesale_funding": cal.wholesale_outflow_rate.to_string(),
            "secured_funding": cal.secured_outflow_rate.to_string(),
        },
        "net_outflow_floor": cal.net_outflow_floor.to_string(),
        "requirement": input.parameters.lcr_requirement.to_string(),
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Basel III Liquidity Coverage Ratio (LCR)",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

pub(crate) fn lcr_warnings(result: &LcrResult, warnings: &mut Vec<String>) {
    if result.hqla_breakdown.level2b_cap_applied {
        warnings.push(format!(
            "Level 2B HQLA capped: {} -> {}",
            result.hqla_breakdown.level2b_after_haircut, result.hqla_breakdown.level2b
        ));
    }
    if result.net_outflow_floor_applied {
        warnings.push(format!(
            "Net outflows floored at {} of gross outflows.",
            result.net_outflows
        ));
    }
    if result.degenerate_denominator {
        warnings.push("Net cash outflows are zero or too small to divide by; LCR undefined and treated as compliant.".into());
    }
    if !result.is_compliant() {
        warnings.push(format!(
            "LCR below requirement: HQLA shortfall of {}.",
            result.shortfall()
        ));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
