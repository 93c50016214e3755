use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RegStressError;
use crate::model::asset::{validate_assets, PortfolioAsset};
use crate::model::capital_base::CapitalBase;
use crate::model::funding::FundingProfile;
use crate::model::parameters::RegulatoryParameters;
use crate::regulatory::capital::{CapitalAdequacyCalculator, CapitalAdequacyResult};
use crate::regulatory::liquidity::{LcrResult, LiquidityCoverageRatioCalculator};
pub use crate::regulatory::threshold::Threshold;
use crate::regulatory::threshold::threshold_checks;
use crate::types::{with_metadata, ComplianceStatus, ComputationOutput, Money, Rate};
use crate::RegStressResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Annual carry cost of holding additional HQLA, in basis points
pub const DEFAULT_LIQUIDITY_COST_BPS: Decimal = dec!(50);
/// Annual cost of raising additional Tier 1 capital, in basis points
pub const DEFAULT_CAPITAL_COST_BPS: Decimal = dec!(1000);

const BPS_DIVISOR: Decimal = dec!(10000);

/// Headroom below which a still-compliant ratio is flagged for monitoring
const MONITORING_HEADROOM: Decimal = dec!(0.10);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactCostAssumptions {
    pub liquidity_cost_bps: Decimal,
    pub capital_cost_bps: Decimal,
}

impl Default for ImpactCostAssumptions {
    fn default() -> Self {
        Self {
            liquidity_cost_bps: DEFAULT_LIQUIDITY_COST_BPS,
            capital_cost_bps: DEFAULT_CAPITAL_COST_BPS,
        }
    }
}

impl ImpactCostAssumptions {
    /// Costs must lie in [0, 10000] bps.
    pub fn validate(&self) -> RegStressResult<()> {
        let costs = [
            ("cost_assumptions.liquidity_cost_bps", self.liquidity_cost_bps),
            ("cost_assumptions.capital_cost_bps", self.capital_cost_bps),
        ];
        for (field, value) in costs {
            if value < Decimal::ZERO {
                return Err(RegStressError::invalid(field, "Cost cannot be negative."));
            }
            if value > BPS_DIVISOR {
                return Err(RegStressError::invalid(
                    field,
                    format!("Cost cannot exceed {} bps (got {}).", BPS_DIVISOR, value),
                ));
            }
        }
        Ok(())
    }
}

/// Before/after snapshot of one regulatory threshold. Values and requirements
/// read as in [`ThresholdCheck`](crate::regulatory::threshold::ThresholdCheck).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdComparison {
    pub threshold: Threshold,
    pub current_value: Option<Rate>,
    pub proposed_value: Option<Rate>,
    pub current_requirement: Rate,
    pub proposed_requirement: Rate,
    pub current_status: ComplianceStatus,
    pub proposed_status: ComplianceStatus,
}

impl ThresholdComparison {
    pub fn newly_breached(&self) -> bool {
        self.current_status.is_compliant() && !self.proposed_status.is_compliant()
    }

    pub fn newly_cured(&self) -> bool {
        !self.current_status.is_compliant() && self.proposed_status.is_compliant()
    }
}

/// Proposed minus current. Ratio deltas are `None` when either side is
/// undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactDeltas {
    pub lcr_ratio: Option<Rate>,
    pub lcr_headroom: Option<Rate>,
    pub tier1_ratio: Option<Rate>,
    pub tier1_headroom: Option<Rate>,
    pub total_capital_ratio: Option<Rate>,
    pub total_capital_headroom: Option<Rate>,
    pub leverage_ratio: Option<Rate>,
    pub leverage_headroom: Option<Rate>,
    pub required_hqla: Money,
    pub minimum_tier1_capital: Money,
    /// Total capital minimum plus buffers
    pub minimum_capital_requirement: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecommendationPriority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for RecommendationPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactRecommendation {
    pub priority: RecommendationPriority,
    pub area: String,
    pub action: String,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryImpactResult {
    pub current_jurisdiction: String,
    pub proposed_jurisdiction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<NaiveDate>,

    pub current_lcr: LcrResult,
    pub proposed_lcr: LcrResult,
    pub current_capital: CapitalAdequacyResult,
    pub proposed_capital: CapitalAdequacyResult,

    pub deltas: ImpactDeltas,
    pub thresholds: Vec<ThresholdComparison>,
    pub newly_non_compliant: Vec<String>,
    pub newly_compliant: Vec<String>,

    pub additional_liquidity_required: Money,
    pub additional_tier1_required: Money,
    pub liquidity_cost: Money,
    pub capital_cost: Money,
    pub estimated_annual_cost: Money,

    pub recommendations: Vec<ImpactRecommendation>,
}

impl RegulatoryImpactResult {
    pub fn has_new_breaches(&self) -> bool {
        !self.newly_non_compliant.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

/// Compares compliance of one unstressed position under the current and a
/// proposed regulatory regime.
#[derive(Debug, Clone)]
pub struct RegulatoryImpactAnalyzer {
    assets: Vec<PortfolioAsset>,
    funding: FundingProfile,
    current: RegulatoryParameters,
    costs: ImpactCostAssumptions,
}

impl RegulatoryImpactAnalyzer {
    pub fn new(
        assets: Vec<PortfolioAsset>,
        funding: FundingProfile,
        current: RegulatoryParameters,
    ) -> Self {
        Self {
            assets,
            funding,
            current,
            costs: ImpactCostAssumptions::default(),
        }
    }

    pub fn with_cost_assumptions(mut self, costs: ImpactCostAssumptions) -> Self {
        self.costs = costs;
        self
    }

    pub fn current_parameters(&self) -> &RegulatoryParameters {
        &self.current
    }

    pub fn analyze_change(
        &self,
        proposed: &RegulatoryParameters,
        capital: &CapitalBase,
    ) -> RegulatoryImpactResult {
        let current_lcr = LiquidityCoverageRatioCalculator::new(&self.current)
            .calculate(&self.assets, &self.funding);
        let current_capital =
            CapitalAdequacyCalculator::new(&self.current).calculate(&self.assets, capital);
        let proposed_lcr =
            LiquidityCoverageRatioCalculator::new(proposed).calculate(&self.assets, &self.funding);
        let proposed_capital =
            CapitalAdequacyCalculator::new(proposed).calculate(&self.assets, capital);

        let deltas = deltas(&current_lcr, &proposed_lcr, &current_capital, &proposed_capital);
        let thresholds = thresholds(&current_lcr, &proposed_lcr, &current_capital, &proposed_capital);

        let newly_non_compliant: Vec<String> = thresholds
            .iter()
            .filter(|t| t.newly_breached())
            .map(|t| format!("{} will become non-compliant", t.threshold))
            .collect();
        let newly_compliant: Vec<String> = thresholds
            .iter()
            .filter(|t| t.newly_cured())
            .map(|t| format!("{} will become compliant", t.threshold))
            .collect();

        let additional_liquidity_required =
            increase(current_lcr.shortfall(), proposed_lcr.shortfall());
        let additional_tier1_required = increase(
            current_capital.tier1_buffer_shortfall,
            proposed_capital.tier1_buffer_shortfall,
        );
        let liquidity_cost = additional_liquidity_required * self.costs.liquidity_cost_bps / BPS_DIVISOR;
        let capital_cost = additional_tier1_required * self.costs.capital_cost_bps / BPS_DIVISOR;

        let mut result = RegulatoryImpactResult {
            current_jurisdiction: self.current.jurisdiction.clone(),
            proposed_jurisdiction: proposed.jurisdiction.clone(),
            effective_date: proposed.effective_date,
            current_lcr,
            proposed_lcr,
            current_capital,
            proposed_capital,
            deltas,
            thresholds,
            newly_non_compliant,
            newly_compliant,
            additional_liquidity_required,
            additional_tier1_required,
            liquidity_cost,
            capital_cost,
            estimated_annual_cost: liquidity_cost + capital_cost,
            recommendations: Vec::new(),
        };
        result.recommendations = recommendations(&result);

        tracing::info!(
            current = %result.current_jurisdiction,
            proposed = %result.proposed_jurisdiction,
            new_breaches = result.newly_non_compliant.len(),
            estimated_annual_cost = %result.estimated_annual_cost,
            "regulatory change analysed"
        );

        result
    }
}

fn increase(before: Money, after: Money) -> Money {
    (after - before).max(Decimal::ZERO)
}

fn delta(before: Option<Rate>, after: Option<Rate>) -> Option<Rate> {
    Some(after? - before?)
}

fn headroom(ratio: Option<Rate>, requirement: Rate) -> Option<Rate> {
    ratio.map(|r| r - requirement)
}

fn deltas(
    current_lcr: &LcrResult,
    proposed_lcr: &LcrResult,
    current: &CapitalAdequacyResult,
    proposed: &CapitalAdequacyResult,
) -> ImpactDeltas {
    ImpactDeltas {
        lcr_ratio: delta(current_lcr.lcr_ratio, proposed_lcr.lcr_ratio),
        lcr_headroom: delta(
            headroom(current_lcr.lcr_ratio, current_lcr.requirement),
            headroom(proposed_lcr.lcr_ratio, proposed_lcr.requirement),
        ),
        tier1_ratio: delta(current.tier1_ratio, proposed.tier1_ratio),
        tier1_headroom: delta(
            headroom(current.tier1_ratio, current.tier1_minimum),
            headroom(proposed.tier1_ratio, proposed.tier1_minimum),
        ),
        total_capital_ratio: delta(current.total_capital_ratio, proposed.total_capital_ratio),
        total_capital_headroom: delta(
            headroom(current.total_capital_ratio, current.total_capital_minimum),
            headroom(proposed.total_capital_ratio, proposed.total_capital_minimum),
        ),
        leverage_ratio: delta(current.leverage_ratio, proposed.leverage_ratio),
        leverage_headroom: delta(
            headroom(current.leverage_ratio, current.leverage_minimum),
            headroom(proposed.leverage_ratio, proposed.leverage_minimum),
        ),
        required_hqla: proposed_lcr.required_hqla - current_lcr.required_hqla,
        minimum_tier1_capital: proposed.minimum_tier1_capital - current.minimum_tier1_capital,
        minimum_capital_requirement: proposed.combined_requirement - current.combined_requirement,
    }
}

fn thresholds(
    current_lcr: &LcrResult,
    proposed_lcr: &LcrResult,
    current: &CapitalAdequacyResult,
    proposed: &CapitalAdequacyResult,
) -> Vec<ThresholdComparison> {
    threshold_checks(current_lcr, current)
        .into_iter()
        .zip(threshold_checks(proposed_lcr, proposed))
        .map(|(before, after)| ThresholdComparison {
            threshold: before.threshold,
            current_value: before.value,
            proposed_value: after.value,
            current_requirement: before.requirement,
            proposed_requirement: after.requirement,
            current_status: before.status,
            proposed_status: after.status,
        })
        .collect()
}

fn recommendations(result: &RegulatoryImpactResult) -> Vec<ImpactRecommendation> {
    let deadline = match result.effective_date {
        Some(date) => format!("before the {} effective date", date),
        None => "before implementation".to_string(),
    };
    let newly = |t: Threshold| {
        result
            .thresholds
            .iter()
            .any(|c| c.threshold == t && c.newly_breached())
    };
    let mut recs = Vec::new();

    if result.additional_liquidity_required > Decimal::ZERO {
        recs.push(ImpactRecommendation {
            priority: if newly(Threshold::Lcr) {
                RecommendationPriority::High
            } else {
                RecommendationPriority::Medium
            },
            area: Threshold::Lcr.to_string(),
            action: format!(
                "Increase HQLA by {} {} (est. annual carry cost {}).",
                result.additional_liquidity_required.round_dp(2),
                deadline,
                result.liquidity_cost.round_dp(2)
            ),
            amount: result.additional_liquidity_required,
        });
    }

    if result.additional_tier1_required > Decimal::ZERO {
        let breach = newly(Threshold::Tier1Ratio);
        recs.push(ImpactRecommendation {
            priority: if breach {
                RecommendationPriority::High
            } else {
                RecommendationPriority::Medium
            },
            area: Threshold::Tier1Ratio.to_string(),
            action: format!(
                "Raise Tier 1 capital by {} {} to cover the minimum plus buffers, or reduce RWA \
                 (est. annual cost {}).",
                result.additional_tier1_required.round_dp(2),
                deadline,
                result.capital_cost.round_dp(2)
            ),
            amount: result.additional_tier1_required,
        });
    }

    if newly(Threshold::TotalCapitalRatio) {
        let amount = increase(
            result.current_capital.total_capital_shortfall,
            result.proposed_capital.total_capital_shortfall,
        );
        recs.push(ImpactRecommendation {
            priority: RecommendationPriority::High,
            area: Threshold::TotalCapitalRatio.to_string(),
            action: format!(
                "Issue {} of additional Tier 2 or Tier 1 capital {}.",
                amount.round_dp(2),
                deadline
            ),
            amount,
        });
    }

    if newly(Threshold::LeverageRatio) {
        let amount = increase(
            result.current_capital.leverage_shortfall,
            result.proposed_capital.leverage_shortfall,
        );
        recs.push(ImpactRecommendation {
            priority: RecommendationPriority::High,
            area: Threshold::LeverageRatio.to_string(),
            action: format!(
                "Raise Tier 1 capital by {} or shrink the balance sheet {}.",
                amount.round_dp(2),
                deadline
            ),
            amount,
        });
    }

    if newly(Threshold::LargeExposures) {
        for breach in result.proposed_capital.large_exposure_breaches() {
            let amount = breach.exposure - breach.limit;
            recs.push(ImpactRecommendation {
                priority: RecommendationPriority::High,
                area: Threshold::LargeExposures.to_string(),
                action: format!(
                    "Reduce exposure to '{}' by {} {}.",
                    breach.counterparty,
                    amount.round_dp(2),
                    deadline
                ),
                amount,
            });
        }
    }

    // Still compliant, but the proposed regime eats into headroom
    for t in &result.thresholds {
        if t.threshold == Threshold::LargeExposures || !t.proposed_status.is_compliant() {
            continue;
        }
        let tightened = t.proposed_requirement > t.current_requirement;
        let thin = t
            .proposed_value
            .is_some_and(|v| v - t.proposed_requirement < MONITORING_HEADROOM);
        if tightened && thin {
            recs.push(ImpactRecommendation {
                priority: RecommendationPriority::Low,
                area: t.threshold.to_string(),
                action: format!(
                    "{} stays compliant under the proposed {} requirement but headroom falls \
                     below {}; monitor closely.",
                    t.threshold, t.proposed_requirement, MONITORING_HEADROOM
                ),
                amount: Decimal::ZERO,
            });
        }
    }

    if result.deltas.required_hqla < Decimal::ZERO {
        let released = -result.deltas.required_hqla;
        recs.push(ImpactRecommendation {
            priority: RecommendationPriority::Low,
            area: Threshold::Lcr.to_string(),
            action: format!(
                "Proposed regime lowers required HQLA by {}; consider redeploying surplus liquidity.",
                released.round_dp(2)
            ),
            amount: released,
        });
    }

    if recs.is_empty() {
        recs.push(ImpactRecommendation {
            priority: RecommendationPriority::Low,
            area: "General".to_string(),
            action: "No material impact from the proposed regime; no action required.".to_string(),
            amount: Decimal::ZERO,
        });
    }

    recs.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| b.amount.cmp(&a.amount)));
    recs
}

// ---------------------------------------------------------------------------
// Boundary function
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulatoryChangeInput {
    pub assets: Vec<PortfolioAsset>,
    pub funding: FundingProfile,
    #[serde(default)]
    pub current_parameters: RegulatoryParameters,
    pub proposed_parameters: RegulatoryParameters,
    pub capital_base: CapitalBase,
    #[serde(default)]
    pub cost_assumptions: ImpactCostAssumptions,
}

/// Compare compliance and compliance cost under the current and a proposed
/// regulatory regime.
pub fn analyze_regulatory_change(
    input: &RegulatoryChangeInput,
) -> RegStressResult<ComputationOutput<RegulatoryImpactResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.current_parameters.validate()?;
    input.proposed_parameters.validate()?;
    validate_assets(&input.assets)?;
    input.funding.validate()?;
    input.capital_base.validate()?;
    input.cost_assumptions.validate()?;

    let result = RegulatoryImpactAnalyzer::new(
        input.assets.clone(),
        input.funding.clone(),
        input.current_parameters.clone(),
    )
    .with_cost_assumptions(input.cost_assumptions)
    .analyze_change(&input.proposed_parameters, &input.capital_base);

    for breach in &result.newly_non_compliant {
        warnings.push(breach.clone());
    }
    if result.proposed_lcr.degenerate_denominator {
        warnings.push("Net cash outflows are zero or too small to divide by; LCR undefined and treated as compliant.".into());
    }
    if result.proposed_capital.degenerate_rwa {
        warnings.push("RWA is zero or too small to divide by; capital ratios undefined and treated as compliant.".into());
    }

    let assumptions = serde_json::json!({
        "basis": "Unstressed portfolio and funding under both regimes",
        "additional_liquidity": "increase in HQLA shortfall (proposed - current, floored at 0)",
        "additional_tier1": "increase in shortfall against Tier 1 minimum plus buffers",
        "liquidity_cost_bps": input.cost_assumptions.liquidity_cost_bps.to_string(),
        "capital_cost_bps": input.cost_assumptions.capital_cost_bps.to_string(),
        "cost_formula": "amount * bps / 10000",
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Regulatory Change Impact Analysis",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::asset::{AssetClass, HqlaLevel};
    use crate::model::parameters::BufferRates;
    use pretty_assertions::assert_eq;

    /// HQLA 105 against net outflows 100: LCR 1.05.
    fn position() -> (Vec<PortfolioAsset>, FundingProfile) {
        let assets = vec![
            PortfolioAsset::new("cash", AssetClass::Cash, dec!(105)).with_hqla(HqlaLevel::HqlaL1),
            PortfolioAsset::new("loan", AssetClass::Corporate, dec!(500))
                .with_rating("A")
                .with_counterparty("Globex"),
        ];
        let funding = FundingProfile {
            retail_deposits: dec!(2000),
            ..Default::default()
        };
        (assets, funding)
    }

    fn analyzer() -> RegulatoryImpactAnalyzer {
        let (assets, funding) = position();
        RegulatoryImpactAnalyzer::new(assets, funding, RegulatoryParameters::default())
    }

    fn capital() -> CapitalBase {
        // RWA = 250; tier1 ratio 0.12; LE limit 0.25 * 30 = 7.5 vs Globex 500
        CapitalBase::new(dec!(30), dec!(5))
    }

    #[test]
    fn test_lcr_requirement_raise_creates_breach() {
        let proposed = RegulatoryParameters::default().with_lcr_requirement(dec!(1.10));
        let result = analyzer().analyze_change(&proposed, &capital());

        assert_eq!(result.current_lcr.lcr_ratio, Some(dec!(1.05)));
        assert_eq!(result.current_lcr.status, ComplianceStatus::Compliant);
        assert_eq!(result.proposed_lcr.status, ComplianceStatus::NonCompliant);
        assert!(result
            .newly_non_compliant
            .contains(&"LCR will become non-compliant".to_string()));
        assert_eq!(result.additional_liquidity_required, dec!(5));
        assert_eq!(result.liquidity_cost, dec!(0.025));
        assert_eq!(result.deltas.lcr_ratio, Some(Decimal::ZERO));
        assert_eq!(result.deltas.lcr_headroom, Some(dec!(-0.10)));
        assert_eq!(result.recommendations[0].priority, RecommendationPriority::High);
        assert!(result.recommendations[0].action.starts_with("Increase HQLA by 5"));
    }

    #[test]
    fn test_identical_parameters_zero_deltas() {
        let result = analyzer().analyze_change(&RegulatoryParameters::default(), &capital());

        let d = &result.deltas;
        assert_eq!(d.lcr_ratio, Some(Decimal::ZERO));
        assert_eq!(d.lcr_headroom, Some(Decimal::ZERO));
        assert_eq!(d.tier1_ratio, Some(Decimal::ZERO));
        assert_eq!(d.tier1_headroom, Some(Decimal::ZERO));
        assert_eq!(d.total_capital_ratio, Some(Decimal::ZERO));
        assert_eq!(d.leverage_ratio, Some(Decimal::ZERO));
        assert_eq!(d.required_hqla, Decimal::ZERO);
        assert_eq!(d.minimum_capital_requirement, Decimal::ZERO);
        assert!(result.newly_non_compliant.is_empty());
        assert!(result.newly_compliant.is_empty());
        assert_eq!(result.estimated_annual_cost, Decimal::ZERO);
        assert_eq!(result.current_lcr, result.proposed_lcr);
        assert_eq!(result.current_capital, result.proposed_capital);
    }

    #[test]
    fn test_buffer_increase_costs_capital() {
        // Tier 1 min + buffers: 0.06 + 0.04 = 0.10 of RWA 250 -> 25;
        // systemic 0.005 -> 0.03 lifts it to 0.125 -> 31.25
        let analyzer = analyzer();
        let proposed = RegulatoryParameters::default().with_buffers(BufferRates {
            systemic: dec!(0.03),
            ..Default::default()
        });
        let result = analyzer.analyze_change(&proposed, &CapitalBase::new(dec!(26), dec!(5)));

        // current shortfall 0 (26 >= 25); proposed 31.25 - 26 = 5.25
        assert_eq!(result.additional_tier1_required, dec!(5.25));
        assert_eq!(result.capital_cost, dec!(0.525));
        assert!(result.newly_non_compliant.is_empty());
        assert_eq!(result.deltas.minimum_capital_requirement, dec!(6.25));
        let rec = &result.recommendations[0];
        assert_eq!(rec.priority, RecommendationPriority::Medium);
        assert_eq!(rec.area, "Tier 1 ratio");
    }

    #[test]
    fn test_effective_date_in_recommendation() {
        let proposed = RegulatoryParameters {
            effective_date: NaiveDate::from_ymd_opt(2027, 1, 1),
            ..RegulatoryParameters::default().with_lcr_requirement(dec!(1.10))
        };
        let result = analyzer().analyze_change(&proposed, &capital());
        assert!(result.recommendations[0].action.contains("2027-01-01"));
    }

    #[test]
    fn test_loosening_releases_liquidity() {
        let proposed = RegulatoryParameters::default().with_lcr_requirement(dec!(0.90));
        let result = analyzer().analyze_change(&proposed, &capital());
        assert_eq!(result.deltas.required_hqla, dec!(-10));
        assert_eq!(result.additional_liquidity_required, Decimal::ZERO);
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.action.contains("lowers required HQLA by 10")));
    }

    #[test]
    fn test_recommendations_ranked() {
        let proposed = RegulatoryParameters::default()
            .with_lcr_requirement(dec!(1.10))
            .with_tier1_minimum(dec!(0.07))
            .with_total_capital_minimum(dec!(0.09));
        let result = analyzer().analyze_change(&proposed, &capital());
        let priorities: Vec<_> = result.recommendations.iter().map(|r| r.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
        for pair in result.recommendations.windows(2) {
            if pair[0].priority == pair[1].priority {
                assert!(pair[0].amount >= pair[1].amount);
            }
        }
    }

    #[test]
    fn test_threshold_snapshot_covers_all() {
        let result = analyzer().analyze_change(&RegulatoryParameters::default(), &capital());
        let kinds: Vec<_> = result.thresholds.iter().map(|t| t.threshold).collect();
        assert_eq!(
            kinds,
            vec![
                Threshold::Lcr,
                Threshold::Tier1Ratio,
                Threshold::TotalCapitalRatio,
                Threshold::LeverageRatio,
                Threshold::LargeExposures,
            ]
        );
        // Globex 500 against limit 7.5 is a breach under both regimes
        let le = &result.thresholds[4];
        assert_eq!(le.current_status, ComplianceStatus::NonCompliant);
        assert!(!le.newly_breached());
    }

    #[test]
    fn test_large_exposure_requirement_reported_without_tier1() {
        let proposed = RegulatoryParameters {
            large_exposure_limit: dec!(0.20),
            ..RegulatoryParameters::default()
        };
        let no_tier1 = CapitalBase::new(Decimal::ZERO, dec!(10));
        let result = analyzer().analyze_change(&proposed, &no_tier1);
        let le = &result.thresholds[4];
        assert_eq!(le.threshold, Threshold::LargeExposures);
        assert_eq!(le.current_requirement, dec!(0.25));
        assert_eq!(le.proposed_requirement, dec!(0.20));
        assert_eq!(le.proposed_value, None);
    }

    #[test]
    fn test_boundary_rejects_bad_proposed_parameters() {
        let (assets, funding) = position();
        let input = RegulatoryChangeInput {
            assets,
            funding,
            current_parameters: RegulatoryParameters::default(),
            proposed_parameters: RegulatoryParameters::default().with_tier1_minimum(dec!(-0.01)),
            capital_base: capital(),
            cost_assumptions: ImpactCostAssumptions::default(),
        };
        assert!(matches!(
            analyze_regulatory_change(&input),
            Err(RegStressError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_boundary_function_envelope() {
        let (assets, funding) = position();
        let input = RegulatoryChangeInput {
            assets,
            funding,
            current_parameters: RegulatoryParameters::default(),
            proposed_parameters: RegulatoryParameters::default().with_lcr_requirement(dec!(1.10)),
            capital_base: capital(),
            cost_assumptions: ImpactCostAssumptions::default(),
        };
        let output = analyze_regulatory_change(&input).unwrap();
        assert!(output
            .warnings
            .contains(&"LCR will become non-compliant".to_string()));
        assert_eq!(output.methodology, "Regulatory Change Impact Analysis");
    }
}
