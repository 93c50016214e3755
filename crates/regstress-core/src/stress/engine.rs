use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::RegStressError;
use crate::model::asset::{validate_assets, PortfolioAsset};
use crate::model::capital_base::CapitalBase;
use crate::model::funding::FundingProfile;
use crate::model::parameters::RegulatoryParameters;
use crate::model::scenario::StressScenario;
use crate::regulatory::capital::{capital_warnings, CapitalAdequacyCalculator, CapitalAdequacyResult};
use crate::regulatory::liquidity::{lcr_warnings, LcrResult, LiquidityCoverageRatioCalculator};
use crate::regulatory::threshold::breached_thresholds;
use crate::stress::catalog::ScenarioCatalog;
use crate::stress::credit_loss::{modeled_credit_loss, AssetCreditLoss};
use crate::types::{
    check_magnitude, guarded_ratio, with_metadata, ComputationOutput, Money, Rate, MAX_AMOUNT,
};
use crate::RegStressResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// LCR headroom above the requirement below which the position is flagged
/// as reduced-buffer
const LCR_MANAGEMENT_HEADROOM: Decimal = dec!(0.10);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressTestResult {
    pub scenario_id: String,
    pub scenario_name: String,

    pub baseline_portfolio_value: Money,
    pub stressed_portfolio_value: Money,
    pub asset_value_change: Money,
    pub stressed_funding: FundingProfile,

    pub credit_loss: Money,
    pub credit_loss_details: Vec<AssetCreditLoss>,
    pub stressed_capital: CapitalBase,

    pub lcr: LcrResult,
    pub capital: CapitalAdequacyResult,

    pub baseline_lcr_ratio: Option<Rate>,
    pub baseline_tier1_ratio: Option<Rate>,
    /// Stressed minus baseline; `None` if either side is undefined
    pub lcr_ratio_change: Option<Rate>,
    pub tier1_ratio_change: Option<Rate>,

    pub severity: Severity,
    pub breaches: Vec<String>,
    pub recommendations: Vec<String>,
}

impl StressTestResult {
    pub fn lcr_ratio(&self) -> Option<Rate> {
        self.lcr.lcr_ratio
    }

    pub fn tier1_ratio(&self) -> Option<Rate> {
        self.capital.tier1_ratio
    }

    pub fn passed(&self) -> bool {
        self.severity != Severity::High
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub scenario_count: usize,
    pub passed: usize,
    pub failed: usize,
    pub min_lcr_ratio: Option<Rate>,
    pub max_lcr_ratio: Option<Rate>,
    pub average_lcr_ratio: Option<Rate>,
    pub min_tier1_ratio: Option<Rate>,
    pub max_tier1_ratio: Option<Rate>,
    pub average_tier1_ratio: Option<Rate>,
    /// Scenario with the lowest stressed LCR
    pub worst_case_scenario: Option<String>,
    pub worst_case_index: Option<usize>,
    /// Scenario with the lowest stressed Tier 1 ratio
    pub worst_tier1_scenario: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStressResult {
    pub results: Vec<StressTestResult>,
    pub summary: BatchSummary,
}

impl BatchStressResult {
    pub fn worst_case(&self) -> Option<&StressTestResult> {
        self.summary.worst_case_index.and_then(|i| self.results.get(i))
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Applies stress scenarios to an immutable base position.
///
/// Every run works on its own shocked copies of the base data, so runs are
/// independent and may execute concurrently.
#[derive(Debug, Clone)]
pub struct StressTestingEngine {
    assets: Vec<PortfolioAsset>,
    funding: FundingProfile,
    parameters: RegulatoryParameters,
    capital: CapitalBase,
    funding_floor: Money,
    baseline_lcr: LcrResult,
    baseline_capital: CapitalAdequacyResult,
}

impl StressTestingEngine {
    pub fn new(
        assets: Vec<PortfolioAsset>,
        funding: FundingProfile,
        parameters: RegulatoryParameters,
        capital: CapitalBase,
    ) -> Self {
        let baseline_lcr =
            LiquidityCoverageRatioCalculator::new(&parameters).calculate(&assets, &funding);
        let baseline_capital =
            CapitalAdequacyCalculator::new(&parameters).calculate(&assets, &capital);
        Self {
            assets,
            funding,
            parameters,
            capital,
            funding_floor: Decimal::ZERO,
            baseline_lcr,
            baseline_capital,
        }
    }

    /// Lowest value a shocked funding bucket may take.
    pub fn with_funding_floor(mut self, floor: Money) -> Self {
        self.funding_floor = floor;
        self
    }

    pub fn parameters(&self) -> &RegulatoryParameters {
        &self.parameters
    }

    pub fn baseline_lcr(&self) -> &LcrResult {
        &self.baseline_lcr
    }

    pub fn baseline_capital(&self) -> &CapitalAdequacyResult {
        &self.baseline_capital
    }

    pub fn run_scenario(&self, scenario: &StressScenario) -> StressTestResult {
        // -- Shock the base position --
        let stressed_assets: Vec<PortfolioAsset> = self
            .assets
            .iter()
            .map(|a| a.shocked(scenario.asset_shock(a.asset_class)))
            .collect();
        let stressed_funding = self
            .funding
            .shocked(&scenario.funding_shocks, self.funding_floor);

        let credit_loss = modeled_credit_loss(&self.assets, scenario);
        let stressed_capital = scenario
            .capital_override
            .as_ref()
            .unwrap_or(&self.capital)
            .after_loss(credit_loss.total);

        // -- Recompute both calculators under stress --
        let lcr = LiquidityCoverageRatioCalculator::new(&self.parameters)
            .calculate(&stressed_assets, &stressed_funding);
        let capital = CapitalAdequacyCalculator::new(&self.parameters)
            .calculate(&stressed_assets, &stressed_capital);

        let baseline_portfolio_value = self.baseline_capital.total_exposure;
        let stressed_portfolio_value = capital.total_exposure;

        let breaches = breached_thresholds(&lcr, &capital);
        let severity = self.assess_severity(&lcr, &capital, &breaches);
        let recommendations = self.recommendations(scenario, severity, &lcr, &capital);

        tracing::debug!(
            scenario = %scenario.id,
            severity = %severity,
            lcr_ratio = ?lcr.lcr_ratio,
            tier1_ratio = ?capital.tier1_ratio,
            credit_loss = %credit_loss.total,
            "stress scenario evaluated"
        );

        StressTestResult {
            scenario_id: scenario.id.clone(),
            scenario_name: scenario.name.clone(),
            baseline_portfolio_value,
            stressed_portfolio_value,
            asset_value_change: stressed_portfolio_value - baseline_portfolio_value,
            stressed_funding,
            credit_loss: credit_loss.total,
            credit_loss_details: credit_loss.by_asset,
            stressed_capital,
            baseline_lcr_ratio: self.baseline_lcr.lcr_ratio,
            baseline_tier1_ratio: self.baseline_capital.tier1_ratio,
            lcr_ratio_change: change(self.baseline_lcr.lcr_ratio, lcr.lcr_ratio),
            tier1_ratio_change: change(self.baseline_capital.tier1_ratio, capital.tier1_ratio),
            lcr,
            capital,
            severity,
            breaches,
            recommendations,
        }
    }

    /// Look up `id` in `catalog` and run it. Unknown ids fail before any
    /// computation.
    pub fn run_scenario_by_id(
        &self,
        catalog: &ScenarioCatalog,
        id: &str,
    ) -> RegStressResult<StressTestResult> {
        let scenario = catalog.get(id)?;
        Ok(self.run_scenario(scenario))
    }

    /// Run every scenario independently and aggregate the outcomes.
    pub fn run_multiple(&self, scenarios: &[StressScenario]) -> BatchStressResult {
        let span = tracing::info_span!("stress_batch", scenarios = scenarios.len());
        let _guard = span.enter();

        #[cfg(feature = "parallel")]
        let results: Vec<StressTestResult> =
            scenarios.par_iter().map(|s| self.run_scenario(s)).collect();
        #[cfg(not(feature = "parallel"))]
        let results: Vec<StressTestResult> =
            scenarios.iter().map(|s| self.run_scenario(s)).collect();

        let summary = summarise(&results);
        tracing::info!(
            passed = summary.passed,
            failed = summary.failed,
            worst_case = ?summary.worst_case_scenario,
            "stress batch complete"
        );

        BatchStressResult { results, summary }
    }

    fn assess_severity(
        &self,
        lcr: &LcrResult,
        capital: &CapitalAdequacyResult,
        breaches: &[String],
    ) -> Severity {
        if !breaches.is_empty() {
            return Severity::High;
        }
        let lcr_thin = lcr
            .lcr_ratio
            .is_some_and(|r| r < lcr.requirement + LCR_MANAGEMENT_HEADROOM);
        let tier1_thin = capital
            .tier1_ratio
            .is_some_and(|r| r < self.parameters.tier1_with_buffers());
        if lcr_thin || tier1_thin {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    fn recommendations(
        &self,
        scenario: &StressScenario,
        severity: Severity,
        lcr: &LcrResult,
        capital: &CapitalAdequacyResult,
    ) -> Vec<String> {
        let p = &self.parameters;
        let mut recs = Vec::new();

        if !lcr.is_compliant() {
            let shortfall = lcr.shortfall();
            let mut rec = format!(
                "Raise HQLA by {} to restore the LCR to {}",
                shortfall.round_dp(2),
                lcr.requirement
            );
            if let Some(outflow_cut) = guarded_ratio(shortfall, lcr.requirement) {
                rec.push_str(&format!(
                    ", or cut net stressed outflows by {}",
                    outflow_cut.round_dp(2)
                ));
            }
            rec.push('.');
            recs.push(rec);
        }

        if !capital.tier1_status.is_compliant() {
            let mut rec = format!(
                "Raise Tier 1 capital by {} to meet the {} minimum",
                capital.tier1_shortfall.round_dp(2),
                p.tier1_minimum
            );
            if let Some(rwa_cut) = guarded_ratio(capital.tier1_shortfall, p.tier1_minimum) {
                rec.push_str(&format!(", or reduce RWA by {}", rwa_cut.round_dp(2)));
            }
            rec.push('.');
            recs.push(rec);
        }

        if !capital.total_capital_status.is_compliant() {
            recs.push(format!(
                "Raise total capital by {} (Tier 2 issuance or retained earnings).",
                capital.total_capital_shortfall.round_dp(2)
            ));
        }

        if !capital.leverage_status.is_compliant() {
            recs.push(format!(
                "Raise Tier 1 capital by {} or shrink the balance sheet to restore the {} leverage ratio.",
                capital.leverage_shortfall.round_dp(2),
                p.leverage_minimum
            ));
        }

        for breach in capital.large_exposure_breaches() {
            recs.push(format!(
                "Reduce exposure to '{}' by {} to return within the large exposure limit.",
                breach.counterparty,
                (breach.exposure - breach.limit).round_dp(2)
            ));
        }

        if severity == Severity::Medium {
            if lcr
                .lcr_ratio
                .is_some_and(|r| r < lcr.requirement + LCR_MANAGEMENT_HEADROOM)
            {
                recs.push(format!(
                    "LCR remains compliant but headroom is thin; rebuild HQLA above {} of net outflows.",
                    lcr.requirement + LCR_MANAGEMENT_HEADROOM
                ));
            }
            if capital
                .tier1_ratio
                .is_some_and(|r| r < p.tier1_with_buffers())
            {
                recs.push(format!(
                    "Tier 1 ratio is inside the combined buffer; restrict distributions and rebuild capital by {}.",
                    capital.tier1_buffer_shortfall.round_dp(2)
                ));
            }
        }

        if recs.is_empty() {
            recs.push(format!(
                "Position remains resilient under '{}'; no action required.",
                scenario.name
            ));
        }

        recs
    }
}

fn change(before: Option<Rate>, after: Option<Rate>) -> Option<Rate> {
    Some(after? - before?)
}

/// Sort key placing undefined ratios after every defined one.
fn ratio_key(ratio: Option<Rate>) -> (bool, Rate) {
    (ratio.is_none(), ratio.unwrap_or_default())
}

fn summarise(results: &[StressTestResult]) -> BatchSummary {
    let lcr_ratios: Vec<Rate> = results.iter().filter_map(|r| r.lcr_ratio()).collect();
    let tier1_ratios: Vec<Rate> = results.iter().filter_map(|r| r.tier1_ratio()).collect();

    let worst_case_index = results
        .iter()
        .enumerate()
        .min_by_key(|(i, r)| (ratio_key(r.lcr_ratio()), ratio_key(r.tier1_ratio()), *i))
        .map(|(i, _)| i);
    let worst_tier1 = results
        .iter()
        .enumerate()
        .min_by_key(|(i, r)| (ratio_key(r.tier1_ratio()), *i))
        .map(|(_, r)| r.scenario_id.clone());

    let passed = results.iter().filter(|r| r.passed()).count();

    BatchSummary {
        scenario_count: results.len(),
        passed,
        failed: results.len() - passed,
        min_lcr_ratio: lcr_ratios.iter().min().copied(),
        max_lcr_ratio: lcr_ratios.iter().max().copied(),
        average_lcr_ratio: average(&lcr_ratios),
        min_tier1_ratio: tier1_ratios.iter().min().copied(),
        max_tier1_ratio: tier1_ratios.iter().max().copied(),
        average_tier1_ratio: average(&tier1_ratios),
        worst_case_scenario: worst_case_index.map(|i| results[i].scenario_id.clone()),
        worst_case_index,
        worst_tier1_scenario: worst_tier1,
    }
}

fn average(values: &[Rate]) -> Option<Rate> {
    if values.is_empty() {
        return None;
    }
    let sum: Decimal = values.iter().sum();
    Some(sum / Decimal::from(values.len() as u64))
}

// ---------------------------------------------------------------------------
// Boundary functions
// ---------------------------------------------------------------------------

/// A scenario given either as a catalog id or in full.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScenarioRef {
    Named(String),
    Custom(StressScenario),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressScenarioInput {
    pub assets: Vec<PortfolioAsset>,
    pub funding: FundingProfile,
    #[serde(default)]
    pub parameters: RegulatoryParameters,
    pub capital_base: CapitalBase,
    pub scenario: ScenarioRef,
    /// Extra named scenarios, added to (or replacing) the supervisory catalog
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub catalog: Vec<StressScenario>,
    #[serde(default)]
    pub funding_floor: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressBatchInput {
    pub assets: Vec<PortfolioAsset>,
    pub funding: FundingProfile,
    #[serde(default)]
    pub parameters: RegulatoryParameters,
    pub capital_base: CapitalBase,
    pub scenarios: Vec<ScenarioRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub catalog: Vec<StressScenario>,
    #[serde(default)]
    pub funding_floor: Money,
}

fn build_catalog(extra: &[StressScenario]) -> ScenarioCatalog {
    let mut catalog = ScenarioCatalog::supervisory();
    for scenario in extra {
        catalog.insert(scenario.clone());
    }
    catalog
}

fn resolve(scenario: &ScenarioRef, catalog: &ScenarioCatalog) -> RegStressResult<StressScenario> {
    match scenario {
        ScenarioRef::Named(id) => catalog.get(id).cloned(),
        ScenarioRef::Custom(custom) => Ok(custom.clone()),
    }
}

fn validate_base(
    assets: &[PortfolioAsset],
    funding: &FundingProfile,
    parameters: &RegulatoryParameters,
    capital: &CapitalBase,
    funding_floor: Money,
) -> RegStressResult<()> {
    parameters.validate()?;
    validate_assets(assets)?;
    funding.validate()?;
    capital.validate()?;
    if funding_floor < Decimal::ZERO {
        return Err(RegStressError::invalid(
            "funding_floor",
            "Funding floor cannot be negative.",
        ));
    }
    check_magnitude("funding_floor", funding_floor, MAX_AMOUNT)?;
    Ok(())
}

fn stress_assumptions(parameters: &RegulatoryParameters) -> serde_json::Value {
    serde_json::json!({
        "asset_shock": "value * (1 + shock[asset_class]); omitted classes unshocked",
        "funding_shock": "bucket * (1 + shock[funding_type]); floored",
        "credit_loss": "corporate/property only: value * |negative shock| * rate(class, rating) * sector factor",
        "severity": {
            "HIGH": "any threshold breached",
            "MEDIUM": format!(
                "LCR below requirement + {} or Tier 1 below {}",
                LCR_MANAGEMENT_HEADROOM,
                parameters.tier1_with_buffers()
            ),
            "LOW": "otherwise",
        },
    })
}

/// Run a single named or inline stress scenario against a base position.
pub fn run_stress_scenario(
    input: &StressScenarioInput,
) -> RegStressResult<ComputationOutput<StressTestResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_base(
        &input.assets,
        &input.funding,
        &input.parameters,
        &input.capital_base,
        input.funding_floor,
    )?;
    let catalog = build_catalog(&input.catalog);
    let scenario = resolve(&input.scenario, &catalog)?;
    scenario.validate(&mut warnings)?;

    let engine = StressTestingEngine::new(
        input.assets.clone(),
        input.funding.clone(),
        input.parameters.clone(),
        input.capital_base.clone(),
    )
    .with_funding_floor(input.funding_floor);
    let result = engine.run_scenario(&scenario);
    lcr_warnings(&result.lcr, &mut warnings);
    capital_warnings(&result.capital, &mut warnings);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Scenario Stress Test (LCR and Capital Adequacy)",
        &stress_assumptions(&input.parameters),
        warnings,
        elapsed,
        result,
    ))
}

/// Run a batch of stress scenarios and aggregate the outcomes.
pub fn run_stress_batch(
    input: &StressBatchInput,
) -> RegStressResult<ComputationOutput<BatchStressResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.scenarios.is_empty() {
        return Err(RegStressError::InsufficientData(
            "At least one scenario required".into(),
        ));
    }
    validate_base(
        &input.assets,
        &input.funding,
        &input.parameters,
        &input.capital_base,
        input.funding_floor,
    )?;

    let catalog = build_catalog(&input.catalog);
    let scenarios = input
        .scenarios
        .iter()
        .map(|scenario| resolve(scenario, &catalog))
        .collect::<RegStressResult<Vec<_>>>()?;
    for scenario in &scenarios {
        scenario.validate(&mut warnings)?;
    }

    let engine = StressTestingEngine::new(
        input.assets.clone(),
        input.funding.clone(),
        input.parameters.clone(),
        input.capital_base.clone(),
    )
    .with_funding_floor(input.funding_floor);
    let result = engine.run_multiple(&scenarios);

    for r in result.results.iter().filter(|r| !r.passed()) {
        warnings.push(format!(
            "Scenario '{}' breaches: {}",
            r.scenario_id,
            r.breaches.join(", ")
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Multi-Scenario Stress Test",
        &stress_assumptions(&input.parameters),
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
