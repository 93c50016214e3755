use napi::Result as NapiResult;
use napi_derive::napi;

use regstress_core::impact::analyzer::{self, RegulatoryChangeInput};
use regstress_core::regulatory::capital::{self, CapitalAdequacyInput};
use regstress_core::regulatory::liquidity::{self, LcrInput};
use regstress_core::stress::engine::{self, StressBatchInput, StressScenarioInput};
use regstress_core::stress::ScenarioCatalog;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Regulatory ratios
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_lcr(input_json: String) -> NapiResult<String> {
    let input: LcrInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = liquidity::calculate_lcr(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_capital_adequacy(input_json: String) -> NapiResult<String> {
    let input: CapitalAdequacyInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = capital::calculate_capital_adequacy(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Stress testing
// ---------------------------------------------------------------------------

#[napi]
pub fn run_stress_scenario(input_json: String) -> NapiResult<String> {
    let input: StressScenarioInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = engine::run_stress_scenario(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn run_stress_batch(input_json: String) -> NapiResult<String> {
    let input: StressBatchInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = engine::run_stress_batch(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Supervisory scenarios as a JSON array.
#[napi]
pub fn list_scenarios() -> NapiResult<String> {
    serde_json::to_string(ScenarioCatalog::supervisory().scenarios()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Regulatory change
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_regulatory_change(input_json: String) -> NapiResult<String> {
    let input: RegulatoryChangeInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = analyzer::analyze_regulatory_change(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
