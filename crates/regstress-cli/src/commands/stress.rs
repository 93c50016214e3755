use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use regstress_core::stress::engine::{self, StressBatchInput, StressScenarioInput};
use regstress_core::stress::ScenarioCatalog;

use super::{override_decimal, set_field};
use crate::input;

/// Arguments for a single stress scenario
#[derive(Args)]
pub struct StressArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Run this catalog scenario instead of the one in the input
    #[arg(long)]
    pub scenario: Option<String>,

    /// Lowest value a shocked funding bucket may take
    #[arg(long)]
    pub funding_floor: Option<Decimal>,
}

/// Arguments for a batch of stress scenarios
#[derive(Args)]
pub struct StressBatchArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Run every supervisory scenario instead of the input's list
    #[arg(long)]
    pub all_supervisory: bool,

    /// Lowest value a shocked funding bucket may take
    #[arg(long)]
    pub funding_floor: Option<Decimal>,
}

/// Arguments for listing the scenario catalog
#[derive(Args)]
pub struct ScenariosArgs {
    /// Show only this scenario
    #[arg(long)]
    pub id: Option<String>,
}

pub fn run_stress(args: StressArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut doc = input::load(args.input.as_deref(), "stress scenario")?;
    if let Some(id) = args.scenario {
        set_field(&mut doc, &["scenario"], Value::String(id))?;
    }
    override_decimal(&mut doc, &["funding_floor"], args.funding_floor)?;

    let stress_input: StressScenarioInput = serde_json::from_value(doc)?;
    let result = engine::run_stress_scenario(&stress_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_stress_batch(args: StressBatchArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut doc = input::load(args.input.as_deref(), "stress batch")?;
    if args.all_supervisory {
        let ids: Vec<Value> = ScenarioCatalog::supervisory()
            .ids()
            .map(|id| Value::String(id.to_string()))
            .collect();
        set_field(&mut doc, &["scenarios"], Value::Array(ids))?;
    }
    override_decimal(&mut doc, &["funding_floor"], args.funding_floor)?;

    let batch_input: StressBatchInput = serde_json::from_value(doc)?;
    let result = engine::run_stress_batch(&batch_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_scenarios(args: ScenariosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = ScenarioCatalog::supervisory();
    if let Some(id) = args.id {
        let scenario = catalog.get(&id)?;
        return Ok(serde_json::to_value(scenario)?);
    }

    let rows: Vec<Value> = catalog
        .scenarios()
        .iter()
        .map(|s| {
            json!({
                "id": s.id,
                "name": s.name,
                "description": s.description,
                "asset_shocks": s.asset_shocks.len(),
                "funding_shocks": s.funding_shocks.len(),
            })
        })
        .collect();
    Ok(Value::Array(rows))
}
