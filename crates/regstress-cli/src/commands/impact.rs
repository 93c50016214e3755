use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use regstress_core::impact::analyzer::{self, RegulatoryChangeInput};

use super::override_decimal;
use crate::input;

/// Arguments for regulatory change impact analysis
#[derive(Args)]
pub struct ImpactArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Annual carry cost of additional HQLA, in basis points
    #[arg(long)]
    pub liquidity_cost_bps: Option<Decimal>,

    /// Annual cost of additional Tier 1 capital, in basis points
    #[arg(long)]
    pub capital_cost_bps: Option<Decimal>,
}

pub fn run_impact(args: ImpactArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut doc = input::load(args.input.as_deref(), "impact analysis")?;
    override_decimal(
        &mut doc,
        &["cost_assumptions", "liquidity_cost_bps"],
        args.liquidity_cost_bps,
    )?;
    override_decimal(
        &mut doc,
        &["cost_assumptions", "capital_cost_bps"],
        args.capital_cost_bps,
    )?;

    let change_input: RegulatoryChangeInput = serde_json::from_value(doc)?;
    let result = analyzer::analyze_regulatory_change(&change_input)?;
    Ok(serde_json::to_value(result)?)
}
