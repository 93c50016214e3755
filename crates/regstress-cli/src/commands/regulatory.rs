use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use regstress_core::regulatory::capital::{self, CapitalAdequacyInput};
use regstress_core::regulatory::liquidity::{self, LcrInput};

use super::override_decimal;
use crate::input;

/// Arguments for LCR calculation
#[derive(Args)]
pub struct LcrArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Override the LCR requirement (e.g. 1.10)
    #[arg(long)]
    pub lcr_requirement: Option<Decimal>,
}

/// Arguments for capital adequacy calculation
#[derive(Args)]
pub struct CapitalArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Override the Tier 1 minimum ratio
    #[arg(long)]
    pub tier1_minimum: Option<Decimal>,

    /// Override the countercyclical buffer rate
    #[arg(long)]
    pub countercyclical_buffer: Option<Decimal>,
}

pub fn run_lcr(args: LcrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut doc = input::load(args.input.as_deref(), "LCR calculation")?;
    override_decimal(&mut doc, &["parameters", "lcr_requirement"], args.lcr_requirement)?;

    let lcr_input: LcrInput = serde_json::from_value(doc)?;
    let result = liquidity::calculate_lcr(&lcr_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_capital(args: CapitalArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut doc = input::load(args.input.as_deref(), "capital adequacy")?;
    override_decimal(&mut doc, &["parameters", "tier1_minimum"], args.tier1_minimum)?;
    override_decimal(
        &mut doc,
        &["parameters", "buffers", "countercyclical"],
        args.countercyclical_buffer,
    )?;

    let capital_input: CapitalAdequacyInput = serde_json::from_value(doc)?;
    let result = capital::calculate_capital_adequacy(&capital_input)?;
    Ok(serde_json::to_value(result)?)
}
