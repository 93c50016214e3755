use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RegStressError;
use crate::RegStressResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Largest monetary amount accepted at the boundary (one quintillion).
/// Keeps every product and sum the calculators form inside Decimal range.
pub const MAX_AMOUNT: Money = dec!(1_000_000_000_000_000_000);

/// Largest absolute rate accepted at the boundary (1000%).
pub const MAX_RATE: Rate = dec!(10);

/// Compliance verdict for a single regulatory threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
}

impl ComplianceStatus {
    /// `value >= minimum` is compliant; an undefined value (degenerate
    /// denominator) is compliant by definition.
    pub fn evaluate(value: Option<Rate>, minimum: Rate) -> Self {
        match value {
            Some(v) if v < minimum => Self::NonCompliant,
            _ => Self::Compliant,
        }
    }

    pub fn is_compliant(&self) -> bool {
        matches!(self, Self::Compliant)
    }
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compliant => write!(f, "COMPLIANT"),
            Self::NonCompliant => write!(f, "NON_COMPLIANT"),
        }
    }
}

/// Divide, returning `None` when the denominator is zero or the quotient
/// does not fit in a Decimal.
pub(crate) fn guarded_ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    numerator.checked_div(denominator)
}

/// Reject a value whose magnitude exceeds `max`.
pub(crate) fn check_magnitude(
    field: impl Into<String>,
    value: Decimal,
    max: Decimal,
) -> RegStressResult<()> {
    if value.abs() > max {
        return Err(RegStressError::invalid(
            field,
            format!("Value {} exceeds the supported magnitude of {}.", value, max),
        ));
    }
    Ok(())
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
