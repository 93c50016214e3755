pub mod capital;
pub mod liquidity;
pub mod threshold;

pub use capital::{calculate_capital_adequacy, CapitalAdequacyCalculator, CapitalAdequacyResult};
pub use liquidity::{calculate_lcr, LcrResult, LiquidityCoverageRatioCalculator};
pub use threshold::{breached_thresholds, threshold_checks, Threshold, ThresholdCheck};
