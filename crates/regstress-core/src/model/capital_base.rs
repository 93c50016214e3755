use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RegStressError;
use crate::types::{check_magnitude, Money, MAX_AMOUNT};
use crate::RegStressResult;

/// Regulatory capital available to absorb losses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapitalBase {
    pub tier1_capital: Money,
    pub tier2_capital: Money,
}

impl CapitalBase {
    pub fn new(tier1_capital: Money, tier2_capital: Money) -> Self {
        Self {
            tier1_capital,
            tier2_capital,
        }
    }

    pub fn total_capital(&self) -> Money {
        self.tier1_capital + self.tier2_capital
    }

    /// Deduct a loss from Tier 1, flooring at zero. Tier 2 is untouched.
    pub fn after_loss(&self, loss: Money) -> Self {
        Self {
            tier1_capital: (self.tier1_capital - loss.max(Decimal::ZERO)).max(Decimal::ZERO),
            tier2_capital: self.tier2_capital,
        }
    }

    pub fn validate(&self) -> RegStressResult<()> {
        if self.tier1_capital < Decimal::ZERO {
            return Err(RegStressError::invalid(
                "capital_base.tier1_capital",
                "Tier 1 capital cannot be negative.",
            ));
        }
        if self.tier2_capital < Decimal::ZERO {
            return Err(RegStressError::invalid(
                "capital_base.tier2_capital",
                "Tier 2 capital cannot be negative.",
            ));
        }
        check_magnitude("capital_base.tier1_capital", self.tier1_capital, MAX_AMOUNT)?;
        check_magnitude("capital_base.tier2_capital", self.tier2_capital, MAX_AMOUNT)?;
        Ok(())
    }
}
