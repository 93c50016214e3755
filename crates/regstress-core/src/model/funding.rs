use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::RegStressError;
use crate::types::{check_magnitude, Money, Rate, MAX_AMOUNT};
use crate::RegStressResult;

/// Key addressing one funding bucket, used by scenario funding shocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingType {
    RetailDeposits,
    CorporateDeposits,
    WholesaleFunding,
    SecuredFunding,
}

impl FundingType {
    pub const ALL: [FundingType; 4] = [
        Self::RetailDeposits,
        Self::CorporateDeposits,
        Self::WholesaleFunding,
        Self::SecuredFunding,
    ];
}

impl std::fmt::Display for FundingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RetailDeposits => write!(f, "Retail Deposits"),
            Self::CorporateDeposits => write!(f, "Corporate Deposits"),
            Self::WholesaleFunding => write!(f, "Wholesale Funding"),
            Self::SecuredFunding => write!(f, "Secured Funding"),
        }
    }
}

/// Aggregate liability structure of the bank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundingProfile {
    pub retail_deposits: Money,
    pub corporate_deposits: Money,
    pub wholesale_funding: Money,
    pub secured_funding: Money,
    /// Expected contractual inflows over the 30-day horizon
    #[serde(default)]
    pub contractual_inflows: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stable_funding_ratio: Option<Rate>,
    /// Funding provided per counterparty
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub counterparty_concentration: BTreeMap<String, Money>,
}

impl FundingProfile {
    pub fn amount(&self, funding_type: FundingType) -> Money {
        match funding_type {
            FundingType::RetailDeposits => self.retail_deposits,
            FundingType::CorporateDeposits => self.corporate_deposits,
            FundingType::WholesaleFunding => self.wholesale_funding,
            FundingType::SecuredFunding => self.secured_funding,
        }
    }

    fn amount_mut(&mut self, funding_type: FundingType) -> &mut Money {
        match funding_type {
            FundingType::RetailDeposits => &mut self.retail_deposits,
            FundingType::CorporateDeposits => &mut self.corporate_deposits,
            FundingType::WholesaleFunding => &mut self.wholesale_funding,
            FundingType::SecuredFunding => &mut self.secured_funding,
        }
    }

    pub fn total_funding(&self) -> Money {
        FundingType::ALL.iter().map(|t| self.amount(*t)).sum()
    }

    /// Copy of the profile with every bucket scaled by `(1 + shock)`.
    /// Buckets absent from `shocks` are unchanged; a shocked bucket never
    /// drops below `floor` (or its own baseline, if that is lower).
    pub fn shocked(&self, shocks: &BTreeMap<FundingType, Rate>, floor: Money) -> Self {
        let mut stressed = self.clone();
        for funding_type in FundingType::ALL {
            let shock = shocks.get(&funding_type).copied().unwrap_or(Decimal::ZERO);
            let bucket = stressed.amount_mut(funding_type);
            let shocked = *bucket * (Decimal::ONE + shock);
            *bucket = shocked.max(floor.min(*bucket));
        }
        stressed
    }

    pub fn validate(&self) -> RegStressResult<()> {
        for funding_type in FundingType::ALL {
            if self.amount(funding_type) < Decimal::ZERO {
                return Err(RegStressError::invalid(
                    format!("funding.{}", serde_key(funding_type)),
                    format!("{} cannot be negative.", funding_type),
                ));
            }
            check_magnitude(
                format!("funding.{}", serde_key(funding_type)),
                self.amount(funding_type),
                MAX_AMOUNT,
            )?;
        }
        if self.contractual_inflows < Decimal::ZERO {
            return Err(RegStressError::invalid(
                "funding.contractual_inflows",
                "Contractual inflows cannot be negative.",
            ));
        }
        check_magnitude("funding.contractual_inflows", self.contractual_inflows, MAX_AMOUNT)?;
        for (counterparty, amount) in &self.counterparty_concentration {
            if *amount < Decimal::ZERO {
                return Err(RegStressError::invalid(
                    "funding.counterparty_concentration",
                    format!("Funding from '{}' cannot be negative.", counterparty),
                ));
            }
            check_magnitude("funding.counterparty_concentration", *amount, MAX_AMOUNT)?;
        }
        Ok(())
    }
}

fn serde_key(funding_type: FundingType) -> &'static str {
    match funding_type {
        FundingType::RetailDeposits => "retail_deposits",
        FundingType::CorporateDeposits => "corporate_deposits",
        FundingType::WholesaleFunding => "wholesale_funding",
        FundingType::SecuredFunding => "secured_funding",
    }
}
