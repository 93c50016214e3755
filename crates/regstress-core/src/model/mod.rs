//! Domain records shared by every calculator: portfolio assets, funding,
//! regulatory parameters, capital and stress scenarios.

pub mod asset;
pub mod capital_base;
pub mod funding;
pub mod parameters;
pub mod scenario;

pub use asset::{AssetClass, HqlaLevel, PortfolioAsset, RatingBand};
pub use capital_base::CapitalBase;
pub use funding::{FundingProfile, FundingType};
pub use parameters::{BufferRates, LcrCalibration, RegulatoryParameters};
pub use scenario::StressScenario;
