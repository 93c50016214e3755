pub mod analyzer;

pub use analyzer::{
    analyze_regulatory_change, ImpactCostAssumptions, RegulatoryImpactAnalyzer,
    RegulatoryImpactResult,
};
