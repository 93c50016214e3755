pub mod catalog;
pub mod credit_loss;
pub mod engine;

pub use catalog::ScenarioCatalog;
pub use credit_loss::{modeled_credit_loss, CreditLossBreakdown};
pub use engine::{
    run_stress_batch, run_stress_scenario, BatchStressResult, Severity, StressTestResult,
    StressTestingEngine,
};
