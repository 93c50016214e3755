use pretty_assertions::assert_eq;
use regstress_core::model::{AssetClass, CapitalBase, PortfolioAsset, RegulatoryParameters};
use regstress_core::regulatory::capital::{
    calculate_capital_adequacy, CapitalAdequacyInput, LargeExposureStatus, RiskWeightSource,
};
use regstress_core::{ComplianceStatus, RegStressError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Capital adequacy tests
// ===========================================================================

fn bank_book() -> Vec<PortfolioAsset> {
    vec![
        PortfolioAsset::new("cash", AssetClass::Cash, dec!(1_000)),
        PortfolioAsset::new("gilts", AssetClass::Sovereign, dec!(2_000)).with_rating("AA+"),
        PortfolioAsset::new("ig-bond", AssetClass::Corporate, dec!(1_500))
            .with_rating("A-")
            .with_counterparty("Initech"),
        PortfolioAsset::new("hy-loan", AssetClass::Corporate, dec!(800))
            .with_rating("BB")
            .with_counterparty("Initech"),
        PortfolioAsset::new("office", AssetClass::Property, dec!(700)),
        PortfolioAsset::new("swap", AssetClass::Derivative, dec!(100)).with_risk_weight(dec!(0.5)),
    ]
}

fn input(tier1: Decimal, tier2: Decimal) -> CapitalAdequacyInput {
    CapitalAdequacyInput {
        assets: bank_book(),
        capital_base: CapitalBase::new(tier1, tier2),
        parameters: RegulatoryParameters::default(),
    }
}

#[test]
fn test_rwa_and_ratios() {
    let r = calculate_capital_adequacy(&input(dec!(400), dec!(100))).unwrap().result;

    // 0 + 400 + 750 + 800 + 700 + 50
    assert_eq!(r.rwa, dec!(2700));
    assert_eq!(r.total_exposure, dec!(6100));
    assert_eq!(r.tier1_ratio.map(|v| v.round_dp(6)), Some(dec!(0.148148)));
    assert_eq!(r.total_capital_ratio.map(|v| v.round_dp(6)), Some(dec!(0.185185)));
    assert_eq!(r.tier1_status, ComplianceStatus::Compliant);
    assert_eq!(r.leverage_status, ComplianceStatus::Compliant);

    let swap = r.exposure_details.iter().find(|d| d.id == "swap").unwrap();
    assert_eq!(swap.risk_weight_source, RiskWeightSource::Explicit);
    assert_eq!(swap.rwa, dec!(50));
}

#[test]
fn test_buffers_and_minimum_amounts() {
    let r = calculate_capital_adequacy(&input(dec!(400), dec!(100))).unwrap().result;
    assert_eq!(r.minimum_tier1_capital, dec!(162));
    assert_eq!(r.minimum_total_capital, dec!(216));
    assert_eq!(r.buffers.conservation, dec!(67.5));
    assert_eq!(r.buffers.total, dec!(108));
    assert_eq!(r.combined_requirement, dec!(324));
}

#[test]
fn test_large_exposure_aggregated_by_counterparty() {
    // Initech: 1500 + 800 = 2300 against 0.25 * 400 = 100
    let output = calculate_capital_adequacy(&input(dec!(400), dec!(100))).unwrap();
    let r = &output.result;
    assert_eq!(r.large_exposures.len(), 1);
    assert_eq!(r.large_exposures[0].counterparty, "Initech");
    assert_eq!(r.large_exposures[0].exposure, dec!(2300));
    assert_eq!(r.large_exposures[0].status, LargeExposureStatus::Breach);
    assert_eq!(r.large_exposure_status, ComplianceStatus::NonCompliant);
    assert!(!r.meets_requirements);
}

#[test]
fn test_tier1_breach_sets_shortfall() {
    let r = calculate_capital_adequacy(&input(dec!(100), dec!(200))).unwrap().result;
    assert_eq!(r.tier1_status, ComplianceStatus::NonCompliant);
    assert_eq!(r.tier1_shortfall, dec!(62));
    assert_eq!(r.total_capital_status, ComplianceStatus::Compliant);
}

#[test]
fn test_tier1_ratio_never_exceeds_total() {
    for (t1, t2) in [(dec!(0), dec!(0)), (dec!(50), dec!(0)), (dec!(300), dec!(75))] {
        let r = calculate_capital_adequacy(&input(t1, t2)).unwrap().result;
        assert!(r.tier1_ratio.unwrap() <= r.total_capital_ratio.unwrap());
    }
}

#[test]
fn test_zero_rwa_is_degenerate_and_compliant() {
    let input = CapitalAdequacyInput {
        assets: vec![PortfolioAsset::new("cash", AssetClass::Cash, dec!(10))],
        capital_base: CapitalBase::new(dec!(1), dec!(0)),
        parameters: RegulatoryParameters::default(),
    };
    let output = calculate_capital_adequacy(&input).unwrap();
    assert!(output.result.degenerate_rwa);
    assert_eq!(output.result.tier1_ratio, None);
    assert_eq!(output.result.tier1_status, ComplianceStatus::Compliant);
    assert_eq!(output.result.leverage_ratio, Some(dec!(0.1)));
}

#[test]
fn test_empty_portfolio() {
    let input = CapitalAdequacyInput {
        assets: vec![],
        capital_base: CapitalBase::new(dec!(1), dec!(0)),
        parameters: RegulatoryParameters::default(),
    };
    let r = calculate_capital_adequacy(&input).unwrap().result;
    assert!(r.degenerate_rwa);
    assert!(r.degenerate_exposure);
    assert!(r.meets_requirements);
    assert_eq!(r.rwa, Decimal::ZERO);
}

#[test]
fn test_negative_capital_rejected() {
    assert!(matches!(
        calculate_capital_adequacy(&input(dec!(-1), dec!(0))),
        Err(RegStressError::InvalidInput { .. })
    ));
}

#[test]
fn test_tier1_minimum_above_total_rejected() {
    let mut bad = input(dec!(400), dec!(100));
    bad.parameters = RegulatoryParameters::default().with_tier1_minimum(dec!(0.09));
    assert!(matches!(
        calculate_capital_adequacy(&bad),
        Err(RegStressError::InvalidInput { .. })
    ));
}

#[test]
fn test_vanishing_rwa_leaves_ratios_undefined() {
    let tiny = CapitalAdequacyInput {
        assets: vec![PortfolioAsset::new(
            "dust",
            AssetClass::Corporate,
            dec!(0.00000000000000000001),
        )],
        capital_base: CapitalBase::new(dec!(100_000_000_000), Decimal::ZERO),
        parameters: RegulatoryParameters::default(),
    };
    let output = calculate_capital_adequacy(&tiny).unwrap();
    let r = &output.result;

    assert_eq!(r.tier1_ratio, None);
    assert_eq!(r.total_capital_ratio, None);
    assert_eq!(r.leverage_ratio, None);
    assert!(r.degenerate_rwa);
    assert!(r.degenerate_exposure);
    assert_eq!(r.tier1_status, ComplianceStatus::Compliant);
}

#[test]
fn test_oversized_risk_weight_rejected() {
    let mut bad = input(dec!(400), dec!(100));
    bad.assets[0] = bad.assets[0].clone().with_risk_weight(dec!(1000));
    assert!(matches!(
        calculate_capital_adequacy(&bad),
        Err(RegStressError::InvalidInput { .. })
    ));
}
