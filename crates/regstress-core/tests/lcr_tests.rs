use pretty_assertions::assert_eq;
use regstress_core::model::{AssetClass, FundingProfile, HqlaLevel, PortfolioAsset, RegulatoryParameters};
use regstress_core::regulatory::liquidity::{calculate_lcr, LcrInput};
use regstress_core::{ComplianceStatus, RegStressError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Liquidity Coverage Ratio tests
// ===========================================================================

fn retail_funding(amount: Decimal) -> FundingProfile {
    FundingProfile {
        retail_deposits: amount,
        ..Default::default()
    }
}

fn single_asset_input(level: HqlaLevel, value: Decimal) -> LcrInput {
    LcrInput {
        assets: vec![PortfolioAsset::new("a1", AssetClass::Sovereign, value).with_hqla(level)],
        funding: retail_funding(dec!(1000)),
        parameters: RegulatoryParameters::default(),
    }
}

#[test]
fn test_level1_only_portfolio() {
    let output = calculate_lcr(&single_asset_input(HqlaLevel::HqlaL1, dec!(100))).unwrap();
    let r = &output.result;

    assert_eq!(r.hqla, dec!(100));
    assert_eq!(r.net_outflows, dec!(50));
    assert_eq!(r.lcr_ratio, Some(dec!(2.0)));
    assert_eq!(r.status, ComplianceStatus::Compliant);
    assert_eq!(r.buffer_or_deficit, dec!(50));
    assert!(output.warnings.is_empty());
}

#[test]
fn test_level2b_without_anchor_is_capped_to_zero() {
    let output = calculate_lcr(&single_asset_input(HqlaLevel::HqlaL2B, dec!(100))).unwrap();
    let r = &output.result;

    assert_eq!(r.hqla_breakdown.level2b_after_haircut, dec!(75));
    assert!(r.hqla_breakdown.level2b_cap_applied);
    assert_eq!(r.hqla, Decimal::ZERO);
    assert_eq!(r.lcr_ratio, Some(Decimal::ZERO));
    assert_eq!(r.status, ComplianceStatus::NonCompliant);
    assert!(output.warnings.iter().any(|w| w.contains("Level 2B HQLA capped")));
}

#[test]
fn test_mixed_portfolio_full_breakdown() {
    let input = LcrInput {
        assets: vec![
            PortfolioAsset::new("cash", AssetClass::Cash, dec!(400)).with_hqla(HqlaLevel::HqlaL1),
            PortfolioAsset::new("agency", AssetClass::Sovereign, dec!(200))
                .with_rating("AA")
                .with_hqla(HqlaLevel::HqlaL2A),
            PortfolioAsset::new("rmbs", AssetClass::Corporate, dec!(600))
                .with_rating("AA")
                .with_hqla(HqlaLevel::HqlaL2B),
            PortfolioAsset::new("loans", AssetClass::Corporate, dec!(5000)),
        ],
        funding: FundingProfile {
            retail_deposits: dec!(4000),
            corporate_deposits: dec!(1000),
            wholesale_funding: dec!(300),
            secured_funding: dec!(400),
            ..Default::default()
        },
        parameters: RegulatoryParameters::default(),
    };
    let r = calculate_lcr(&input).unwrap().result;

    // L1 400, L2A 170, L2B 450 capped at 570 * 2/3 = 380
    assert_eq!(r.hqla_breakdown.level1, dec!(400));
    assert_eq!(r.hqla_breakdown.level2a, dec!(170));
    assert_eq!(r.hqla_breakdown.level2b.round_dp(10), dec!(380));
    assert!(r.hqla_breakdown.level2b_cap_applied);
    // 200 + 250 + 300 + 100
    assert_eq!(r.gross_outflows, dec!(850));
    assert_eq!(r.net_outflows, dec!(850));
    assert_eq!(r.outflow_details.len(), 4);
    assert_eq!(r.status, ComplianceStatus::Compliant);
}

#[test]
fn test_requirement_equality_is_compliant() {
    let mut input = single_asset_input(HqlaLevel::HqlaL1, dec!(50));
    input.parameters = RegulatoryParameters::default().with_lcr_requirement(dec!(1.0));
    let r = calculate_lcr(&input).unwrap().result;
    assert_eq!(r.lcr_ratio, Some(dec!(1)));
    assert_eq!(r.status, ComplianceStatus::Compliant);
    assert_eq!(r.buffer_or_deficit, Decimal::ZERO);
}

#[test]
fn test_zero_outflows_degenerate() {
    let mut input = single_asset_input(HqlaLevel::HqlaL1, dec!(50));
    input.funding = FundingProfile::default();
    let output = calculate_lcr(&input).unwrap();
    assert_eq!(output.result.lcr_ratio, None);
    assert!(output.result.degenerate_denominator);
    assert_eq!(output.result.status, ComplianceStatus::Compliant);
    assert!(output.warnings.iter().any(|w| w.contains("LCR undefined")));
}

#[test]
fn test_inflows_capped_by_floor() {
    let mut input = single_asset_input(HqlaLevel::HqlaL1, dec!(100));
    input.funding.contractual_inflows = dec!(45);
    let r = calculate_lcr(&input).unwrap().result;
    // gross 50, inflows 45 -> floor 12.5
    assert_eq!(r.net_outflows, dec!(12.5));
    assert!(r.net_outflow_floor_applied);
    assert_eq!(r.lcr_ratio, Some(dec!(8)));
}

#[test]
fn test_negative_market_value_rejected() {
    let input = single_asset_input(HqlaLevel::HqlaL1, dec!(-1));
    match calculate_lcr(&input) {
        Err(RegStressError::InvalidInput { field, .. }) => {
            assert_eq!(field, "assets[0].market_value");
        }
        other => panic!("expected InvalidInput, got {:?}", other.map(|o| o.result)),
    }
}

#[test]
fn test_negative_requirement_rejected() {
    let mut input = single_asset_input(HqlaLevel::HqlaL1, dec!(100));
    input.parameters = RegulatoryParameters::default().with_lcr_requirement(dec!(-0.5));
    assert!(matches!(
        calculate_lcr(&input),
        Err(RegStressError::InvalidInput { .. })
    ));
}

#[test]
fn test_input_from_json_uses_default_parameters() {
    let json = r#"{
        "assets": [
            {"id": "ust", "asset_class": "SOVEREIGN", "market_value": "100",
             "liquidity_classification": "HQLA_L1"}
        ],
        "funding": {
            "retail_deposits": "1000",
            "corporate_deposits": "0",
            "wholesale_funding": "0",
            "secured_funding": "0"
        }
    }"#;
    let input: LcrInput = serde_json::from_str(json).unwrap();
    let r = calculate_lcr(&input).unwrap().result;
    assert_eq!(r.requirement, dec!(1.00));
    assert_eq!(r.lcr_ratio, Some(dec!(2)));
}

#[test]
fn test_vanishing_outflows_leave_ratio_undefined() {
    let input = LcrInput {
        assets: vec![PortfolioAsset::new("ust", AssetClass::Sovereign, dec!(100_000_000_000))
            .with_hqla(HqlaLevel::HqlaL1)],
        funding: retail_funding(dec!(0.00000000000000000001)),
        parameters: RegulatoryParameters::default(),
    };
    let output = calculate_lcr(&input).unwrap();
    let r = &output.result;

    assert_eq!(r.lcr_ratio, None);
    assert!(r.degenerate_denominator);
    assert_eq!(r.status, ComplianceStatus::Compliant);
    assert!(output.warnings.iter().any(|w| w.contains("LCR undefined")));
}

#[test]
fn test_oversized_amount_rejected() {
    let mut input = single_asset_input(HqlaLevel::HqlaL1, dec!(100));
    input.funding.retail_deposits = regstress_core::MAX_AMOUNT * dec!(10);
    assert!(matches!(
        calculate_lcr(&input),
        Err(RegStressError::InvalidInput { .. })
    ));
}
