//! Tests for Enforcer::enforce_constraints check order and adjustments.

use nanoscore::{ActionCandidate, Side};
use nanoscore_constraints::checks::round_to_lot_size;
use nanoscore_constraints::{
    Enforcer, FilterReason, OpportunityContext, PlannerConfiguration, Position, Security,
    SecurityCatalog,
};
use proptest::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn byd() -> Security {
    Security::new("KYG1170T1067", "BYD.285.AS")
        .with_name("BYD Company")
        .with_min_lot(500)
}

fn test_us() -> Security {
    Security::new("US1234567890", "TEST.US").with_name("Test Security")
}

fn enforcer(securities: Vec<Security>) -> Enforcer<SecurityCatalog> {
    init_logging();
    Enforcer::new(securities.into_iter().collect())
}

fn sell(security: &Security, qty: i64, price: f64) -> ActionCandidate {
    ActionCandidate::new(Side::Sell, &security.isin, &security.symbol, qty, price)
        .with_reason("Overweight")
}

fn buy(security: &Security, qty: i64, price: f64) -> ActionCandidate {
    ActionCandidate::new(Side::Buy, &security.isin, &security.symbol, qty, price)
        .with_reason("Underweight")
}

fn ctx() -> OpportunityContext {
    OpportunityContext::new(10_000.0)
}

fn cfg() -> PlannerConfiguration {
    PlannerConfiguration::default()
}

// ============================================================================
// Per-security flags
// ============================================================================

#[test]
fn allow_sell_false_filters() {
    let e = enforcer(vec![byd().with_allow_sell(false)]);
    let (validated, filtered) = e.enforce_constraints(&[sell(&byd(), 13, 36.0)], &ctx(), &cfg());
    assert!(validated.is_empty());
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].reason.to_string(), "allow_sell=false");
    assert_eq!(filtered[0].action.symbol, "BYD.285.AS");
}

#[test]
fn allow_buy_false_filters() {
    let e = enforcer(vec![test_us().with_allow_buy(false)]);
    let (validated, filtered) = e.enforce_constraints(&[buy(&test_us(), 10, 10.0)], &ctx(), &cfg());
    assert!(validated.is_empty());
    assert_eq!(filtered[0].reason.to_string(), "allow_buy=false");
}

#[test]
fn catalog_entry_without_flags_is_tradeable() {
    init_logging();
    let security: Security = toml::from_str(
        r#"
        isin = "US1"
        symbol = "A"
        min_lot = 1
        "#,
    )
    .unwrap();
    let e = Enforcer::new(SecurityCatalog::from_iter([security.clone()]));
    let (validated, filtered) = e.enforce_constraints(
        &[buy(&security, 5, 20.0), sell(&security, 5, 20.0)],
        &ctx(),
        &cfg(),
    );
    assert!(filtered.is_empty(), "filtered: {filtered:?}");
    assert_eq!(validated.len(), 2);
}

#[test]
fn missing_security_filters() {
    let e = enforcer(vec![]);
    let unknown = Security::new("US0000000000", "UNKNOWN.US");
    let (validated, filtered) = e.enforce_constraints(&[sell(&unknown, 10, 10.0)], &ctx(), &cfg());
    assert!(validated.is_empty());
    assert_eq!(filtered[0].reason, FilterReason::SecurityNotFound);
}

#[test]
fn multiple_actions_split() {
    let valid = Security::new("US9876543210", "VALID.US");
    let e = enforcer(vec![byd().with_allow_sell(false), valid.clone()]);
    let actions = [sell(&byd(), 13, 36.0), buy(&valid, 10, 50.0)];
    let (validated, filtered) = e.enforce_constraints(&actions, &ctx(), &cfg());
    assert_eq!(validated.len(), 1);
    assert_eq!(filtered.len(), 1);
    assert_eq!(validated[0].symbol, "VALID.US");
    assert_eq!(filtered[0].action.symbol, "BYD.285.AS");
    assert_eq!(filtered[0].reason, FilterReason::SellNotAllowed);
}

// ============================================================================
// Check order: first failure wins
// ============================================================================

#[test]
fn missing_isin_comes_first() {
    let e = enforcer(vec![test_us()]);
    let ctx = ctx().with_allow_sell(false);
    let action = ActionCandidate::new(Side::Sell, "", "TEST.US", 10, 10.0);
    let (_, filtered) = e.enforce_constraints(&[action], &ctx, &cfg());
    assert_eq!(filtered[0].reason.to_string(), "missing ISIN");
}

#[test]
fn global_switch_before_cooloff() {
    let e = enforcer(vec![test_us()]);
    let ctx = ctx()
        .with_allow_sell(false)
        .with_recently_sold("US1234567890");
    let (_, filtered) = e.enforce_constraints(&[sell(&test_us(), 10, 10.0)], &ctx, &cfg());
    assert_eq!(filtered[0].reason.to_string(), "allow_sell=false (global)");

    let ctx = OpportunityContext::new(0.0).with_allow_buy(false);
    let (_, filtered) = e.enforce_constraints(&[buy(&test_us(), 10, 10.0)], &ctx, &cfg());
    assert_eq!(filtered[0].reason.to_string(), "allow_buy=false (global)");
}

#[test]
fn cooloff_before_eligibility() {
    let e = enforcer(vec![test_us()]);
    let ctx = ctx()
        .with_recently_bought("US1234567890")
        .with_ineligible("US1234567890");
    let (_, filtered) = e.enforce_constraints(&[buy(&test_us(), 10, 10.0)], &ctx, &cfg());
    assert_eq!(filtered[0].reason, FilterReason::RecentlyBought);

    // The sell side ignores the buy cooloff but still hits eligibility
    let (_, filtered) = e.enforce_constraints(&[sell(&test_us(), 10, 10.0)], &ctx, &cfg());
    assert_eq!(filtered[0].reason, FilterReason::Ineligible);
}

#[test]
fn eligibility_before_lookup() {
    let e = enforcer(vec![]);
    let ctx = ctx().with_ineligible("US1234567890");
    let (_, filtered) = e.enforce_constraints(&[buy(&test_us(), 10, 10.0)], &ctx, &cfg());
    assert_eq!(filtered[0].reason, FilterReason::Ineligible);
}

#[test]
fn is_feasible_matches_reasons() {
    let e = enforcer(vec![test_us().with_allow_buy(false)]);
    assert_eq!(
        e.is_feasible(&buy(&test_us(), 10, 10.0), &ctx()),
        Err(FilterReason::BuyNotAllowed)
    );
    assert_eq!(e.is_feasible(&sell(&test_us(), 10, 10.0), &ctx()), Ok(()));
}

// ============================================================================
// Lot-size rounding
// ============================================================================

#[test]
fn lot_rounding_down() {
    let sec = test_us().with_min_lot(500);
    let e = enforcer(vec![sec.clone()]);
    let (validated, filtered) = e.enforce_constraints(&[sell(&sec, 1200, 10.0)], &ctx(), &cfg());
    assert!(filtered.is_empty());
    assert_eq!(validated[0].quantity, 1000);
    assert_eq!(validated[0].value_eur, 10_000.0);
}

#[test]
fn lot_rounding_up_recomputes_value() {
    let e = enforcer(vec![byd()]);
    let (validated, filtered) = e.enforce_constraints(&[sell(&byd(), 13, 36.0)], &ctx(), &cfg());
    assert!(filtered.is_empty());
    assert_eq!(validated[0].quantity, 500);
    assert_eq!(validated[0].value_eur, 18_000.0);
}

#[test]
fn lot_exact_and_multiple_unchanged() {
    let sec = test_us().with_min_lot(500);
    let e = enforcer(vec![sec.clone()]);
    let actions = [sell(&sec, 500, 10.0), sell(&sec, 1500, 10.0)];
    let (validated, _) = e.enforce_constraints(&actions, &ctx(), &cfg());
    assert_eq!(validated[0].quantity, 500);
    assert_eq!(validated[0].value_eur, 5_000.0);
    assert_eq!(validated[1].quantity, 1500);
    assert_eq!(validated[1].value_eur, 15_000.0);
}

#[test]
fn zero_lot_size_leaves_quantity() {
    let e = enforcer(vec![test_us()]);
    let (validated, _) = e.enforce_constraints(&[sell(&test_us(), 13, 10.0)], &ctx(), &cfg());
    assert_eq!(validated[0].quantity, 13);
}

#[test]
fn zero_quantity_below_lot_filters() {
    let e = enforcer(vec![byd()]);
    let (validated, filtered) = e.enforce_constraints(&[buy(&byd(), 0, 36.0)], &ctx(), &cfg());
    assert!(validated.is_empty());
    assert_eq!(
        filtered[0].reason.to_string(),
        "quantity below minimum lot size"
    );
}

#[test]
fn rounding_with_bad_price_filters() {
    let e = enforcer(vec![byd()]);
    let (_, filtered) = e.enforce_constraints(&[buy(&byd(), 13, 0.0)], &ctx(), &cfg());
    assert_eq!(filtered[0].reason.to_string(), "invalid price");
}

// ============================================================================
// Max sell percentage
// ============================================================================

fn ppa() -> Security {
    Security::new("GR1234567890", "PPA.GR")
        .with_name("PPA Security")
        .with_min_lot(1)
}

fn ppa_ctx() -> OpportunityContext {
    ctx().with_position(Position::new("GR1234567890", "PPA.GR", 888.8))
}

fn cap(pct: f64) -> PlannerConfiguration {
    PlannerConfiguration {
        max_sell_percentage: pct,
        ..PlannerConfiguration::default()
    }
}

#[test]
fn max_sell_percentage_clamps() {
    let e = enforcer(vec![ppa()]);
    // floor(888.8 * 0.28) = 248
    for (requested, expected) in [(441, 248), (248, 248), (100, 100), (500, 248)] {
        let (validated, filtered) =
            e.enforce_constraints(&[sell(&ppa(), requested, 10.0)], &ppa_ctx(), &cap(0.28));
        assert!(filtered.is_empty(), "requested {requested}");
        assert_eq!(validated[0].quantity, expected, "requested {requested}");
        assert_eq!(validated[0].value_eur, expected as f64 * 10.0);
    }
}

#[test]
fn max_sell_percentage_ignores_buys() {
    let e = enforcer(vec![test_us().with_min_lot(1)]);
    let (validated, filtered) = e.enforce_constraints(&[buy(&test_us(), 1000, 10.0)], &ctx(), &cap(0.28));
    assert!(filtered.is_empty());
    assert_eq!(validated[0].quantity, 1000);
}

#[test]
fn max_sell_percentage_without_position() {
    let e = enforcer(vec![test_us().with_min_lot(1)]);
    let (validated, filtered) =
        e.enforce_constraints(&[sell(&test_us(), 100, 10.0)], &ctx(), &cap(0.28));
    assert!(validated.is_empty());
    assert_eq!(filtered[0].reason.to_string(), "no position found");
}

#[test]
fn disabled_cap_does_not_need_position() {
    let e = enforcer(vec![test_us()]);
    for pct in [0.0, 1.0] {
        let (validated, _) = e.enforce_constraints(&[sell(&test_us(), 100, 10.0)], &ctx(), &cap(pct));
        assert_eq!(validated[0].quantity, 100);
    }
}

#[test]
fn lot_round_up_can_exceed_cap() {
    // Cap leaves floor(888.8 * 0.28) = 248 shares; a 500-share lot rounds back up.
    let e = enforcer(vec![ppa().with_min_lot(500)]);
    let (validated, _) = e.enforce_constraints(&[sell(&ppa(), 441, 10.0)], &ppa_ctx(), &cap(0.28));
    assert_eq!(validated[0].quantity, 500);
}

// ============================================================================
// Properties
// ============================================================================

fn arb_action() -> impl Strategy<Value = ActionCandidate> {
    (
        prop::bool::ANY,
        prop::sample::select(vec!["KYG1170T1067", "US1234567890", "GR1234567890", "", "XX0"]),
        -10i64..5_000,
        prop::sample::select(vec![-1.0, 0.0, 10.0, 36.0]),
    )
        .prop_map(|(is_buy, isin, qty, price)| {
            let side = if is_buy { Side::Buy } else { Side::Sell };
            ActionCandidate::new(side, isin, isin, qty, price)
        })
}

proptest! {
    #[test]
    fn every_action_lands_in_exactly_one_output(
        actions in prop::collection::vec(arb_action(), 0..30),
        pct in prop::sample::select(vec![0.0, 0.28, 0.5, 1.0]),
        allow_buy in prop::bool::ANY,
        allow_sell in prop::bool::ANY,
    ) {
        let e = Enforcer::new(
            [byd(), test_us().with_allow_buy(false), ppa()]
                .into_iter()
                .collect::<SecurityCatalog>(),
        );
        let ctx = ppa_ctx()
            .with_allow_buy(allow_buy)
            .with_allow_sell(allow_sell)
            .with_recently_sold("US1234567890");
        let (validated, filtered) = e.enforce_constraints(&actions, &ctx, &cap(pct));
        prop_assert_eq!(validated.len() + filtered.len(), actions.len());
        for v in &validated {
            prop_assert!((v.value_eur - v.quantity as f64 * v.price).abs() < 1e-9);
        }
    }

    #[test]
    fn aligned_quantities_are_fixed_points(k in 1i64..10_000, lot in 1i64..1_000) {
        prop_assert_eq!(round_to_lot_size(k * lot, lot), Some(k * lot));
    }

    #[test]
    fn non_positive_lot_is_identity(q in any::<i64>(), lot in -100i64..=0) {
        prop_assert_eq!(round_to_lot_size(q, lot), Some(q));
    }

    #[test]
    fn below_one_lot_rounds_up(lot in 2i64..10_000, frac in 0.0f64..1.0) {
        let q = ((lot as f64 * frac) as i64).clamp(1, lot - 1);
        prop_assert_eq!(round_to_lot_size(q, lot), Some(lot));
    }

    #[test]
    fn rounded_quantity_is_a_multiple(q in 1i64..1_000_000, lot in 1i64..1_000) {
        let r = round_to_lot_size(q, lot).unwrap();
        prop_assert_eq!(r % lot, 0);
        prop_assert!(r >= lot);
    }
}
