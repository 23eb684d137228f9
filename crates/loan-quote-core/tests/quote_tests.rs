use loan_quote_core::allocation::allocate;
use loan_quote_core::amortization::{approximate_annual_rate, monthly_repayment};
use loan_quote_core::quote::{self, REPAYMENT_MONTHS};
use loan_quote_core::{build_catalog, LenderRecord, LoanQuoteError, PrincipalPolicy, Quote, QuoteCalculator};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::thread;

// ===========================================================================
// Fixtures
// ===========================================================================

fn record(name: &str, rate: Decimal, available: i64) -> LenderRecord {
    LenderRecord {
        name: name.into(),
        rate,
        available,
    }
}

/// Seven-lender market used throughout.
fn sample_market() -> Vec<LenderRecord> {
    vec![
        record("Bob", dec!(0.075), 640),
        record("Jane", dec!(0.069), 480),
        record("Fred", dec!(0.071), 520),
        record("Mary", dec!(0.104), 170),
        record("John", dec!(0.081), 320),
        record("Dave", dec!(0.074), 140),
        record("Angela", dec!(0.071), 60),
    ]
}

// ===========================================================================
// End-to-end quotes
// ===========================================================================

#[test]
fn test_three_lender_scenario() {
    let calc = QuoteCalculator::from_records(vec![
        record("A", dec!(0.07), 500),
        record("B", dec!(0.09), 400),
        record("C", dec!(0.05), 300),
    ])
    .unwrap();

    let sorted: Vec<(&str, u64)> = calc
        .catalog()
        .iter()
        .map(|l| (l.name(), l.capacity()))
        .collect();
    assert_eq!(sorted, vec![("C", 300), ("A", 500), ("B", 400)]);

    let q = calc.quote(1000).unwrap();
    assert_eq!(
        q,
        Quote {
            requested_amount: 1000,
            rate: dec!(6.8),
            monthly_repayment: dec!(30.79),
            total_repayment: dec!(1108.44),
        }
    );
}

#[test]
fn test_sample_market_thousand() {
    // Allocation: Jane 480 @ 6.9%, Fred 520 @ 7.1%.
    let calc = QuoteCalculator::from_records(sample_market()).unwrap();
    let q = calc.quote(1000).unwrap();

    let expected_monthly = monthly_repayment(dec!(480), dec!(0.069), 36).unwrap()
        + monthly_repayment(dec!(520), dec!(0.071), 36).unwrap();
    assert_eq!(
        q.monthly_repayment,
        expected_monthly.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
    );
    assert_eq!(q.rate, dec!(7.0));
    assert_eq!(q.monthly_repayment, dec!(30.88));
    assert_eq!(q.total_repayment, dec!(1111.65));
}

#[test]
fn test_principal_equal_to_cheapest_capacity() {
    let calc = QuoteCalculator::from_records(sample_market()).unwrap();
    let q = calc.quote(480).unwrap();
    assert_eq!(q.rate, dec!(6.9));

    let out = calc.explain(480).unwrap();
    assert_eq!(out.result.tranches.len(), 1);
    assert_eq!(out.result.tranches[0].lender, "Jane");
}

#[test]
fn test_insufficient_capacity_scenario() {
    let catalog = build_catalog(vec![
        record("A", dec!(0.07), 500),
        record("B", dec!(0.09), 300),
        record("C", dec!(0.05), 100),
    ])
    .unwrap();
    assert_eq!(catalog.total_capacity(), 900);

    let err = quote::quote(&catalog, 1000).unwrap_err();
    match err {
        LoanQuoteError::InsufficientCapacity { requested, available } => {
            assert_eq!(requested, 1000);
            assert_eq!(available, 900);
        }
        other => panic!("Expected InsufficientCapacity, got {other:?}"),
    }
    assert!(allocate(&catalog, 1000).is_err());
}

#[test]
fn test_quote_is_deterministic() {
    let calc = QuoteCalculator::from_records(sample_market()).unwrap();
    assert_eq!(calc.quote(1700).unwrap(), calc.quote(1700).unwrap());
}

// ===========================================================================
// Properties over a grid of principals
// ===========================================================================

#[test]
fn test_total_never_below_exact_total() {
    let calc = QuoteCalculator::from_records(sample_market()).unwrap();
    for principal in (100..=2300).step_by(100) {
        let out = calc.explain(principal).unwrap();
        let b = &out.result;
        assert!(
            b.quote.total_repayment >= b.exact_monthly_repayment * Decimal::from(REPAYMENT_MONTHS),
            "lender shortchanged at {principal}"
        );
        assert!(b.quote.total_repayment - b.exact_total_repayment < dec!(0.01));
    }
}

#[test]
fn test_blended_rate_within_lender_range() {
    let calc = QuoteCalculator::from_records(sample_market()).unwrap();
    for principal in (100..=2300).step_by(100) {
        let q = calc.quote(principal).unwrap();
        assert!(q.rate >= dec!(6.9) && q.rate <= dec!(10.4), "{principal}: {}", q.rate);
    }
}

#[test]
fn test_blended_rate_non_decreasing_in_principal() {
    let calc = QuoteCalculator::from_records(sample_market()).unwrap();
    let mut previous = Decimal::ZERO;
    for principal in (100..=2300).step_by(100) {
        let exact = calc.explain(principal).unwrap().result.exact_rate;
        assert!(exact + dec!(0.0000000001) >= previous);
        previous = exact;
    }
}

#[test]
fn test_allocation_invariants() {
    let catalog = build_catalog(sample_market()).unwrap();
    for principal in 1..=catalog.total_capacity() {
        let allocation = allocate(&catalog, principal).unwrap();
        assert_eq!(allocation.total(), principal);
        assert!(allocation
            .iter()
            .all(|t| t.amount > 0 && t.amount <= t.lender.capacity()));
    }
}

#[test]
fn test_rate_round_trip_law() {
    let mut rate = dec!(0.001);
    while rate < dec!(0.95) {
        let pmt = monthly_repayment(dec!(15000), rate, REPAYMENT_MONTHS).unwrap();
        let recovered = approximate_annual_rate(dec!(15000), REPAYMENT_MONTHS, pmt).unwrap();
        assert!(
            (recovered - rate).abs() < dec!(0.000000001),
            "rate {rate} recovered as {recovered}"
        );
        rate += dec!(0.0237);
    }
}

// ===========================================================================
// Boundary validation feeding the calculator
// ===========================================================================

#[test]
fn test_policy_then_quote() {
    let calc = QuoteCalculator::from_records(vec![record("deep", dec!(0.06), 20_000)]).unwrap();
    let policy = PrincipalPolicy::default();

    let principal = policy.parse("15000").unwrap();
    assert_eq!(calc.quote(principal).unwrap().rate, dec!(6.0));

    assert!(matches!(
        policy.parse("15100"),
        Err(LoanQuoteError::InvalidInput { .. })
    ));
}

// ===========================================================================
// Concurrency
// ===========================================================================

#[test]
fn test_shared_calculator_across_threads() {
    let calc = Arc::new(QuoteCalculator::from_records(sample_market()).unwrap());
    let expected = calc.quote(1500).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let calc = Arc::clone(&calc);
            thread::spawn(move || calc.quote(1500).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
    assert_eq!(calc.catalog().cheapest().name(), "Jane");
}
