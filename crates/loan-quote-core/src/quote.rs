//! Quote calculator: funds a loan from the catalog, prices each tranche, and
//! turns the exact figures into presentable ones.
//!
//! Rounding policy. Exact arithmetic runs end to end; rounding happens once,
//! here, on the way out:
//!
//! * blended rate: one decimal place, half-up;
//! * monthly repayment: two decimal places, half-up, so the recurring figure
//!   is neither systematically over- nor under-charged;
//! * total repayment: two decimal places, always rounded up, so the lender is
//!   never left short.
//!
//! The two currency figures are therefore not expected to reconcile exactly
//! (`total != monthly * 36` in general). The difference is settled in a final
//! adjustment payment at the end of the term, which the quote carries only as
//! part of the total.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::allocation::{allocate, Allocation};
use crate::amortization::{approximate_annual_rate, monthly_repayment};
use crate::lender::{build_catalog, LenderCatalog, LenderRecord};
use crate::types::{with_metadata, ComputationOutput, Money, Principal, Rate};
use crate::LoanQuoteResult;

/// Total number of repayment months over the life of every quoted loan.
pub const REPAYMENT_MONTHS: u32 = 36;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Borrower-facing summary of a loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub requested_amount: Principal,
    /// Blended annual rate as a percentage, one decimal place (7.0 = 7%).
    pub rate: Decimal,
    /// Capital and interest due each month, to the penny.
    pub monthly_repayment: Money,
    /// Everything repaid over the term, to the penny, rounded in the
    /// lender's favour.
    pub total_repayment: Money,
}

/// One lender's share of a quoted loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrancheRepayment {
    pub lender: String,
    pub rate: Rate,
    pub amount: Principal,
    /// Unrounded monthly repayment owed to this lender.
    pub monthly_repayment: Money,
}

/// A quote together with the allocation and exact figures behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteBreakdown {
    pub quote: Quote,
    pub tranches: Vec<TrancheRepayment>,
    pub exact_monthly_repayment: Money,
    pub exact_total_repayment: Money,
    /// Unrounded blended annual rate as a decimal fraction.
    pub exact_rate: Rate,
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// Produces quotes on demand against a single market's lenders.
///
/// Holds no per-request state; share it freely between threads.
#[derive(Debug, Clone)]
pub struct QuoteCalculator {
    catalog: LenderCatalog,
}

impl QuoteCalculator {
    pub fn new(catalog: LenderCatalog) -> Self {
        Self { catalog }
    }

    /// Build the catalog from raw market records and wrap it.
    pub fn from_records<I>(records: I) -> LoanQuoteResult<Self>
    where
        I: IntoIterator<Item = LenderRecord>,
    {
        Ok(Self::new(build_catalog(records)?))
    }

    pub fn catalog(&self) -> &LenderCatalog {
        &self.catalog
    }

    pub fn quote(&self, principal: Principal) -> LoanQuoteResult<Quote> {
        quote(&self.catalog, principal)
    }

    /// Quote `principal` and report the allocation and pre-rounding figures
    /// behind it.
    pub fn explain(&self, principal: Principal) -> LoanQuoteResult<ComputationOutput<QuoteBreakdown>> {
        let start = Instant::now();
        let priced = price(&self.catalog, principal)?;

        let mut warnings = Vec::new();
        let adjustment = priced.quote.total_repayment
            - priced.quote.monthly_repayment * Decimal::from(REPAYMENT_MONTHS);
        if !adjustment.is_zero() {
            warnings.push(format!(
                "Final payment adjusted by {adjustment} to reconcile rounded monthly repayments with the total"
            ));
        }
        if priced.allocation.len() == self.catalog.len() {
            warnings.push("Loan draws on every lender in the market".into());
        }

        let breakdown = QuoteBreakdown {
            tranches: priced
                .allocation
                .iter()
                .zip(priced.contributions.iter())
                .map(|(tranche, monthly)| TrancheRepayment {
                    lender: tranche.lender.name().to_string(),
                    rate: tranche.lender.rate(),
                    amount: tranche.amount,
                    monthly_repayment: *monthly,
                })
                .collect(),
            exact_monthly_repayment: priced.exact_monthly,
            exact_total_repayment: priced.exact_total,
            exact_rate: priced.exact_rate,
            quote: priced.quote,
        };

        let elapsed = start.elapsed().as_micros() as u64;
        let assumptions = serde_json::json!({
            "repayment_months": REPAYMENT_MONTHS,
            "market_lenders": self.catalog.len(),
            "market_capacity": self.catalog.total_capacity(),
            "monthly_rounding": "half_up",
            "total_rounding": "up",
        });

        Ok(with_metadata(
            "Greedy lowest-rate allocation, fixed-rate amortisation, bisection blended rate",
            &assumptions,
            warnings,
            elapsed,
            breakdown,
        ))
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Quote `principal` against `catalog` using the cheapest lenders available.
pub fn quote(catalog: &LenderCatalog, principal: Principal) -> LoanQuoteResult<Quote> {
    Ok(price(catalog, principal)?.quote)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

struct Priced<'a> {
    allocation: Allocation<'a>,
    contributions: Vec<Money>,
    exact_monthly: Money,
    exact_total: Money,
    exact_rate: Rate,
    quote: Quote,
}

fn price(catalog: &LenderCatalog, principal: Principal) -> LoanQuoteResult<Priced<'_>> {
    let allocation = allocate(catalog, principal)?;

    let contributions = allocation
        .iter()
        .map(|t| monthly_repayment(Decimal::from(t.amount), t.lender.rate(), REPAYMENT_MONTHS))
        .collect::<LoanQuoteResult<Vec<_>>>()?;

    let exact_monthly: Money = contributions.iter().copied().sum();
    let exact_total = exact_monthly * Decimal::from(REPAYMENT_MONTHS);
    let exact_rate =
        approximate_annual_rate(Decimal::from(principal), REPAYMENT_MONTHS, exact_monthly)?;

    let quote = Quote {
        requested_amount: principal,
        rate: round_to(exact_rate * dec!(100), 1, RoundingStrategy::MidpointAwayFromZero),
        monthly_repayment: round_to(exact_monthly, 2, RoundingStrategy::MidpointAwayFromZero),
        total_repayment: round_to(exact_total, 2, RoundingStrategy::AwayFromZero),
    };

    debug!(
        principal,
        lenders = allocation.len(),
        rate = %quote.rate,
        monthly = %quote.monthly_repayment,
        total = %quote.total_repayment,
        "quote priced"
    );

    Ok(Priced {
        allocation,
        contributions,
        exact_monthly,
        exact_total,
        exact_rate,
        quote,
    })
}

/// Round to `dp` places and pin the scale there, so 1000 renders as 1000.00.
fn round_to(value: Decimal, dp: u32, strategy: RoundingStrategy) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, strategy);
    rounded.rescale(dp);
    rounded
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
