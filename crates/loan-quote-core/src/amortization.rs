//! Fixed-rate annuity maths: the monthly repayment implied by a rate, and the
//! rate implied by a monthly repayment.
//!
//! Nothing here rounds. Results carry full `Decimal` precision so that
//! per-lender figures can be summed before any currency rounding happens.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanQuoteError;
use crate::types::{Money, Rate};
use crate::LoanQuoteResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Initial upper end of the rate search (100% annual).
const INITIAL_ANNUAL_RATE_CEILING: Rate = dec!(1);

/// Bisection stops once the monthly-rate bracket is narrower than this.
const RATE_TOLERANCE: Decimal = dec!(0.000000000001);

/// Slack allowed when a repayment sits on the zero-rate floor, to absorb
/// last-digit differences from summing several exact divisions.
const FLOOR_TOLERANCE: Decimal = dec!(0.000000000000000001);

const MAX_BISECTION_ITERATIONS: u32 = 200;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Level monthly repayment that amortises `principal` over `term_months` at
/// `annual_rate` (a decimal fraction, 0.07 = 7%).
///
/// PMT = P * r * (1+r)^n / ((1+r)^n - 1), with r = annual_rate / 12. A zero
/// rate degenerates to P / n exactly.
pub fn monthly_repayment(principal: Money, annual_rate: Rate, term_months: u32) -> LoanQuoteResult<Money> {
    validate_term(term_months)?;
    if principal < Decimal::ZERO {
        return Err(LoanQuoteError::InvalidInput {
            field: "principal".into(),
            reason: "Principal cannot be negative".into(),
        });
    }
    if annual_rate < Decimal::ZERO {
        return Err(LoanQuoteError::InvalidInput {
            field: "annual_rate".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }

    annuity_payment(principal, annual_rate / MONTHS_PER_YEAR, term_months)
}

/// Annual rate (decimal fraction) at which `principal` amortised over
/// `term_months` costs `monthly_repayment` per month.
///
/// The annuity formula has no closed-form inverse, so the monthly rate is
/// found by bisection. The search starts on [0%, 100%] annual and doubles the
/// ceiling until the repayment lies below it. Repayment is strictly
/// increasing in rate, so any bracketed repayment converges.
///
/// A repayment below the interest-free one is not an annuity over this
/// principal and term, and is reported as
/// [`LoanQuoteError::ConvergenceFailure`]. A repayment so large that pricing
/// the ceiling leaves `Decimal` range fails with the same
/// [`LoanQuoteError::InvalidInput`] as [`monthly_repayment`] at that rate.
pub fn approximate_annual_rate(
    principal: Money,
    term_months: u32,
    monthly_repayment: Money,
) -> LoanQuoteResult<Rate> {
    validate_term(term_months)?;
    if principal <= Decimal::ZERO {
        return Err(LoanQuoteError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if monthly_repayment <= Decimal::ZERO {
        return Err(LoanQuoteError::InvalidInput {
            field: "monthly_repayment".into(),
            reason: "Monthly repayment must be positive".into(),
        });
    }

    let mut lo = Decimal::ZERO;
    let mut hi = INITIAL_ANNUAL_RATE_CEILING / MONTHS_PER_YEAR;

    let floor = annuity_payment(principal, lo, term_months)?;
    if monthly_repayment <= floor {
        if floor - monthly_repayment <= FLOOR_TOLERANCE {
            return Ok(Decimal::ZERO);
        }
        return Err(LoanQuoteError::ConvergenceFailure {
            function: "approximate_annual_rate".into(),
            iterations: 0,
            last_delta: floor - monthly_repayment,
        });
    }

    while annuity_payment(principal, hi, term_months)? < monthly_repayment {
        lo = hi;
        hi = hi.checked_mul(dec!(2)).ok_or_else(|| rate_out_of_range(hi, term_months))?;
    }

    for _ in 0..MAX_BISECTION_ITERATIONS {
        let mid = (lo + hi) / dec!(2);
        if annuity_payment(principal, mid, term_months)? < monthly_repayment {
            lo = mid;
        } else {
            hi = mid;
        }

        if hi - lo < RATE_TOLERANCE {
            return Ok((lo + hi) / dec!(2) * MONTHS_PER_YEAR);
        }
    }

    Err(LoanQuoteError::ConvergenceFailure {
        function: "approximate_annual_rate".into(),
        iterations: MAX_BISECTION_ITERATIONS,
        last_delta: hi - lo,
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_term(term_months: u32) -> LoanQuoteResult<()> {
    if term_months == 0 {
        return Err(LoanQuoteError::InvalidInput {
            field: "term_months".into(),
            reason: "Number of repayment months must be > 0".into(),
        });
    }
    Ok(())
}

fn annuity_payment(principal: Money, monthly_rate: Rate, term_months: u32) -> LoanQuoteResult<Money> {
    let n = Decimal::from(term_months);
    if monthly_rate.is_zero() {
        return Ok(principal / n);
    }

    // P * r / (1 - (1+r)^-n). The discount factor shrinks towards zero as the
    // rate grows, so only P * r itself can leave Decimal range.
    let discount = (Decimal::ONE / (Decimal::ONE + monthly_rate))
        .checked_powu(term_months as u64)
        .ok_or_else(|| rate_out_of_range(monthly_rate, term_months))?;
    let denom = Decimal::ONE - discount;
    // Rates below Decimal's resolution collapse the discount to exactly 1.
    if denom.is_zero() {
        return Ok(principal / n);
    }

    principal
        .checked_mul(monthly_rate)
        .map(|interest| interest / denom)
        .ok_or_else(|| rate_out_of_range(monthly_rate, term_months))
}

fn rate_out_of_range(monthly_rate: Rate, term_months: u32) -> LoanQuoteError {
    LoanQuoteError::InvalidInput {
        field: "annual_rate".into(),
        reason: format!(
            "Interest at {monthly_rate} monthly over {term_months} months exceeds decimal range"
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
