//! Greedy partition of a requested principal across a rate-ordered catalog.
//!
//! Lenders are drained in catalog order: every lender is used in full until
//! one can cover what is left, and that lender supplies exactly the remainder.
//! This is optimal for the blended rate only because repayment cost is
//! separable per lender and monotonic in the amount borrowed at each rate.
//! It is not a global combinatorial search: a slightly-too-small cheap lender
//! is always used in preference to an expensive lender that would fit the
//! whole loan on its own.

use serde::Serialize;
use tracing::debug;

use crate::error::LoanQuoteError;
use crate::lender::{Lender, LenderCatalog};
use crate::types::Principal;
use crate::LoanQuoteResult;

/// Principal drawn from one lender.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tranche<'a> {
    pub lender: &'a Lender,
    pub amount: Principal,
}

/// How a loan is funded. Amounts are positive, within each lender's
/// capacity, and sum to the requested principal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation<'a> {
    tranches: Vec<Tranche<'a>>,
}

impl<'a> Allocation<'a> {
    /// Tranches in catalog (cheapest first) order.
    pub fn tranches(&self) -> &[Tranche<'a>] {
        &self.tranches
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tranche<'a>> {
        self.tranches.iter()
    }

    pub fn len(&self) -> usize {
        self.tranches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tranches.is_empty()
    }

    pub fn total(&self) -> Principal {
        self.tranches.iter().map(|t| t.amount).sum()
    }
}

/// Fund `principal` from the cheapest lenders in `catalog`.
///
/// Fails with [`LoanQuoteError::InsufficientCapacity`] when the whole catalog
/// cannot cover the request; no partial allocation is returned.
pub fn allocate(catalog: &LenderCatalog, principal: Principal) -> LoanQuoteResult<Allocation<'_>> {
    if principal == 0 {
        return Err(LoanQuoteError::InvalidInput {
            field: "principal".into(),
            reason: "Requested principal must be positive".into(),
        });
    }

    let mut tranches = Vec::new();
    let mut remaining = principal;

    for lender in catalog {
        if lender.capacity() >= remaining {
            tranches.push(Tranche {
                lender,
                amount: remaining,
            });
            debug!(
                principal,
                lenders = tranches.len(),
                "allocation complete"
            );
            return Ok(Allocation { tranches });
        }

        tranches.push(Tranche {
            lender,
            amount: lender.capacity(),
        });
        remaining -= lender.capacity();
    }

    debug!(
        principal,
        available = catalog.total_capacity(),
        "insufficient lender capacity"
    );
    Err(LoanQuoteError::InsufficientCapacity {
        requested: principal,
        available: catalog.total_capacity(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
