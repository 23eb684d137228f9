//! Borrower-side preconditions on the requested principal.
//!
//! These checks belong to whoever accepts the request (a CLI, an HTTP
//! handler). The calculator itself only insists on a positive principal.

use serde::{Deserialize, Serialize};

use crate::error::LoanQuoteError;
use crate::types::Principal;
use crate::LoanQuoteResult;

/// Smallest loan a borrower may request.
pub const MIN_PRINCIPAL: Principal = 1000;

/// Largest loan a borrower may request.
pub const MAX_PRINCIPAL: Principal = 15000;

/// Requested amounts must be whole multiples of this.
pub const PRINCIPAL_INCREMENT: Principal = 100;

/// Range and granularity a requested principal must respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrincipalPolicy {
    pub min: Principal,
    pub max: Principal,
    pub increment: Principal,
}

impl Default for PrincipalPolicy {
    fn default() -> Self {
        Self {
            min: MIN_PRINCIPAL,
            max: MAX_PRINCIPAL,
            increment: PRINCIPAL_INCREMENT,
        }
    }
}

impl PrincipalPolicy {
    pub fn new(min: Principal, max: Principal, increment: Principal) -> LoanQuoteResult<Self> {
        let policy = Self { min, max, increment };
        policy.check()?;
        Ok(policy)
    }

    /// Reject policies no principal could ever satisfy.
    pub fn check(&self) -> LoanQuoteResult<()> {
        if self.increment == 0 {
            return Err(LoanQuoteError::InvalidInput {
                field: "increment".into(),
                reason: "Principal increment must be positive".into(),
            });
        }
        if self.min == 0 {
            return Err(LoanQuoteError::InvalidInput {
                field: "min".into(),
                reason: "Minimum principal must be positive".into(),
            });
        }
        if self.min > self.max {
            return Err(LoanQuoteError::InvalidInput {
                field: "max".into(),
                reason: format!(
                    "Maximum principal {} is below minimum {}",
                    self.max, self.min
                ),
            });
        }
        Ok(())
    }

    /// Check a numeric principal against the range and increment.
    pub fn validate(&self, amount: Principal) -> LoanQuoteResult<Principal> {
        if amount < self.min || amount > self.max || amount % self.increment != 0 {
            return Err(LoanQuoteError::InvalidInput {
                field: "amount".into(),
                reason: format!(
                    "Loan amount must be any {} increment between {}-{} inclusive: {}",
                    self.increment, self.min, self.max, amount
                ),
            });
        }
        Ok(amount)
    }

    /// Parse a textual principal. Besides the numeric checks, the text must be
    /// a plain integer: no sign, no leading zeroes, no surrounding whitespace.
    /// Range and increment are reported ahead of sign and leading zeroes.
    pub fn parse(&self, text: &str) -> LoanQuoteResult<Principal> {
        let format_error = |reason: String| LoanQuoteError::InvalidInput {
            field: "amount".into(),
            reason,
        };

        let value: i64 = text
            .parse()
            .map_err(|_| format_error(format!("Invalid loan amount format, must be an integer: {text}")))?;

        let amount = Principal::try_from(value).map_err(|_| {
            format_error(format!(
                "Loan amount must be any {} increment between {}-{} inclusive: {}",
                self.increment, self.min, self.max, value
            ))
        })?;
        self.validate(amount)?;

        match text.as_bytes().first() {
            Some(b'+') => Err(format_error(format!(
                "Invalid loan amount format, must be an integer without leading plus: {text}"
            ))),
            Some(b'0') => Err(format_error(format!(
                "Invalid loan amount format, must be an integer without leading zeroes: {text}"
            ))),
            _ => Ok(amount),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
