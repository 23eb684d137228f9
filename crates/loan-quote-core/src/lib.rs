pub mod allocation;
pub mod amortization;
pub mod error;
pub mod lender;
pub mod quote;
pub mod types;
pub mod validation;

pub use error::LoanQuoteError;
pub use lender::{build_catalog, Lender, LenderCatalog, LenderRecord};
pub use quote::{Quote, QuoteBreakdown, QuoteCalculator, REPAYMENT_MONTHS};
pub use types::*;
pub use validation::PrincipalPolicy;

/// Standard result type for all loan-quote operations
pub type LoanQuoteResult<T> = Result<T, LoanQuoteError>;
