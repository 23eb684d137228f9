use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanQuoteError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid market data: {0}")]
    InvalidMarketData(String),

    #[error("Insufficient capacity: requested {requested}, lenders can supply {available}")]
    InsufficientCapacity { requested: u64, available: u64 },

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (delta: {last_delta})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_delta: Decimal,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LoanQuoteError {
    /// True for failures caused by the request or the market data rather than
    /// a defect in the engine itself.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, LoanQuoteError::ConvergenceFailure { .. })
    }
}

impl From<serde_json::Error> for LoanQuoteError {
    fn from(e: serde_json::Error) -> Self {
        LoanQuoteError::SerializationError(e.to_string())
    }
}
