//! Lender records and the rate-ordered catalog the quote engine draws from.
//!
//! A [`LenderCatalog`] owns its lenders outright. It is sorted exactly once, at
//! construction, cheapest money first and, among equally cheap money, the
//! largest offer first. Nothing mutates it afterwards, so one catalog can be
//! shared across any number of concurrent quote requests.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LoanQuoteError;
use crate::types::{Principal, Rate};
use crate::LoanQuoteResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// One row of raw market data as supplied by a loading collaborator.
///
/// Field names follow the market file header `Lender,Rate,Available`; the
/// lower-case forms are accepted too so JSON payloads read naturally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LenderRecord {
    #[serde(rename = "Lender", alias = "lender", alias = "name")]
    pub name: String,
    /// Annual rate as a decimal fraction (0.075 = 7.5%).
    #[serde(rename = "Rate", alias = "rate")]
    pub rate: Decimal,
    /// Principal on offer. Signed so that bad data can be reported rather
    /// than failing to deserialize.
    #[serde(rename = "Available", alias = "available")]
    pub available: i64,
}

// ---------------------------------------------------------------------------
// Catalog types
// ---------------------------------------------------------------------------

/// A single source of capital. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Lender {
    name: String,
    rate: Rate,
    capacity: Principal,
}

impl Lender {
    pub fn new(name: impl Into<String>, rate: Rate, capacity: Principal) -> LoanQuoteResult<Self> {
        let name = name.into();
        if capacity == 0 {
            return Err(LoanQuoteError::InvalidMarketData(format!(
                "lender '{name}' offers no capacity"
            )));
        }
        if rate < Decimal::ZERO {
            return Err(LoanQuoteError::InvalidMarketData(format!(
                "lender '{name}' has a negative rate ({rate})"
            )));
        }
        Ok(Self {
            name,
            rate,
            capacity,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Annual rate as a decimal fraction.
    pub fn rate(&self) -> Rate {
        self.rate
    }

    pub fn capacity(&self) -> Principal {
        self.capacity
    }
}

/// Rate-ordered, non-empty set of lenders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LenderCatalog {
    lenders: Vec<Lender>,
    total_capacity: Principal,
}

impl LenderCatalog {
    /// Take ownership of `lenders` and order them for allocation.
    pub fn new(mut lenders: Vec<Lender>) -> LoanQuoteResult<Self> {
        if lenders.is_empty() {
            return Err(LoanQuoteError::InvalidMarketData(
                "market contains no lenders".into(),
            ));
        }

        // Stable, so fully tied lenders keep their market-file order.
        lenders.sort_by(|a, b| {
            a.rate
                .cmp(&b.rate)
                .then_with(|| b.capacity.cmp(&a.capacity))
        });

        let total_capacity = lenders
            .iter()
            .try_fold(0u64, |acc, l| acc.checked_add(l.capacity))
            .ok_or_else(|| {
                LoanQuoteError::InvalidMarketData("total market capacity overflows".into())
            })?;

        debug!(
            lenders = lenders.len(),
            total_capacity, "lender catalog built"
        );

        Ok(Self {
            lenders,
            total_capacity,
        })
    }

    /// Lenders in allocation order.
    pub fn lenders(&self) -> &[Lender] {
        &self.lenders
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Lender> {
        self.lenders.iter()
    }

    pub fn len(&self) -> usize {
        self.lenders.len()
    }

    /// Always false; an empty catalog cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.lenders.is_empty()
    }

    pub fn total_capacity(&self) -> Principal {
        self.total_capacity
    }

    /// The cheapest lender.
    pub fn cheapest(&self) -> &Lender {
        &self.lenders[0]
    }
}

impl<'a> IntoIterator for &'a LenderCatalog {
    type Item = &'a Lender;
    type IntoIter = std::slice::Iter<'a, Lender>;

    fn into_iter(self) -> Self::IntoIter {
        self.lenders.iter()
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Validate raw market records and build a sorted catalog from them.
///
/// Row numbers in error messages are 1-based and count data rows only.
pub fn build_catalog<I>(records: I) -> LoanQuoteResult<LenderCatalog>
where
    I: IntoIterator<Item = LenderRecord>,
{
    let lenders = records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| lender_from_record(idx + 1, record))
        .collect::<LoanQuoteResult<Vec<_>>>()?;

    LenderCatalog::new(lenders)
}

fn lender_from_record(row: usize, record: LenderRecord) -> LoanQuoteResult<Lender> {
    if record.available <= 0 {
        return Err(LoanQuoteError::InvalidMarketData(format!(
            "row {row} ({}): available amount must be positive, got {}",
            record.name, record.available
        )));
    }
    if record.rate < Decimal::ZERO {
        return Err(LoanQuoteError::InvalidMarketData(format!(
            "row {row} ({}): rate cannot be negative, got {}",
            record.name, record.rate
        )));
    }

    Lender::new(record.name, record.rate, record.available as Principal)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
