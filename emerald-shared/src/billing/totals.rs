//! Invoice totals
//!
//! Amounts are whole rupiah held in `i64`, so sums are exact. Tax is a flat
//! 10% of the subtotal, rounded half-up to the nearest rupiah.
//!
//! ```text
//! line_total = quantity × unit_price
//! subtotal   = Σ line_total
//! tax        = round(subtotal × 10 / 100)
//! total      = subtotal + tax
//! ```
//!
//! # Example
//!
//! ```
//! use emerald_shared::billing::{compute_totals, LineAmount};
//!
//! let totals = compute_totals(&[
//!     LineAmount { quantity: 2, unit_price: 1_500_000 },
//!     LineAmount { quantity: 1, unit_price: 250_005 },
//! ])
//! .unwrap();
//!
//! assert_eq!(totals.subtotal, 3_250_005);
//! assert_eq!(totals.tax, 325_001);
//! assert_eq!(totals.total, 3_575_006);
//! ```

/// Flat tax rate, in percent
pub const TAX_RATE_PERCENT: i64 = 10;

/// Error type for totals computation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BillingError {
    /// Quantity below one
    #[error("Item {index}: quantity must be at least 1, got {quantity}")]
    InvalidQuantity { index: usize, quantity: i32 },

    /// Negative unit price
    #[error("Item {index}: unit price must not be negative, got {unit_price}")]
    NegativeUnitPrice { index: usize, unit_price: i64 },

    /// An amount does not fit in 64 bits
    #[error("Invoice amount is too large")]
    Overflow,
}

/// Quantity and unit price of one invoice line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmount {
    pub quantity: i32,
    pub unit_price: i64,
}

impl LineAmount {
    /// `quantity × unit_price`, checked for overflow
    pub fn total(&self) -> Result<i64, BillingError> {
        i64::from(self.quantity)
            .checked_mul(self.unit_price)
            .ok_or(BillingError::Overflow)
    }
}

/// Computed invoice amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub subtotal: i64,
    pub tax: i64,
    pub total: i64,
}

/// Tax on a non-negative subtotal, rounded half-up
pub fn tax_for(subtotal: i64) -> Result<i64, BillingError> {
    subtotal
        .checked_mul(TAX_RATE_PERCENT)
        .and_then(|scaled| scaled.checked_add(50))
        .map(|scaled| scaled / 100)
        .ok_or(BillingError::Overflow)
}

/// Validates every line and computes subtotal, tax and total
pub fn compute_totals(lines: &[LineAmount]) -> Result<InvoiceTotals, BillingError> {
    let mut subtotal: i64 = 0;

    for (index, line) in lines.iter().enumerate() {
        if line.quantity < 1 {
            return Err(BillingError::InvalidQuantity {
                index,
                quantity: line.quantity,
            });
        }
        if line.unit_price < 0 {
            return Err(BillingError::NegativeUnitPrice {
                index,
                unit_price: line.unit_price,
            });
        }

        subtotal = subtotal
            .checked_add(line.total()?)
            .ok_or(BillingError::Overflow)?;
    }

    let tax = tax_for(subtotal)?;
    let total = subtotal.checked_add(tax).ok_or(BillingError::Overflow)?;

    Ok(InvoiceTotals {
        subtotal,
        tax,
        total,
    })
}
