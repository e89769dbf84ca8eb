//! Invoice billing helpers
//!
//! - [`totals`]: line totals, subtotal, tax and grand total in integer rupiah
//! - [`numbering`]: `INV-YYMM-NNNNN` invoice numbers scoped to a calendar month
//!
//! Both are pure; persistence of the per-month counter lives in
//! [`crate::models::invoice`].

pub mod numbering;
pub mod totals;

pub use numbering::{InvoiceNumber, InvoicePeriod};
pub use totals::{compute_totals, BillingError, InvoiceTotals, LineAmount};
