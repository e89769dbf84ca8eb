//! Invoice numbering
//!
//! Invoice numbers have the form `INV-YYMM-NNNNN`: the two-digit year and
//! month of issue, then a zero-padded sequence that restarts every month.
//!
//! ```text
//! INV-2603-00001   first invoice of March 2026
//! INV-2603-00002   second invoice of March 2026
//! INV-2604-00001   first invoice of April 2026
//! ```
//!
//! The sequence itself is allocated by the database (see
//! [`crate::models::invoice::Invoice::create`]); this module only deals with
//! periods and formatting.

use chrono::{Datelike, NaiveDate, Utc};
use std::fmt;

/// Prefix shared by all invoice numbers
pub const INVOICE_PREFIX: &str = "INV";

/// Calendar month an invoice number is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvoicePeriod {
    year: i32,
    month: u32,
}

impl InvoicePeriod {
    /// Period containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Period containing today's date (UTC)
    pub fn current() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    /// Four-character `YYMM` code, e.g. `2603`
    pub fn code(&self) -> String {
        format!("{:02}{:02}", self.year.rem_euclid(100), self.month)
    }

    /// SQL `LIKE` pattern matching every invoice number of this period
    pub fn like_pattern(&self) -> String {
        format!("{}-{}-%", INVOICE_PREFIX, self.code())
    }
}

/// A formatted invoice number
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
    /// Formats the number for a period and a 1-based sequence value
    pub fn new(period: InvoicePeriod, sequence: u32) -> Self {
        Self(format!("{}-{}-{:05}", INVOICE_PREFIX, period.code(), sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn march_2026() -> InvoicePeriod {
        InvoicePeriod::from_date(NaiveDate::from_ymd_opt(2026, 3, 17).unwrap())
    }

    #[test]
    fn test_period_code() {
        assert_eq!(march_2026().code(), "2603");

        let december_1999 =
            InvoicePeriod::from_date(NaiveDate::from_ymd_opt(1999, 12, 31).unwrap());
        assert_eq!(december_1999.code(), "9912");

        let january_2100 = InvoicePeriod::from_date(NaiveDate::from_ymd_opt(2100, 1, 1).unwrap());
        assert_eq!(january_2100.code(), "0001");
    }

    #[test]
    fn test_like_pattern() {
        assert_eq!(march_2026().like_pattern(), "INV-2603-%");
    }

    #[test]
    fn test_sequential_numbers_within_month() {
        let period = march_2026();
        assert_eq!(InvoiceNumber::new(period, 1).as_str(), "INV-2603-00001");
        assert_eq!(InvoiceNumber::new(period, 2).as_str(), "INV-2603-00002");

        // Zero padding keeps lexical order equal to numeric order
        let numbers: Vec<String> = (1..=120)
            .map(|seq| InvoiceNumber::new(period, seq).into_string())
            .collect();
        assert!(numbers.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_sequence_wider_than_padding() {
        assert_eq!(
            InvoiceNumber::new(march_2026(), 123_456).to_string(),
            "INV-2603-123456"
        );
    }

    #[test]
    fn test_periods_differ_by_month() {
        let april = InvoicePeriod::from_date(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
        assert_ne!(march_2026(), april);
        assert_eq!(InvoiceNumber::new(april, 1).as_str(), "INV-2604-00001");
    }
}
