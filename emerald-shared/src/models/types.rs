//! Enumerated column types
//!
//! Each enum maps onto a PostgreSQL `ENUM` created by the schema migration
//! and serializes with the same spelling the database uses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string names no known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind}: '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! string_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Database / wire spelling
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// Product line a project or portfolio entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "product_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    /// Point of sale
    Pos,
    Erp,
    /// Food and beverage
    Fnb,
}

string_enum!(ProductType, "product type", {
    Pos => "pos",
    Erp => "erp",
    Fnb => "fnb",
});

/// Lifecycle of a customer project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Planning,
    InProgress,
    Completed,
    OnHold,
}

string_enum!(ProjectStatus, "project status", {
    Planning => "planning",
    InProgress => "in-progress",
    Completed => "completed",
    OnHold => "on-hold",
});

impl ProjectStatus {
    /// Counted as active on the dashboard
    pub const ACTIVE: [ProjectStatus; 2] = [ProjectStatus::Planning, ProjectStatus::InProgress];
}

/// Lifecycle of a project module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "module_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ModuleStatus {
    Pending,
    InProgress,
    Completed,
}

string_enum!(ModuleStatus, "module status", {
    Pending => "pending",
    InProgress => "in-progress",
    Completed => "completed",
});

/// Invoice state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invoice_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

string_enum!(InvoiceStatus, "invoice status", {
    Draft => "draft",
    Pending => "pending",
    Paid => "paid",
    Overdue => "overdue",
    Cancelled => "cancelled",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case_statuses() {
        assert_eq!(ProjectStatus::InProgress.as_str(), "in-progress");
        assert_eq!(ProjectStatus::OnHold.to_string(), "on-hold");
        assert_eq!(
            serde_json::to_string(&ModuleStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::from_str::<ProjectStatus>("\"on-hold\"").unwrap(),
            ProjectStatus::OnHold
        );
    }

    #[test]
    fn test_from_str_matches_serde() {
        for kind in [ProductType::Pos, ProductType::Erp, ProductType::Fnb] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json.trim_matches('"'), kind.as_str());
            assert_eq!(kind.as_str().parse::<ProductType>().unwrap(), kind);
        }

        for status in [
            InvoiceStatus::Draft,
            InvoiceStatus::Pending,
            InvoiceStatus::Paid,
            InvoiceStatus::Overdue,
            InvoiceStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<InvoiceStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_value_is_rejected() {
        let err = "crm".parse::<ProductType>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid product type: 'crm'");

        // Spelling is exact
        assert!("POS".parse::<ProductType>().is_err());
        assert!("in_progress".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn test_active_project_statuses() {
        assert!(!ProjectStatus::ACTIVE.contains(&ProjectStatus::Completed));
        assert!(!ProjectStatus::ACTIVE.contains(&ProjectStatus::OnHold));

        let active: Vec<&str> = ProjectStatus::ACTIVE.iter().map(|s| s.as_str()).collect();
        assert_eq!(active, ["planning", "in-progress"]);
    }
}
