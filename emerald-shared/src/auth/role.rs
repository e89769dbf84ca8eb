//! Portal roles
//!
//! There is a single administrator, identified by the configured admin
//! email address. Everyone else is a customer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "customer" => Ok(Role::Customer),
            other => Err(format!("Invalid role: '{}'", other)),
        }
    }
}

/// Role of the holder of `email`
///
/// Admin only on exact, case-sensitive equality with `admin_email`. An
/// unset or empty admin address makes everybody a customer.
pub fn resolve_role(email: Option<&str>, admin_email: &str) -> Role {
    match email {
        Some(email) if !admin_email.is_empty() && email == admin_email => Role::Admin,
        _ => Role::Customer,
    }
}
