//! Page access guard
//!
//! Decides whether a portal page may render for the current session.
//!
//! ```text
//! Uninitialized ──► Loading                       (session not resolved yet)
//! Unauthenticated ─► Redirect /login
//! Authenticated(r), page needs q, r ≠ q
//!     q = admin ──► Redirect /dashboard
//!     otherwise ──► Redirect /login
//! anything else ──► Render
//! ```

use serde::{Deserialize, Serialize};

use super::jwt::AuthUser;
use super::role::Role;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Session as seen by the guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// The session lookup has not finished
    Uninitialized,
    Unauthenticated,
    Authenticated(Role),
}

impl SessionState {
    pub fn from_user(user: Option<&AuthUser>) -> Self {
        match user {
            Some(user) => SessionState::Authenticated(user.role),
            None => SessionState::Unauthenticated,
        }
    }
}

/// What the page should do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum GuardDecision {
    /// Show a loading state, do not navigate
    Loading,
    Redirect { location: String },
    Render,
}

impl GuardDecision {
    fn redirect(location: &str) -> Self {
        GuardDecision::Redirect {
            location: location.to_string(),
        }
    }
}

/// Guard for one page, optionally restricted to a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessGuard {
    required_role: Option<Role>,
}

impl AccessGuard {
    pub fn new(required_role: Option<Role>) -> Self {
        Self { required_role }
    }

    /// Any signed-in user
    pub fn authenticated() -> Self {
        Self::new(None)
    }

    pub fn admin_only() -> Self {
        Self::new(Some(Role::Admin))
    }

    pub fn decide(&self, session: &SessionState) -> GuardDecision {
        match session {
            SessionState::Uninitialized => GuardDecision::Loading,
            SessionState::Unauthenticated => GuardDecision::redirect(LOGIN_PATH),
            SessionState::Authenticated(role) => match self.required_role {
                Some(required) if required != *role => match required {
                    Role::Admin => GuardDecision::redirect(DASHBOARD_PATH),
                    Role::Customer => GuardDecision::redirect(LOGIN_PATH),
                },
                _ => GuardDecision::Render,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialized_waits() {
        for guard in [AccessGuard::authenticated(), AccessGuard::admin_only()] {
            assert_eq!(guard.decide(&SessionState::Uninitialized), GuardDecision::Loading);
        }
    }

    #[test]
    fn test_anonymous_goes_to_login() {
        assert_eq!(
            AccessGuard::authenticated().decide(&SessionState::Unauthenticated),
            GuardDecision::redirect("/login")
        );
        assert_eq!(
            AccessGuard::admin_only().decide(&SessionState::Unauthenticated),
            GuardDecision::redirect("/login")
        );
    }

    #[test]
    fn test_customer_on_admin_page_goes_to_dashboard() {
        assert_eq!(
            AccessGuard::admin_only().decide(&SessionState::Authenticated(Role::Customer)),
            GuardDecision::redirect("/dashboard")
        );
    }

    #[test]
    fn test_admin_on_customer_only_page_goes_to_login() {
        assert_eq!(
            AccessGuard::new(Some(Role::Customer)).decide(&SessionState::Authenticated(Role::Admin)),
            GuardDecision::redirect("/login")
        );
    }

    #[test]
    fn test_matching_role_renders() {
        assert_eq!(
            AccessGuard::admin_only().decide(&SessionState::Authenticated(Role::Admin)),
            GuardDecision::Render
        );
        for role in [Role::Admin, Role::Customer] {
            assert_eq!(
                AccessGuard::authenticated().decide(&SessionState::Authenticated(role)),
                GuardDecision::Render
            );
        }
    }

    #[test]
    fn test_decision_json_shape() {
        assert_eq!(
            serde_json::to_value(GuardDecision::redirect("/login")).unwrap(),
            serde_json::json!({ "decision": "redirect", "location": "/login" })
        );
        assert_eq!(
            serde_json::to_value(GuardDecision::Render).unwrap(),
            serde_json::json!({ "decision": "render" })
        );
    }
}
