//! Role policy.
//!
//! Each route carries one [`Capability`], fixed when the router is built.
//! [`evaluate`] is the only place a session is compared against a
//! capability; everything else asks it.

use crate::middleware::auth::types::{Identity, Role, Session};
use serde::Serialize;
use std::fmt;

/// Minimum privilege a route demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    /// Any signed-in user with a recognised role.
    Authenticated,
    /// `ADMIN` or `SUPER_ADMIN`.
    AdminOrSuper,
    /// `SUPER_ADMIN` only.
    SuperOnly,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::Authenticated,
        Capability::AdminOrSuper,
        Capability::SuperOnly,
    ];

    /// Whether `role` satisfies this capability.
    pub fn permits(self, role: Role) -> bool {
        match self {
            Self::Authenticated => true,
            Self::AdminOrSuper => matches!(role, Role::Admin | Role::SuperAdmin),
            Self::SuperOnly => role == Role::SuperAdmin,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authenticated => "AUTHENTICATED",
            Self::AdminOrSuper => "ADMIN_OR_SUPER",
            Self::SuperOnly => "SUPER_ONLY",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No session.
    Unauthenticated,
    /// Session present, role missing, unrecognised or too low.
    Unauthorized,
    /// The session backend failed.
    SessionUnavailable,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Unauthorized => "unauthorized",
            Self::SessionUnavailable => "session_unavailable",
        }
    }
}

/// Outcome of [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision<'a> {
    Allow(&'a Identity),
    Deny(DenyReason),
}

/// Evaluate a session against a capability. Denies by default.
pub fn evaluate(session: &Session, capability: Capability) -> Decision<'_> {
    let Some(identity) = session.identity() else {
        return Decision::Deny(DenyReason::Unauthenticated);
    };

    match identity.role {
        Some(role) if capability.permits(role) => Decision::Allow(identity),
        _ => Decision::Deny(DenyReason::Unauthorized),
    }
}

/// Whether the session satisfies the capability.
pub fn is_authorized(session: &Session, capability: Capability) -> bool {
    matches!(evaluate(session, capability), Decision::Allow(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn session_with(raw_role: &str) -> Session {
        Session::authenticated(Identity::new("u1", "u1@example.com", "U1", raw_role))
    }

    #[test]
    fn test_empty_session_denies_everything() {
        let session = Session::anonymous();
        for capability in Capability::ALL {
            assert!(!is_authorized(&session, capability));
            assert_eq!(
                evaluate(&session, capability),
                Decision::Deny(DenyReason::Unauthenticated)
            );
        }
    }

    #[test]
    fn test_user_role() {
        let session = session_with("USER");
        assert!(is_authorized(&session, Capability::Authenticated));
        assert!(!is_authorized(&session, Capability::AdminOrSuper));
        assert!(!is_authorized(&session, Capability::SuperOnly));
    }

    #[test]
    fn test_admin_role() {
        let session = session_with("ADMIN");
        assert!(is_authorized(&session, Capability::Authenticated));
        assert!(is_authorized(&session, Capability::AdminOrSuper));
        assert_eq!(
            evaluate(&session, Capability::SuperOnly),
            Decision::Deny(DenyReason::Unauthorized)
        );
    }

    #[test]
    fn test_super_admin_allowed_everywhere() {
        let session = session_with("SUPER_ADMIN");
        for capability in Capability::ALL {
            assert!(is_authorized(&session, capability));
        }
    }

    #[test]
    fn test_guest_denied_everywhere() {
        let session = session_with("GUEST");
        for capability in Capability::ALL {
            assert_eq!(
                evaluate(&session, capability),
                Decision::Deny(DenyReason::Unauthorized)
            );
        }
    }

    proptest! {
        #[test]
        fn unrecognized_roles_never_allowed(raw in "[A-Za-z_]{0,16}") {
            prop_assume!(raw.parse::<Role>().is_err());
            let session = session_with(&raw);
            for capability in Capability::ALL {
                prop_assert!(!is_authorized(&session, capability));
            }
        }

        #[test]
        fn super_admin_permissions_superset_of_admin(index in 0usize..3) {
            let capability = Capability::ALL[index];
            if capability.permits(Role::Admin) {
                prop_assert!(capability.permits(Role::SuperAdmin));
            }
        }

        #[test]
        fn higher_roles_keep_lower_permissions(low in 0usize..3, high in 0usize..3, cap in 0usize..3) {
            let (low, high) = (Role::ALL[low.min(high)], Role::ALL[low.max(high)]);
            let capability = Capability::ALL[cap];
            if capability.permits(low) {
                prop_assert!(capability.permits(high));
            }
        }
    }
}
