//! Admin sidebar navigation.

use crate::middleware::{auth::Role, authz::Capability};
use serde::Serialize;

/// Landing page of the admin area; page guards fall back here.
pub const ADMIN_LANDING: &str = "/admin";
/// Site root; the admin layout guard falls back here.
pub const SITE_ROOT: &str = "/";

struct NavEntry {
    href: &'static str,
    label: &'static str,
    capability: Capability,
}

const ADMIN_NAV: &[NavEntry] = &[
    NavEntry {
        href: "/admin",
        label: "Dashboard",
        capability: Capability::AdminOrSuper,
    },
    NavEntry {
        href: "/admin/announcements",
        label: "Announcements",
        capability: Capability::AdminOrSuper,
    },
    NavEntry {
        href: "/admin/jobs/new",
        label: "New job",
        capability: Capability::AdminOrSuper,
    },
    NavEntry {
        href: "/admin/users/new",
        label: "New user",
        capability: Capability::AdminOrSuper,
    },
    NavEntry {
        href: "/admin/cache-clear",
        label: "Clear cache",
        capability: Capability::SuperOnly,
    },
];

/// Sidebar link rendered into the admin layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Links the role may follow, with `current` marked active.
pub fn sidebar_links(role: Option<Role>, current: &str) -> Vec<NavLink> {
    let Some(role) = role else {
        return Vec::new();
    };

    ADMIN_NAV
        .iter()
        .filter(|entry| entry.capability.permits(role))
        .map(|entry| NavLink {
            href: entry.href,
            label: entry.label,
            active: entry.href == current,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hrefs(role: Option<Role>) -> Vec<&'static str> {
        sidebar_links(role, ADMIN_LANDING).into_iter().map(|l| l.href).collect()
    }

    #[test]
    fn test_cache_clear_link_only_for_super_admin() {
        assert!(!hrefs(Some(Role::Admin)).contains(&"/admin/cache-clear"));
        assert!(hrefs(Some(Role::SuperAdmin)).contains(&"/admin/cache-clear"));
    }

    #[test]
    fn test_user_and_unknown_roles_get_no_links() {
        assert!(hrefs(Some(Role::User)).is_empty());
        assert!(hrefs(None).is_empty());
    }

    #[test]
    fn test_current_link_marked_active() {
        let links = sidebar_links(Some(Role::Admin), "/admin/announcements");
        let active: Vec<_> = links.iter().filter(|l| l.active).map(|l| l.href).collect();
        assert_eq!(active, vec!["/admin/announcements"]);
    }
}
