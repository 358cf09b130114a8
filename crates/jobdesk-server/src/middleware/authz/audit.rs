//! Authorization audit logging.

use super::policy::{Capability, DenyReason};
use crate::middleware::auth::types::Identity;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

/// Authorization audit event.
#[derive(Debug, Serialize)]
pub struct AuthzAuditEvent {
    pub timestamp: DateTime<Utc>,
    pub path: String,
    pub capability: Capability,
    pub user_id: Option<String>,
    pub role: Option<String>,
    pub granted: bool,
    pub reason: Option<&'static str>,
}

impl AuthzAuditEvent {
    pub fn granted(path: &str, capability: Capability, identity: &Identity) -> Self {
        Self {
            timestamp: Utc::now(),
            path: path.to_string(),
            capability,
            user_id: Some(identity.id.clone()),
            role: identity.role.map(|r| r.to_string()),
            granted: true,
            reason: None,
        }
    }

    pub fn denied(path: &str, capability: Capability, reason: DenyReason) -> Self {
        Self {
            timestamp: Utc::now(),
            path: path.to_string(),
            capability,
            user_id: None,
            role: None,
            granted: false,
            reason: Some(reason.as_str()),
        }
    }

    /// Attach the identity that was refused.
    pub fn for_identity(mut self, identity: Option<&Identity>) -> Self {
        if let Some(identity) = identity {
            self.user_id = Some(identity.id.clone());
            self.role = identity.role.map(|r| r.to_string());
        }
        self
    }

    pub fn log(&self) {
        if self.granted {
            info!(
                event = "authz_granted",
                path = %self.path,
                capability = %self.capability,
                user_id = ?self.user_id,
                role = ?self.role,
                "Authorization granted"
            );
        } else {
            warn!(
                event = "authz_denied",
                path = %self.path,
                capability = %self.capability,
                user_id = ?self.user_id,
                role = ?self.role,
                reason = ?self.reason,
                "Authorization denied"
            );
        }
    }
}
