//! Role-based access control.

pub mod audit;
pub mod layer;
pub mod policy;

pub use audit::AuthzAuditEvent;
pub use layer::{GuardLayer, GuardMiddleware, OnDeny};
pub use policy::{evaluate, is_authorized, Capability, Decision, DenyReason};
