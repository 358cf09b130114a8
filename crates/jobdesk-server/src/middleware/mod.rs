//! Middleware for the Jobdesk server.

pub mod auth;
pub mod authz;

pub use auth::{Auth, Identity, Role, Session, SessionError, SessionResolver};
pub use authz::{is_authorized, Capability, GuardLayer, OnDeny};
