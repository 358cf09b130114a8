//! Business logic behind the protected routes.

pub mod readiness;

pub use readiness::{compute_readiness, ReadinessService};
