//! Error handling for the Jobdesk server.

pub mod context;
pub mod response;
pub mod types;

pub use context::ErrorContext;
pub use response::{error_response, panic_response, ErrorBody};
pub use types::{ApiError, ApiResult};
