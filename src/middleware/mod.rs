pub mod listener;
pub mod response;

pub use listener::{method_not_allowed, not_found_fallback, with_failure_handling};
pub use response::{ApiResponse, ApiResult};
