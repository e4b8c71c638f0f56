//! HTTP failure signals for REST APIs built on Axum.
//!
//! A failure signal carries a message and an optional structured payload and
//! knows how to write itself into a response. Handlers return
//! `Result<_, ApiError>`; axum's `IntoResponse` on `ApiError` is the single
//! point where failures become HTTP responses.
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod services;
pub mod signal;
pub mod validation;

pub use error::ApiError;
pub use signal::{ErrorBody, FailureKind, FailureSignal, HttpFailureSignal};
pub use validation::FieldErrors;
