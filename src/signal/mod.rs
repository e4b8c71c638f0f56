// HTTP failure signal contract
use std::borrow::Cow;

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
};
use serde_json::Value;

pub mod body;
pub mod failure;

pub use body::ErrorBody;
pub use failure::{FailureKind, FailureSignal};

/// A recoverable failure that knows how to report itself over HTTP.
///
/// Signals are created where a failure is detected (validation, lookup miss,
/// business rule), optionally mutated by that code path, and consulted exactly
/// once when the response is prepared.
pub trait HttpFailureSignal: std::error::Error + Send + Sync + 'static {
    /// Human-readable description of the failure
    fn message(&self) -> &str;

    /// Replace the human-readable description
    fn set_message(&mut self, message: String);

    /// Structured, machine-readable detail (e.g. per-field validation errors).
    /// `None` until `set_errors` is called.
    fn errors(&self) -> Option<&Value>;

    /// Replace the structured error payload. No validation is performed here.
    fn set_errors(&mut self, errors: Value);

    /// HTTP status this failure reports as
    fn status(&self) -> StatusCode;

    /// Machine-readable code placed in the body's `error` field.
    ///
    /// Defaults to the status reason phrase in UPPER_SNAKE form
    /// ("Payment Required" becomes `PAYMENT_REQUIRED`), the same shape the
    /// built-in kinds use.
    fn code(&self) -> Cow<'_, str> {
        Cow::Owned(reason_code(self.status()))
    }

    /// Extra headers to attach to the response (Allow, Retry-After, ...)
    fn headers(&self) -> Option<&HeaderMap> {
        None
    }

    /// Write status, headers and JSON body into `response`.
    ///
    /// Must not fail: this is the last chance to report before the response
    /// is flushed. Rendering the same signal twice yields identical responses.
    fn prepare_response(&self, response: &mut Response) {
        *response.status_mut() = self.status();

        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(extra) = self.headers() {
            for (name, value) in extra.iter() {
                headers.insert(name.clone(), value.clone());
            }
        }

        let bytes = ErrorBody::from_signal(self).to_bytes();
        *response.body_mut() = Body::from(bytes);
    }
}

/// UPPER_SNAKE code for a status, from its canonical reason phrase
pub fn reason_code(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => reason
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect(),
        None => "ERROR".to_string(),
    }
}
