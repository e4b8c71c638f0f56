use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;

use super::HttpFailureSignal;

/// The one error body schema used by every signal:
/// `{"success": false, "error": CODE, "message": "...", "errors": {...}}`
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub success: bool,
    pub error: Cow<'a, str>,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<&'a Value>,
}

// Last-resort body if serialization ever fails; keeps rendering total
const FALLBACK_BODY: &[u8] = br#"{"success":false,"error":"ERROR","message":"Error"}"#;

impl<'a> ErrorBody<'a> {
    /// Borrow the body fields from a signal, defaulting a blank message
    pub fn from_signal<S: HttpFailureSignal + ?Sized>(signal: &'a S) -> Self {
        // An unset message falls back to the status reason phrase
        let message = match signal.message() {
            "" => signal.status().canonical_reason().unwrap_or("Error"),
            message => message,
        };

        Self {
            success: false,
            error: signal.code(),
            message,
            errors: signal.errors(),
        }
    }

    /// Serialize to JSON; never fails, falling back to a fixed generic body
    pub fn to_bytes(&self) -> Vec<u8> {
        match serde_json::to_vec(self) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("Failed to serialize error body: {}", e);
                FALLBACK_BODY.to_vec()
            }
        }
    }
}
