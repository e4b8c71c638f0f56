use std::borrow::Cow;

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use serde_json::Value;

use super::HttpFailureSignal;

/// Failure kinds with a fixed HTTP status each.
///
/// The status is a property of the kind, never derived from the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    // 400 Bad Request
    BadRequest,
    // 401 Unauthorized
    Unauthorized,
    // 403 Forbidden
    Forbidden,
    // 404 Not Found
    NotFound,
    // 405 Method Not Allowed
    MethodNotAllowed,
    // 409 Conflict
    Conflict,
    // 413 Payload Too Large
    PayloadTooLarge,
    // 415 Unsupported Media Type
    UnsupportedMediaType,
    // 422 Unprocessable Entity (field-level validation)
    Validation,
    // 429 Too Many Requests
    TooManyRequests,
    // 503 Service Unavailable
    ServiceUnavailable,
}

impl FailureKind {
    pub fn status(&self) -> StatusCode {
        match self {
            FailureKind::BadRequest => StatusCode::BAD_REQUEST,
            FailureKind::Unauthorized => StatusCode::UNAUTHORIZED,
            FailureKind::Forbidden => StatusCode::FORBIDDEN,
            FailureKind::NotFound => StatusCode::NOT_FOUND,
            FailureKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            FailureKind::Conflict => StatusCode::CONFLICT,
            FailureKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            FailureKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            FailureKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            FailureKind::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            FailureKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Error code for client handling
    pub fn code(&self) -> &'static str {
        match self {
            FailureKind::BadRequest => "BAD_REQUEST",
            FailureKind::Unauthorized => "UNAUTHORIZED",
            FailureKind::Forbidden => "FORBIDDEN",
            FailureKind::NotFound => "NOT_FOUND",
            FailureKind::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            FailureKind::Conflict => "CONFLICT",
            FailureKind::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            FailureKind::UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
            FailureKind::Validation => "VALIDATION_ERROR",
            FailureKind::TooManyRequests => "TOO_MANY_REQUESTS",
            FailureKind::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// The built-in failure signal: a kind plus message, payload and headers.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}: {}", .kind, .message)]
pub struct FailureSignal {
    kind: FailureKind,
    message: String,
    errors: Option<Value>,
    headers: HeaderMap,
}

impl FailureSignal {
    pub fn new(kind: FailureKind) -> Self {
        Self {
            kind,
            message: String::new(),
            errors: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_errors(mut self, errors: Value) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

// Static constructor methods, one per kind
impl FailureSignal {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(FailureKind::BadRequest).with_message(message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Unauthorized).with_message(message)
    }

    /// Attach a `WWW-Authenticate` challenge, e.g. `Bearer realm="api"`.
    /// Challenges that are not valid header text are dropped.
    pub fn with_challenge(self, challenge: &str) -> Self {
        match HeaderValue::from_str(challenge) {
            Ok(value) => self.with_header(header::WWW_AUTHENTICATE, value),
            Err(_) => {
                tracing::warn!("Dropping invalid WWW-Authenticate challenge: {:?}", challenge);
                self
            }
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Forbidden).with_message(message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FailureKind::NotFound).with_message(message)
    }

    /// 405 with an `Allow` header listing the methods the resource supports
    pub fn method_not_allowed(allow: &[Method]) -> Self {
        let allowed = allow.iter().map(Method::as_str).collect::<Vec<_>>().join(", ");
        let signal = Self::new(FailureKind::MethodNotAllowed)
            .with_message(format!("Method not allowed; allowed: {}", allowed));

        match HeaderValue::from_str(&allowed) {
            Ok(value) => signal.with_header(header::ALLOW, value),
            Err(_) => signal,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Conflict).with_message(message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(FailureKind::PayloadTooLarge).with_message(message)
    }

    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        Self::new(FailureKind::UnsupportedMediaType).with_message(message)
    }

    /// 422 carrying a field-level error payload
    pub fn validation(message: impl Into<String>, errors: Value) -> Self {
        Self::new(FailureKind::Validation)
            .with_message(message)
            .with_errors(errors)
    }

    /// 429, with `Retry-After` (seconds) when the wait is known
    pub fn too_many_requests(message: impl Into<String>, retry_after_secs: Option<u64>) -> Self {
        let signal = Self::new(FailureKind::TooManyRequests).with_message(message);
        match retry_after_secs {
            Some(secs) => signal.with_header(header::RETRY_AFTER, HeaderValue::from(secs)),
            None => signal,
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(FailureKind::ServiceUnavailable).with_message(message)
    }
}

impl HttpFailureSignal for FailureSignal {
    fn message(&self) -> &str {
        &self.message
    }

    fn set_message(&mut self, message: String) {
        self.message = message;
    }

    fn errors(&self) -> Option<&Value> {
        self.errors.as_ref()
    }

    fn set_errors(&mut self, errors: Value) {
        self.errors = Some(errors);
    }

    fn status(&self) -> StatusCode {
        self.kind.status()
    }

    fn code(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.kind.code())
    }

    fn headers(&self) -> Option<&HeaderMap> {
        if self.headers.is_empty() {
            None
        } else {
            Some(&self.headers)
        }
    }
}
