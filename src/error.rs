// HTTP API Error Types
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::database::RepositoryError;
use crate::middleware::listener;
use crate::signal::{FailureSignal, HttpFailureSignal};

/// Everything a handler can fail with.
///
/// `Signal` carries any implementation of the failure contract and renders
/// itself. `Internal` is anything else and always reports as a bare 500.
#[derive(Debug)]
pub enum ApiError {
    Signal(Box<dyn HttpFailureSignal>),
    Internal(anyhow::Error),
}

impl ApiError {
    /// Wrap any failure signal, including user-defined ones
    pub fn signal<S: HttpFailureSignal>(signal: S) -> Self {
        ApiError::Signal(Box::new(signal))
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        ApiError::Internal(err.into())
    }

    /// The wrapped signal, if this error reports through the contract
    pub fn as_signal(&self) -> Option<&dyn HttpFailureSignal> {
        match self {
            ApiError::Signal(signal) => Some(signal.as_ref()),
            ApiError::Internal(_) => None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Signal(signal) => write!(f, "{}", signal),
            ApiError::Internal(err) => write!(f, "internal error: {}", err),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<FailureSignal> for ApiError {
    fn from(signal: FailureSignal) -> Self {
        ApiError::signal(signal)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::internal(err)
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => {
                FailureSignal::not_found(format!("User {} not found", id)).into()
            }
            RepositoryError::DuplicateEmail(email) => {
                FailureSignal::conflict(format!("Email '{}' is already registered", email))
                    .with_errors(json!({ "email": "already registered" }))
                    .into()
            }
        }
    }
}

// Extractor rejections are client errors; keep axum's text as the message
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        let signal = match rejection {
            JsonRejection::MissingJsonContentType(_) => FailureSignal::unsupported_media_type(message),
            JsonRejection::JsonDataError(_) => FailureSignal::validation(message, json!({})),
            JsonRejection::BytesRejection(ref inner)
                if inner.status() == axum::http::StatusCode::PAYLOAD_TOO_LARGE =>
            {
                FailureSignal::payload_too_large(message)
            }
            _ => FailureSignal::bad_request(message),
        };
        signal.into()
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        FailureSignal::bad_request(rejection.body_text()).into()
    }
}

// The single catching point: signals render themselves, the rest is a 500
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Signal(signal) => listener::render_signal(signal.as_ref()),
            ApiError::Internal(err) => listener::render_internal(&err),
        }
    }
}
