// Failure listener: the one place failures become HTTP responses
use std::any::Any;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{Method, StatusCode, Uri},
    middleware::map_response,
    response::{IntoResponse, Response},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::signal::{FailureSignal, HttpFailureSignal};

/// Render a signal into a fresh response
pub fn render_signal(signal: &dyn HttpFailureSignal) -> Response {
    let mut response = Response::default();
    signal.prepare_response(&mut response);

    if response.status().is_server_error() {
        tracing::warn!("Request failed with {}: {}", response.status(), signal);
    } else {
        tracing::debug!("Request failed with {}: {}", response.status(), signal);
    }

    response
}

const INTERNAL_ERROR_TEXT: &str = "Internal Server Error";

// Error text riding along with a 500 until the router decides whether to show it
#[derive(Debug, Clone)]
struct InternalDetail(String);

/// Anything outside the signal contract: plain-text 500, no structured body.
///
/// The error text is never in the body here; `with_failure_handling` appends
/// it when `expose_internal_errors` is set for that router.
pub fn render_internal(err: &anyhow::Error) -> Response {
    tracing::error!("Internal error: {:#}", err);

    let mut response = (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_TEXT).into_response();
    response.extensions_mut().insert(InternalDetail(format!("{:#}", err)));
    response
}

/// Strip the pending error text from a 500, appending it to the body if `expose`
pub fn reveal_internal(mut response: Response, expose: bool) -> Response {
    if let Some(InternalDetail(detail)) = response.extensions_mut().remove::<InternalDetail>() {
        if expose {
            *response.body_mut() = Body::from(format!("{}: {}", INTERNAL_ERROR_TEXT, detail));
        }
    }
    response
}

/// Router fallback for paths no route matches
pub async fn not_found_fallback(uri: Uri) -> ApiError {
    FailureSignal::not_found(format!("No route for {}", uri.path())).into()
}

/// Method fallback for a single route: 405 with `Allow` listing `allow`
pub fn method_not_allowed(
    allow: &[Method],
) -> impl Fn() -> std::future::Ready<ApiError> + Clone + Send + Sync + 'static {
    let signal = FailureSignal::method_not_allowed(allow);
    move || std::future::ready(ApiError::from(signal.clone()))
}

/// Panic hook for `CatchPanicLayer`: a panicking handler is an internal error
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    render_internal(&anyhow::anyhow!("handler panicked: {}", detail))
}

/// Install fallback, panic catching, body limit and request tracing.
///
/// Every setting comes from `api`, including whether 500 bodies carry the
/// internal error text.
pub fn with_failure_handling<S>(router: Router<S>, api: &ApiConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let expose = api.expose_internal_errors;

    let router = router
        .fallback(not_found_fallback)
        .layer(map_response(move |response: Response| async move {
            reveal_internal(response, expose)
        }))
        .layer(DefaultBodyLimit::max(api.max_request_size_bytes))
        .layer(CatchPanicLayer::custom(move |payload: Box<dyn Any + Send + 'static>| {
            reveal_internal(handle_panic(payload), expose)
        }));

    if api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}
