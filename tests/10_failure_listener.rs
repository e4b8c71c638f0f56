use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use http_failure::config::{ApiConfig, AppConfig};
use http_failure::middleware::with_failure_handling;
use http_failure::server::app;
use http_failure::services::UserService;
use http_failure::{ApiError, FailureSignal};

// In-process checks of the listener: requests go straight through the router
// with `oneshot`, no sockets involved.

fn users_app() -> Router {
    app(UserService::in_memory(), &AppConfig::development().api)
}

async fn body_bytes(response: Response) -> Result<Vec<u8>> {
    Ok(axum::body::to_bytes(response.into_body(), usize::MAX).await?.to_vec())
}

async fn body_json(response: Response) -> Result<Value> {
    Ok(serde_json::from_slice(&body_bytes(response).await?)?)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn unknown_route_is_json_404() -> Result<()> {
    let response = users_app()
        .oneshot(Request::builder().uri("/api/nothing-here").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

    let body = body_json(response).await?;
    assert_eq!(body["error"], "NOT_FOUND");
    assert_eq!(body["message"], "No route for /api/nothing-here");
    Ok(())
}

#[tokio::test]
async fn non_uuid_id_is_400() -> Result<()> {
    let response = users_app()
        .oneshot(Request::builder().uri("/api/users/not-a-uuid").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await?;
    assert_eq!(body["error"], "BAD_REQUEST");
    Ok(())
}

#[tokio::test]
async fn missing_content_type_is_415() -> Result<()> {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users")
        .body(Body::from(r#"{"first_name":"Ada"}"#))?;
    let response = users_app().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_400() -> Result<()> {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))?;
    let response = users_app().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn wrong_field_type_is_422() -> Result<()> {
    let request = json_request(Method::POST, "/api/users", json!({ "first_name": 42 }));
    let response = users_app().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}

#[tokio::test]
async fn collection_rejects_delete_with_allow() -> Result<()> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/users")
        .body(Body::empty())?;
    let response = users_app().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "GET, POST");
    Ok(())
}

#[tokio::test]
async fn validation_body_carries_every_field() -> Result<()> {
    let request = json_request(Method::POST, "/api/users", json!({ "email": "nope" }));
    let response = users_app().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await?;
    assert_eq!(
        body,
        json!({
            "success": false,
            "error": "VALIDATION_ERROR",
            "message": "User failed validation",
            "errors": {
                "email": "must be a valid email address",
                "first_name": "required",
                "last_name": "required"
            }
        })
    );
    Ok(())
}

#[tokio::test]
async fn delete_is_204_then_404() -> Result<()> {
    let service = UserService::in_memory();
    let api = AppConfig::development().api;

    let created = app(service.clone(), &api)
        .oneshot(json_request(
            Method::POST,
            "/api/users",
            json!({ "first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.com" }),
        ))
        .await?;
    assert_eq!(created.status(), StatusCode::CREATED);
    let id = body_json(created).await?["data"]["id"].as_str().unwrap_or_default().to_string();

    let uri = format!("/api/users/{}", id);
    let deleted = app(service.clone(), &api)
        .oneshot(Request::builder().method(Method::DELETE).uri(&uri).body(Body::empty())?)
        .await?;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let again = app(service, &api)
        .oneshot(Request::builder().method(Method::DELETE).uri(&uri).body(Body::empty())?)
        .await?;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn oversized_body_is_413() -> Result<()> {
    let mut api = AppConfig::development().api;
    api.max_request_size_bytes = 64;

    let request = json_request(
        Method::POST,
        "/api/users",
        json!({ "first_name": "A".repeat(100), "last_name": "Lovelace", "email": "ada@example.com" }),
    );
    let response = app(UserService::in_memory(), &api).oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = body_json(response).await?;
    assert_eq!(body["error"], "PAYLOAD_TOO_LARGE");
    Ok(())
}

// Routes outside the users resource, to reach the internal-error paths

async fn fails_internally() -> Result<(), ApiError> {
    Err(ApiError::internal(anyhow::anyhow!("connection reset")))
}

async fn rate_limited() -> Result<(), ApiError> {
    Err(FailureSignal::too_many_requests("Slow down", Some(12)).into())
}

async fn panics() -> &'static str {
    panic!("handler exploded")
}

fn failing_app() -> Router {
    failing_app_with(AppConfig::development().api)
}

fn failing_app_with(mut api: ApiConfig) -> Router {
    api.enable_request_logging = false;

    let router = Router::new()
        .route("/internal", get(fails_internally))
        .route("/limited", get(rate_limited))
        .route("/panic", get(panics));
    with_failure_handling(router, &api)
}

#[tokio::test]
async fn internal_error_is_plain_500() -> Result<()> {
    let response = failing_app()
        .oneshot(Request::builder().uri("/internal").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str()?.to_string();
    assert!(content_type.starts_with("text/plain"), "unexpected content type {}", content_type);

    let bytes = body_bytes(response).await?;
    assert!(serde_json::from_slice::<Value>(&bytes).is_err(), "500 body must not be JSON");
    assert_eq!(String::from_utf8(bytes)?, "Internal Server Error: connection reset");
    Ok(())
}

#[tokio::test]
async fn production_hides_internal_error_text() -> Result<()> {
    let response = failing_app_with(AppConfig::production().api)
        .oneshot(Request::builder().uri("/internal").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = String::from_utf8(body_bytes(response).await?)?;
    assert_eq!(text, "Internal Server Error");
    assert!(!text.contains("connection reset"));
    Ok(())
}

#[tokio::test]
async fn production_hides_panic_message() -> Result<()> {
    let response = failing_app_with(AppConfig::production().api)
        .oneshot(Request::builder().uri("/panic").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = String::from_utf8(body_bytes(response).await?)?;
    assert!(!text.contains("handler exploded"), "panic message leaked: {}", text);
    Ok(())
}

#[tokio::test]
async fn rate_limit_sets_retry_after() -> Result<()> {
    let response = failing_app()
        .oneshot(Request::builder().uri("/limited").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()[header::RETRY_AFTER], "12");
    Ok(())
}

#[tokio::test]
async fn panic_is_caught_as_500() -> Result<()> {
    let response = failing_app()
        .oneshot(Request::builder().uri("/panic").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = String::from_utf8(body_bytes(response).await?)?;
    assert!(text.contains("handler exploded"), "unexpected panic body: {}", text);
    Ok(())
}
