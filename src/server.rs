use axum::{routing::get, Router};

use crate::config::ApiConfig;
use crate::handlers::{system, users};
use crate::middleware::with_failure_handling;
use crate::services::UserService;

/// Full application router with failure handling installed
pub fn app(service: UserService, api: &ApiConfig) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        // Resources
        .merge(users::routes());

    with_failure_handling(router, api).with_state(service)
}

/// Bind and serve until the process is stopped
pub async fn serve(service: UserService, api: &ApiConfig) -> anyhow::Result<()> {
    let bind_addr = format!("{}:{}", api.host, api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(service, api)).await?;
    Ok(())
}
