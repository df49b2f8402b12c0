pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    routing::{get, post},
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::GatewayConfig;
use crate::db::Database;
use openapi::ApiDoc;
use state::AppState;

/// Routes for the ingestion, stats and health boundaries plus API docs
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/trades", post(handlers::post_trade))
        .route("/stats/{account}", get(handlers::get_stats))
        .route("/healthz", get(handlers::health_check))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Serve until `shutdown` resolves; in-flight requests are completed first
pub async fn run_server<F>(config: &GatewayConfig, db: Database, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("API docs at http://{}/docs", addr);

    let app = router(Arc::new(AppState::new(db)));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
