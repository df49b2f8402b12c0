//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::EnqueueResponse;
use crate::models::{AccountStats, Side};
use crate::validation::TradeSubmission;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Trade Settlement API",
        version = "1.0.0",
        description = "Trade ingestion and per-account settlement statistics.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::post_trade,
        crate::gateway::handlers::get_stats,
        crate::gateway::handlers::health_check,
    ),
    components(schemas(TradeSubmission, EnqueueResponse, AccountStats, Side, HealthResponse)),
    tags(
        (name = "Trades", description = "Trade ingestion"),
        (name = "Stats", description = "Account settlement totals"),
        (name = "System", description = "Liveness"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/trades"));
        assert!(paths.iter().any(|p| p.as_str() == "/stats/{account}"));
        assert!(paths.iter().any(|p| p.as_str() == "/healthz"));
    }
}
