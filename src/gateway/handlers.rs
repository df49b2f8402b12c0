//! HTTP handlers: ingestion, stats and health boundaries

mod health;
mod stats;
mod trades;

pub use health::{HealthResponse, health_check};
pub use stats::get_stats;
pub use trades::post_trade;

// utoipa path items, referenced by the OpenAPI document
pub use health::__path_health_check;
pub use stats::__path_get_stats;
pub use trades::__path_post_trade;
