pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod rate_limit;
pub mod router;

pub use metrics::HttpMetrics;
pub use rate_limit::RateLimiter;
pub use router::create_router;
pub use router::AppState;
