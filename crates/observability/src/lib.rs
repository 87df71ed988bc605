//! # wohnheim-observability
//!
//! Observability-Crate fuer Wohnheim:
//! - Prometheus-kompatible Metriken (`/metrics`)
//! - Health-Check-Endpunkt (`/health`)
//! - Structured Logging via tracing-subscriber (Text oder JSON)
//! - Request-Timing Middleware

pub mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;

pub use health::{health_router, HealthResponse, HealthState, HealthStatus};
pub use logging::logging_initialisieren;
pub use metrics::{metrics_router, WohnheimMetriken};
pub use middleware::timing_middleware;
