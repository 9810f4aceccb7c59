//! CourseHub Observability
//!
//! - Structured logging to the console and rolling JSON files
//! - Distributed tracing via OpenTelemetry (when an OTLP endpoint is configured)
//! - Prometheus metrics for HTTP traffic and course-platform events
//!
//! Compiled in by the default `observability` feature; at runtime the
//! `OBSERVABILITY_ENABLED` environment variable switches request metrics off.
//!
//! ```no_run
//! use coursehub_observability::{init_tracing, shutdown_tracer};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     // ... application code ...
//!     shutdown_tracer().await;
//! }
//! ```

#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

#[cfg(feature = "observability")]
pub use metrics_exporter_prometheus::PrometheusHandle;

#[cfg(feature = "observability")]
pub use logging::{REQUEST_ID_HEADER, init_tracing, logging_middleware, shutdown_tracer};
#[cfg(feature = "observability")]
pub use metrics::{
    init_metrics, is_observability_enabled, metrics_app, metrics_middleware, track_enrollments,
    track_gate_rejection, track_payment_captured, track_payment_verification, track_user_login,
    track_user_signup,
};

// No-op stubs when observability is compiled out
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{extract::Request, middleware::Next, response::Response};

    pub const REQUEST_ID_HEADER: &str = "x-request-id";

    pub fn is_observability_enabled() -> bool {
        false
    }

    pub async fn logging_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub fn init_tracing() {}

    pub async fn shutdown_tracer() {}

    pub fn init_metrics() -> Option<()> {
        None
    }

    pub fn track_user_signup(_account_type: &str) {}
    pub fn track_user_login(_success: bool) {}
    pub fn track_enrollments(_count: usize) {}
    pub fn track_payment_captured(_currency: &str) {}
    pub fn track_payment_verification(_verified: bool) {}
    pub fn track_gate_rejection(_path: &str, _reason: &'static str) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
