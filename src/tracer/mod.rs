//! Tracer collaborator contract and shipped implementations.
//!
//! # Data Flow
//! ```text
//! SpanLifecycleManager
//!     → Tracer::start_span (one span per request)
//!     → SpanRecord (mutated during the request)
//!     → SpanSink::record (snapshot on finish)
//!         → log.rs (structured log event)
//!         → memory.rs (stored for inspection)
//! ```
//!
//! # Design Decisions
//! - The middleware consumes `dyn Tracer`; the tracer is injected at
//!   construction, never looked up through a process-wide global
//! - `register_service` is idempotent and invoked once per manager, not per
//!   request
//! - Tracers must tolerate concurrent `start_span` calls from independent
//!   requests

pub mod log;
pub mod memory;
pub mod noop;

use crate::span::{FinishedSpan, SpanHandle};

pub use log::LogTracer;
pub use memory::InMemoryTracer;
pub use noop::NoopTracer;

/// Process-wide collaborator that creates spans and registers service
/// metadata.
pub trait Tracer: Send + Sync {
    /// Register service metadata. Repeated calls with the same name are
    /// no-ops.
    fn register_service(&self, name: &str, app: &str, app_type: &str);

    /// Start a new span owned by the calling request.
    fn start_span(
        &self,
        name: &str,
        service: &str,
        resource: Option<&str>,
        span_type: &str,
    ) -> SpanHandle;
}

/// Destination for finished span snapshots.
pub trait SpanSink: Send + Sync {
    /// Accept the snapshot of a finished span.
    fn record(&self, span: FinishedSpan);
}
