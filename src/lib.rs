//! HTTP request tracing middleware.
//!
//! Wraps an HTTP pipeline and records one trace span per request. The span is
//! created when the request enters the middleware, shared with downstream
//! handlers through the request's extensions, and finished exactly once on
//! every exit path: normal response, error status code, returned error, or
//! unwind.
//!
//! # Architecture Overview
//!
//! ```text
//!  inbound request
//!       │
//!       ▼
//!  ┌──────────────┐   start span    ┌─────────────────────┐
//!  │ HttpTrace    │───────────────▶│ SpanLifecycleManager │──▶ Tracer
//!  │ (tower)      │                 └──────────┬──────────┘
//!  └──────┬───────┘                            │ RequestContext
//!         │                                    ▼
//!         │                         downstream service
//!         │                         (may mutate the span)
//!         ▼
//!  response / error ◀── finalize: default resource + tags,
//!                       classify errors, finish exactly once
//! ```
//!
//! The tracer and span are collaborator contracts; the crate ships `LogTracer`
//! (structured log output), `InMemoryTracer` (test inspection), and
//! `NoopTracer` (disabled paths) as reference implementations.

pub mod config;
pub mod middleware;
pub mod span;
pub mod tracer;

pub use config::schema::TraceConfig;
pub use config::validation::ConfigError;
pub use middleware::context::RequestContext;
pub use middleware::layer::{HttpTrace, HttpTraceLayer};
pub use middleware::manager::SpanLifecycleManager;
pub use span::{ErrorDetail, FinishedSpan, Span, SpanHandle, SpanStatus};
pub use tracer::{InMemoryTracer, LogTracer, NoopTracer, Tracer};
