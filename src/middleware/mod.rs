//! Request-tracing middleware subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → layer.rs (tower integration, response/error types preserved)
//!     → manager.rs (span creation, outcome classification, finalize)
//!     → context.rs (active span exposed to downstream handlers)
//!     → response or error returned to the caller unchanged
//! ```
//!
//! # Design Decisions
//! - The middleware is transparent to control flow: its only observable side
//!   effects are span annotation and finalization
//! - Downstream handlers write resource and tags first; the manager only
//!   fills gaps during finalization

pub mod context;
pub mod layer;
pub mod manager;

pub use context::RequestContext;
pub use layer::{HttpTrace, HttpTraceLayer};
pub use manager::SpanLifecycleManager;
