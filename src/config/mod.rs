//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! TraceConfig (defaults or deserialized by the host application)
//!     → validation.rs (semantic checks)
//!     → SpanLifecycleManager::new (resolved once, immutable afterwards)
//! ```
//!
//! # Design Decisions
//! - Configuration is a plain value, resolved once at construction; nothing
//!   merges defaults per request
//! - The tracer is a constructor argument, not configuration data

pub mod schema;
pub mod validation;

pub use schema::{TraceConfig, DEFAULT_SERVICE_NAME};
pub use validation::{validate_config, ConfigError};
