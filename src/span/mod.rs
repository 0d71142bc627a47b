//! Span collaborator contract.
//!
//! # Responsibilities
//! - Define the mutation/finish contract the middleware drives a span through
//! - Define well-known tag keys for HTTP request spans
//! - Capture error details recorded on failed requests
//!
//! # Design Decisions
//! - Span methods take `&self`; implementations use interior mutability so one
//!   handle can be shared between the middleware and downstream handlers
//!   within a single request
//! - Resource and each tag key are first-writer-wins; the status flag is
//!   monotonic (ok can become error, never the reverse)
//! - `finish()` is terminal; mutations after it are ignored

pub mod record;

use std::backtrace::Backtrace;
use std::sync::Arc;

use serde::Serialize;

pub use record::{FinishedSpan, SpanRecord};

/// Well-known tag keys set on HTTP request spans.
pub mod tags {
    /// HTTP method of the traced request.
    pub const HTTP_METHOD: &str = "http.method";

    /// Path of the traced request.
    pub const HTTP_URL: &str = "http.url";

    /// Response status code, rendered as text.
    pub const HTTP_STATUS_CODE: &str = "http.status_code";

    /// Error type name recorded when the pipeline fails.
    pub const ERROR_TYPE: &str = "error.type";

    /// Error message recorded when the pipeline fails.
    pub const ERROR_MSG: &str = "error.msg";

    /// Call stack captured where an error was observed.
    pub const ERROR_STACK: &str = "error.stack";
}

/// Error flag carried by a span (0 = ok, 1 = error).
///
/// The flag is monotonic: once a span is `Error` it never returns to `Ok`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SpanStatus {
    #[default]
    Ok,
    Error,
}

impl SpanStatus {
    /// Numeric form of the flag.
    pub fn as_u8(self) -> u8 {
        match self {
            SpanStatus::Ok => 0,
            SpanStatus::Error => 1,
        }
    }
}

/// Shared handle to the active span of one request.
pub type SpanHandle = Arc<dyn Span>;

/// Mutation and finish contract for a single request span.
///
/// Implementations must uphold the lifecycle invariants: `resource` and each
/// tag key accept only their first writer, the status flag is monotonic, and
/// `finish` is idempotent (the first call wins).
pub trait Span: Send + Sync {
    /// Set the resource label if no writer has set it yet.
    fn set_resource(&self, value: &str);

    /// Current resource label, if any.
    fn resource(&self) -> Option<String>;

    /// Set a tag if the key is still unset.
    fn set_tag(&self, key: &str, value: &str);

    /// Current value for a tag key, if set.
    fn tag(&self, key: &str) -> Option<String>;

    /// Raise (never lower) the error flag.
    fn set_status(&self, status: SpanStatus);

    /// Current error flag.
    fn status(&self) -> SpanStatus;

    /// Flag the span as failed and record the error detail tags.
    fn mark_error(&self, detail: &ErrorDetail);

    /// Close the span. First call wins; later calls are ignored.
    fn finish(&self);
}

/// Detail recorded on a span when the downstream pipeline fails.
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    /// Type name of the error.
    pub kind: String,

    /// Rendered error message.
    pub message: String,

    /// Call stack captured where the error was observed.
    pub stack: Option<String>,
}

impl ErrorDetail {
    /// Build a detail record without a captured stack.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            stack: None,
        }
    }

    /// Capture the detail for an error observed at the current call site.
    pub fn from_error<E: std::fmt::Display>(err: &E) -> Self {
        Self {
            kind: std::any::type_name::<E>().to_string(),
            message: err.to_string(),
            stack: Some(Backtrace::force_capture().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_numeric_form() {
        assert_eq!(SpanStatus::Ok.as_u8(), 0);
        assert_eq!(SpanStatus::Error.as_u8(), 1);
    }

    #[test]
    fn test_error_detail_from_error() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let detail = ErrorDetail::from_error(&err);
        assert_eq!(detail.message, "boom");
        assert!(detail.kind.contains("Error"));
        assert!(detail.stack.is_some());
    }
}
