//! Per-request carrier for the active span.
//!
//! # Design Decisions
//! - Stored in the request's extensions keyed by this type, the typed
//!   equivalent of a well-known environment key
//! - Holds a shared handle, not ownership; the middleware keeps its own
//!   handle and finishes the span after downstream handling returns

use std::fmt;

use axum::http::Request;

use crate::span::SpanHandle;

/// Exposes the active request span to downstream handlers.
#[derive(Clone)]
pub struct RequestContext {
    span: SpanHandle,
}

impl RequestContext {
    pub(crate) fn new(span: SpanHandle) -> Self {
        Self { span }
    }

    /// Handle to the active span.
    pub fn span(&self) -> &SpanHandle {
        &self.span
    }

    /// Retrieve the context from a request, if the middleware installed one.
    pub fn from_request<B>(request: &Request<B>) -> Option<Self> {
        request.extensions().get::<Self>().cloned()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext").finish_non_exhaustive()
    }
}
