//! Tracer that discards everything.

use std::sync::Arc;

use crate::span::{ErrorDetail, Span, SpanHandle, SpanStatus};
use crate::tracer::Tracer;

/// Tracer for disabled paths and benchmarks; its spans hold no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl NoopTracer {
    pub fn new() -> Self {
        Self
    }
}

impl Tracer for NoopTracer {
    fn register_service(&self, _name: &str, _app: &str, _app_type: &str) {}

    fn start_span(
        &self,
        _name: &str,
        _service: &str,
        _resource: Option<&str>,
        _span_type: &str,
    ) -> SpanHandle {
        Arc::new(NoopSpan)
    }
}

/// Span handed out by [`NoopTracer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpan;

impl Span for NoopSpan {
    fn set_resource(&self, _value: &str) {}

    fn resource(&self) -> Option<String> {
        None
    }

    fn set_tag(&self, _key: &str, _value: &str) {}

    fn tag(&self, _key: &str) -> Option<String> {
        None
    }

    fn set_status(&self, _status: SpanStatus) {}

    fn status(&self) -> SpanStatus {
        SpanStatus::Ok
    }

    fn mark_error(&self, _detail: &ErrorDetail) {}

    fn finish(&self) {}
}
