//! Tracer that emits finished spans as structured log events.
//!
//! # Design Decisions
//! - One `tracing` event per finished span; the tag map is rendered as JSON
//!   so log pipelines can parse it without knowing the keys in advance
//! - Suitable as the default wiring for services that already ship logs but
//!   have no trace backend

use std::sync::Arc;

use tracing::{debug, info};

use crate::span::{FinishedSpan, SpanHandle, SpanRecord};
use crate::tracer::{SpanSink, Tracer};

/// Emits one structured log event per finished span.
#[derive(Clone, Default)]
pub struct LogTracer {
    sink: Arc<LogSink>,
}

impl LogTracer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tracer for LogTracer {
    fn register_service(&self, name: &str, app: &str, app_type: &str) {
        debug!(service = name, app, app_type, "service registered");
    }

    fn start_span(
        &self,
        name: &str,
        service: &str,
        resource: Option<&str>,
        span_type: &str,
    ) -> SpanHandle {
        Arc::new(SpanRecord::new(
            name,
            service,
            resource,
            span_type,
            self.sink.clone(),
        ))
    }
}

#[derive(Debug, Default)]
struct LogSink;

impl SpanSink for LogSink {
    fn record(&self, span: FinishedSpan) {
        let tags = serde_json::to_string(&span.tags).unwrap_or_else(|_| "{}".to_string());
        info!(
            span_id = %span.id,
            name = %span.name,
            service = %span.service,
            resource = span.resource.as_deref().unwrap_or(""),
            status = span.status.as_u8(),
            duration_ms = span.duration_ms,
            tags = %tags,
            "span finished"
        );
    }
}
