//! Tracer that records finished spans for inspection.
//!
//! # Design Decisions
//! - Intended for test suites and local debugging; storage is unbounded
//! - `Clone` shares the underlying store, so a test can keep one handle while
//!   the middleware owns another

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::span::{FinishedSpan, SpanHandle, SpanRecord};
use crate::tracer::{SpanSink, Tracer};

/// Tracer that keeps every finished span in memory.
#[derive(Clone, Default)]
pub struct InMemoryTracer {
    store: Arc<MemoryStore>,
}

#[derive(Default)]
struct MemoryStore {
    services: Mutex<HashMap<String, (String, String)>>,
    finished: Mutex<Vec<FinishedSpan>>,
}

impl InMemoryTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finished spans recorded so far, oldest first.
    pub fn finished_spans(&self) -> Vec<FinishedSpan> {
        self.store
            .finished
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain the recorded spans.
    pub fn take_finished(&self) -> Vec<FinishedSpan> {
        std::mem::take(
            &mut *self
                .store
                .finished
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Registered services mapped to their `(app, app_type)` metadata.
    pub fn registered_services(&self) -> HashMap<String, (String, String)> {
        self.store
            .services
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SpanSink for MemoryStore {
    fn record(&self, span: FinishedSpan) {
        self.finished
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(span);
    }
}

impl Tracer for InMemoryTracer {
    fn register_service(&self, name: &str, app: &str, app_type: &str) {
        self.store
            .services
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_insert_with(|| (app.to_string(), app_type.to_string()));
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
            self.store.clone(),
        ))
    }
}
