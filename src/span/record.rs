//! Concrete span record backing the shipped tracers.
//!
//! # State Transitions
//! ```text
//! created → active (mutations accepted) → finished (terminal)
//! ```
//!
//! # Design Decisions
//! - One mutex guards the mutable state; a span is only touched from its own
//!   request's task, so contention is not a concern
//! - The lifecycle invariants (first-writer-wins, monotonic status, idempotent
//!   finish) are enforced here, independent of the middleware's own checks
//! - The first `finish()` snapshots the record and hands the snapshot to the
//!   sink; the live record is never shared with the sink

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use serde::Serialize;
use uuid::Uuid;

use crate::span::{tags, ErrorDetail, Span, SpanStatus};
use crate::tracer::SpanSink;

/// Immutable snapshot of a span, taken when it finishes.
#[derive(Debug, Clone, Serialize)]
pub struct FinishedSpan {
    pub id: Uuid,
    pub name: String,
    pub service: String,
    pub resource: Option<String>,
    pub span_type: String,
    pub tags: HashMap<String, String>,
    pub status: SpanStatus,
    pub duration_ms: u64,
}

/// Span implementation handed out by `LogTracer` and `InMemoryTracer`.
pub struct SpanRecord {
    id: Uuid,
    name: String,
    service: String,
    span_type: String,
    started: Instant,
    sink: Arc<dyn SpanSink>,
    state: Mutex<SpanState>,
}

#[derive(Default)]
struct SpanState {
    resource: Option<String>,
    tags: HashMap<String, String>,
    status: SpanStatus,
    finished: bool,
}

impl SpanRecord {
    /// Create an active record that reports to `sink` when finished.
    pub fn new(
        name: &str,
        service: &str,
        resource: Option<&str>,
        span_type: &str,
        sink: Arc<dyn SpanSink>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            service: service.to_string(),
            span_type: span_type.to_string(),
            started: Instant::now(),
            sink,
            state: Mutex::new(SpanState {
                resource: resource.map(str::to_string),
                ..SpanState::default()
            }),
        }
    }

    /// Unique identifier of this span.
    pub fn id(&self) -> Uuid {
        self.id
    }

    fn state(&self) -> MutexGuard<'_, SpanState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Span for SpanRecord {
    fn set_resource(&self, value: &str) {
        let mut state = self.state();
        if state.finished {
            return;
        }
        if state.resource.is_none() {
            state.resource = Some(value.to_string());
        }
    }

    fn resource(&self) -> Option<String> {
        self.state().resource.clone()
    }

    fn set_tag(&self, key: &str, value: &str) {
        let mut state = self.state();
        if state.finished {
            return;
        }
        state
            .tags
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
    }

    fn tag(&self, key: &str) -> Option<String> {
        self.state().tags.get(key).cloned()
    }

    fn set_status(&self, status: SpanStatus) {
        let mut state = self.state();
        if state.finished {
            return;
        }
        if status == SpanStatus::Error {
            state.status = SpanStatus::Error;
        }
    }

    fn status(&self) -> SpanStatus {
        self.state().status
    }

    fn mark_error(&self, detail: &ErrorDetail) {
        let mut state = self.state();
        if state.finished {
            return;
        }
        state.status = SpanStatus::Error;
        state
            .tags
            .entry(tags::ERROR_TYPE.to_string())
            .or_insert_with(|| detail.kind.clone());
        state
            .tags
            .entry(tags::ERROR_MSG.to_string())
            .or_insert_with(|| detail.message.clone());
        if let Some(stack) = &detail.stack {
            state
                .tags
                .entry(tags::ERROR_STACK.to_string())
                .or_insert_with(|| stack.clone());
        }
    }

    fn finish(&self) {
        let snapshot = {
            let mut state = self.state();
            if state.finished {
                return;
            }
            state.finished = true;
            FinishedSpan {
                id: self.id,
                name: self.name.clone(),
                service: self.service.clone(),
                resource: state.resource.clone(),
                span_type: self.span_type.clone(),
                tags: state.tags.clone(),
                status: state.status,
                duration_ms: self.started.elapsed().as_millis() as u64,
            }
        };
        self.sink.record(snapshot);
    }
}
