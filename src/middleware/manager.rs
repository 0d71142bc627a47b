//! Span lifecycle management.
//!
//! # States
//! ```text
//! CREATED → ACTIVE (downstream executing) → {ERROR-FLAGGED | TAG-DEFAULTED} → FINISHED
//! ```
//! FINISHED is terminal; nothing mutates a span afterwards.
//!
//! # Responsibilities
//! - Start one span per inbound request and expose it via `RequestContext`
//! - Classify the outcome: returned error vs. error status code
//! - Default the resource and HTTP tags the downstream handler left unset
//! - Finish the span exactly once on every exit path
//!
//! # Design Decisions
//! - Downstream handlers know the request's semantic resource and tags better
//!   than the middleware, so they write first and the middleware only fills
//!   gaps
//! - Finalization is a drop guard: unwind and cancellation release the span
//!   the same way a normal return does
//! - The status flag is monotonic, so the 5xx check can never downgrade a
//!   span that downstream handling (or the error path) already flagged

use std::backtrace::Backtrace;
use std::future::Future;
use std::sync::Arc;

use axum::http::{Request, Response};
use tracing::{debug, warn};

use crate::config::schema::TraceConfig;
use crate::config::validation::{validate_config, ConfigError};
use crate::middleware::context::RequestContext;
use crate::span::{tags, ErrorDetail, Span, SpanHandle, SpanStatus};
use crate::tracer::Tracer;

/// Name given to every request span.
pub const SPAN_NAME: &str = "http.request";

/// Span type recorded at creation.
pub const SPAN_TYPE_HTTP: &str = "http";

const APP: &str = "http";
const APP_TYPE: &str = "web";

/// Creates, threads, and finishes one span per request.
pub struct SpanLifecycleManager {
    tracer: Arc<dyn Tracer>,
    config: TraceConfig,
}

impl std::fmt::Debug for SpanLifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanLifecycleManager")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SpanLifecycleManager {
    /// Validate the configuration and register the service with the tracer.
    ///
    /// Registration happens once here, not per request.
    pub fn new(tracer: Arc<dyn Tracer>, config: TraceConfig) -> Result<Self, ConfigError> {
        validate_config(&config)?;
        tracer.register_service(&config.service_name, APP, APP_TYPE);
        debug!(service = %config.service_name, "span lifecycle manager ready");
        Ok(Self { tracer, config })
    }

    /// The configuration resolved at construction.
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Trace one request through the downstream pipeline.
    ///
    /// The response or error from `downstream` is returned unchanged; the
    /// only side effects are span annotation and finalization.
    pub async fn handle_request<B, F, Fut, ResBody, E>(
        &self,
        mut request: Request<B>,
        downstream: F,
    ) -> Result<Response<ResBody>, E>
    where
        F: FnOnce(Request<B>) -> Fut,
        Fut: Future<Output = Result<Response<ResBody>, E>>,
        E: std::fmt::Display,
    {
        if !self.config.enabled {
            return downstream(request).await;
        }

        let method = request.method().as_str().to_string();
        let url = request.uri().path().to_string();

        let span = self
            .tracer
            .start_span(SPAN_NAME, &self.config.service_name, None, SPAN_TYPE_HTTP);
        debug!(method = %method, path = %url, "request span started");
        request
            .extensions_mut()
            .insert(RequestContext::new(span.clone()));

        // Finishes the span even if `downstream` unwinds or the future is
        // dropped mid-flight.
        let guard = FinishGuard::new(span.clone(), method, url);

        match downstream(request).await {
            Ok(response) => {
                let status = response.status().as_u16();
                guard.finalize(Some(status));

                let outcome = if response.status().is_server_error() {
                    metrics::counter!("trace_request_errors_total", "kind" => "status")
                        .increment(1);
                    "server_error"
                } else {
                    "ok"
                };
                metrics::counter!("trace_requests_total", "outcome" => outcome).increment(1);

                Ok(response)
            }
            Err(err) => {
                warn!(error = %err, "downstream pipeline failed");
                span.mark_error(&ErrorDetail::from_error(&err));
                guard.finalize(None);

                metrics::counter!("trace_requests_total", "outcome" => "fault").increment(1);
                metrics::counter!("trace_request_errors_total", "kind" => "fault").increment(1);

                Err(err)
            }
        }
    }
}

/// Scoped release of the active span: exactly one finalize on every exit
/// path, including unwind.
struct FinishGuard {
    span: Option<SpanHandle>,
    method: String,
    url: String,
}

impl FinishGuard {
    fn new(span: SpanHandle, method: String, url: String) -> Self {
        Self {
            span: Some(span),
            method,
            url,
        }
    }

    fn finalize(mut self, status: Option<u16>) {
        if let Some(span) = self.span.take() {
            finalize_span(&span, &self.method, &self.url, status);
        }
    }
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        if let Some(span) = self.span.take() {
            finalize_span(&span, &self.method, &self.url, None);
        }
    }
}

/// Default unset fields, classify error statuses, and finish the span.
fn finalize_span(span: &SpanHandle, method: &str, url: &str, status: Option<u16>) {
    let status_text = status.map(|code| code.to_string());

    if span.resource().is_none() {
        let resource = match &status_text {
            Some(code) => format!("{method} {code}"),
            None => method.to_string(),
        };
        span.set_resource(resource.trim());
    }

    set_tag_if_absent(span, tags::HTTP_METHOD, method);
    set_tag_if_absent(span, tags::HTTP_URL, url);

    if let Some(code) = &status_text {
        set_tag_if_absent(span, tags::HTTP_STATUS_CODE, code);

        if is_error_status(code) && span.status() == SpanStatus::Ok {
            span.set_status(SpanStatus::Error);
            // Tag presence, not the status flag, gates the stack write:
            // downstream can flag an error without attaching a stack.
            if span.tag(tags::ERROR_STACK).is_none() {
                span.set_tag(tags::ERROR_STACK, &Backtrace::force_capture().to_string());
            }
        }
    }

    span.finish();
}

/// A status code is an error when its text form starts with '5'.
fn is_error_status(code: &str) -> bool {
    code.starts_with('5')
}

fn set_tag_if_absent(span: &SpanHandle, key: &str, value: &str) {
    if span.tag(key).is_none() {
        span.set_tag(key, value);
    }
}
