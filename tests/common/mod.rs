//! Shared utilities for the integration suites.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};

use trace_middleware::{HttpTraceLayer, InMemoryTracer, SpanLifecycleManager, TraceConfig};

/// Build a tracing layer plus the tracer that records its spans.
pub fn traced_layer(service_name: &str) -> (InMemoryTracer, HttpTraceLayer) {
    let config = TraceConfig {
        service_name: service_name.to_string(),
        ..TraceConfig::default()
    };
    traced_layer_with_config(config)
}

/// Same as [`traced_layer`], with full control over the configuration.
pub fn traced_layer_with_config(config: TraceConfig) -> (InMemoryTracer, HttpTraceLayer) {
    let tracer = InMemoryTracer::new();
    let manager = SpanLifecycleManager::new(Arc::new(tracer.clone()), config).unwrap();
    (tracer, HttpTraceLayer::new(Arc::new(manager)))
}

/// GET request with an empty body.
pub fn get_request(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

/// Response with the given status and body.
#[allow(dead_code)]
pub fn text_response(status: StatusCode, body: &'static str) -> Response<Body> {
    Response::builder().status(status).body(Body::from(body)).unwrap()
}
