//! End-to-end span lifecycle checks on the success path: defaults,
//! first-writer-wins, error-status classification, and passthrough mode.

mod common;

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use futures_util::future::join_all;
use tower::{service_fn, Layer, Service, ServiceExt};

use common::{get_request, text_response, traced_layer, traced_layer_with_config};
use trace_middleware::span::tags;
use trace_middleware::{
    ConfigError, RequestContext, Span, SpanLifecycleManager, SpanStatus, TraceConfig,
};

#[tokio::test]
async fn test_defaults_applied_on_success() {
    let (tracer, layer) = traced_layer("web");
    let svc = layer.layer(service_fn(|_req: Request<Body>| async {
        Ok::<_, Infallible>(text_response(StatusCode::OK, "ok"))
    }));

    let response = svc.oneshot(get_request("/foo")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], b"ok");

    let spans = tracer.finished_spans();
    assert_eq!(spans.len(), 1);
    let span = &spans[0];
    assert_eq!(span.name, "http.request");
    assert_eq!(span.service, "web");
    assert_eq!(span.span_type, "http");
    assert_eq!(span.resource.as_deref(), Some("GET 200"));
    assert_eq!(span.tags.get(tags::HTTP_METHOD).map(String::as_str), Some("GET"));
    assert_eq!(span.tags.get(tags::HTTP_URL).map(String::as_str), Some("/foo"));
    assert_eq!(
        span.tags.get(tags::HTTP_STATUS_CODE).map(String::as_str),
        Some("200")
    );
    assert_eq!(span.status, SpanStatus::Ok);
}

#[tokio::test]
async fn test_error_status_flags_span() {
    let (tracer, layer) = traced_layer("web");
    let svc = layer.layer(service_fn(|_req: Request<Body>| async {
        Ok::<_, Infallible>(text_response(StatusCode::SERVICE_UNAVAILABLE, ""))
    }));

    let response = svc.oneshot(get_request("/busy")).await.unwrap();
    // The response passes through untouched.
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = to_bytes(response.into_body(), 1024).await.unwrap();
    assert!(body.is_empty());

    let spans = tracer.finished_spans();
    assert_eq!(spans.len(), 1);
    let span = &spans[0];
    assert_eq!(span.status, SpanStatus::Error);
    assert_eq!(span.resource.as_deref(), Some("GET 503"));
    assert!(span.tags.contains_key(tags::ERROR_STACK));
}

#[tokio::test]
async fn test_client_error_status_not_flagged() {
    let (tracer, layer) = traced_layer("web");
    let svc = layer.layer(service_fn(|_req: Request<Body>| async {
        Ok::<_, Infallible>(text_response(StatusCode::NOT_FOUND, "missing"))
    }));

    let response = svc.oneshot(get_request("/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let spans = tracer.finished_spans();
    assert_eq!(spans[0].status, SpanStatus::Ok);
    assert_eq!(spans[0].resource.as_deref(), Some("GET 404"));
    assert!(!spans[0].tags.contains_key(tags::ERROR_STACK));
}

#[tokio::test]
async fn test_downstream_tags_win_over_defaults() {
    let (tracer, layer) = traced_layer("web");
    let svc = layer.layer(service_fn(|req: Request<Body>| async move {
        let ctx = RequestContext::from_request(&req).unwrap();
        ctx.span().set_tag(tags::HTTP_METHOD, "POST");
        Ok::<_, Infallible>(text_response(StatusCode::OK, ""))
    }));

    svc.oneshot(get_request("/foo")).await.unwrap();

    let spans = tracer.finished_spans();
    let span = &spans[0];
    assert_eq!(span.tags.get(tags::HTTP_METHOD).map(String::as_str), Some("POST"));
    // The remaining defaults are still applied.
    assert_eq!(span.tags.get(tags::HTTP_URL).map(String::as_str), Some("/foo"));
    assert_eq!(
        span.tags.get(tags::HTTP_STATUS_CODE).map(String::as_str),
        Some("200")
    );
}

#[tokio::test]
async fn test_downstream_resource_wins_over_default() {
    let (tracer, layer) = traced_layer("web");
    let svc = layer.layer(service_fn(|req: Request<Body>| async move {
        let ctx = RequestContext::from_request(&req).unwrap();
        ctx.span().set_resource("GET /users/:id");
        Ok::<_, Infallible>(text_response(StatusCode::OK, ""))
    }));

    svc.oneshot(get_request("/users/42")).await.unwrap();

    let spans = tracer.finished_spans();
    assert_eq!(spans[0].resource.as_deref(), Some("GET /users/:id"));
}

#[tokio::test]
async fn test_disabled_middleware_passes_through() {
    let config = TraceConfig {
        service_name: "web".to_string(),
        enabled: false,
    };
    let (tracer, layer) = traced_layer_with_config(config);
    let svc = layer.layer(service_fn(|req: Request<Body>| async move {
        assert!(RequestContext::from_request(&req).is_none());
        Ok::<_, Infallible>(text_response(StatusCode::OK, "ok"))
    }));

    let response = svc.oneshot(get_request("/foo")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(tracer.finished_spans().is_empty());
}

#[tokio::test]
async fn test_concurrent_requests_get_separate_spans() {
    let (tracer, layer) = traced_layer("web");
    let svc = layer.layer(service_fn(|_req: Request<Body>| async {
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        Ok::<_, Infallible>(text_response(StatusCode::OK, ""))
    }));

    let calls = (0..8).map(|i| {
        let mut svc = svc.clone();
        async move {
            svc.ready().await.unwrap();
            svc.call(get_request(&format!("/req/{i}"))).await.unwrap()
        }
    });
    join_all(calls).await;

    let spans = tracer.finished_spans();
    assert_eq!(spans.len(), 8);
    let mut urls: Vec<_> = spans
        .iter()
        .filter_map(|s| s.tags.get(tags::HTTP_URL).cloned())
        .collect();
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), 8);
}

#[tokio::test]
async fn test_service_registered_once_at_construction() {
    let (tracer, layer) = traced_layer("web");
    let svc = layer.layer(service_fn(|_req: Request<Body>| async {
        Ok::<_, Infallible>(text_response(StatusCode::OK, ""))
    }));

    for _ in 0..3 {
        svc.clone().oneshot(get_request("/foo")).await.unwrap();
    }

    let services = tracer.registered_services();
    assert_eq!(services.len(), 1);
    assert_eq!(
        services.get("web"),
        Some(&("http".to_string(), "web".to_string()))
    );
}

#[test]
fn test_empty_service_name_rejected_at_construction() {
    let tracer = trace_middleware::InMemoryTracer::new();
    let config = TraceConfig {
        service_name: "  ".to_string(),
        ..TraceConfig::default()
    };
    let err = SpanLifecycleManager::new(Arc::new(tracer), config).unwrap_err();
    assert_eq!(err, ConfigError::EmptyServiceName);
}
