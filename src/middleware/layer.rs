//! Tower integration.
//!
//! # Responsibilities
//! - Wrap any `http::Request → Response` service with span lifecycle handling
//! - Preserve the inner service's response and error types unchanged
//!
//! # Design Decisions
//! - One manager is shared across all clones of the service
//! - The inner service is swapped out per call so the traced future owns the
//!   instance whose readiness was just observed

use std::fmt;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::{Request, Response};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use crate::middleware::manager::SpanLifecycleManager;

/// Layer that applies [`HttpTrace`] to an inner service.
#[derive(Clone)]
pub struct HttpTraceLayer {
    manager: Arc<SpanLifecycleManager>,
}

impl HttpTraceLayer {
    pub fn new(manager: Arc<SpanLifecycleManager>) -> Self {
        Self { manager }
    }
}

impl<S> Layer<S> for HttpTraceLayer {
    type Service = HttpTrace<S>;

    fn layer(&self, inner: S) -> Self::Service {
        HttpTrace {
            inner,
            manager: self.manager.clone(),
        }
    }
}

/// Middleware service that traces each request through the manager.
#[derive(Clone)]
pub struct HttpTrace<S> {
    inner: S,
    manager: Arc<SpanLifecycleManager>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for HttpTrace<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Error: fmt::Display + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let manager = self.manager.clone();

        Box::pin(async move {
            manager
                .handle_request(request, move |req| inner.call(req))
                .await
        })
    }
}
