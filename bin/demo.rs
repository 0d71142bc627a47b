//! Demo server wiring the tracing middleware into an axum router.
//!
//! Routes exercise the paths the middleware distinguishes: a plain success, a
//! handler that names its own span, and an error status.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::Extension, http::StatusCode, routing::get, Router};
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trace_middleware::{
    HttpTraceLayer, LogTracer, RequestContext, Span, SpanLifecycleManager, TraceConfig,
};

#[derive(Parser)]
#[command(name = "demo", about = "Demo server for the tracing middleware", long_about = None)]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// Service name bound to request spans.
    #[arg(long, default_value = "demo-web")]
    service: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trace_middleware=debug,demo=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = TraceConfig {
        service_name: args.service,
        ..TraceConfig::default()
    };
    let manager = Arc::new(SpanLifecycleManager::new(
        Arc::new(LogTracer::new()),
        config,
    )?);

    let app = Router::new()
        .route("/", get(ok_handler))
        .route("/named", get(named_handler))
        .route("/unavailable", get(unavailable_handler))
        .layer(HttpTraceLayer::new(manager))
        .layer(TimeoutLayer::new(Duration::from_secs(30)));

    let listener = TcpListener::bind(&args.bind).await?;
    tracing::info!(address = %listener.local_addr()?, "demo server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn ok_handler() -> &'static str {
    "ok"
}

/// Names its own span instead of taking the middleware default.
async fn named_handler(Extension(ctx): Extension<RequestContext>) -> &'static str {
    ctx.span().set_resource("GET /named");
    ctx.span().set_tag("handler", "named");
    "named"
}

async fn unavailable_handler() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "try later")
}
