//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router from the control routing table
//! - Wire up middleware (request ID, tracing, timeout, body limit, metrics)
//! - Bind server to listener
//! - Serve until the shutdown coordinator fires

use axum::{extract::DefaultBodyLimit, middleware, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::control::{setup_control_router, ControlGateway, ControlState};
use crate::http::request::{request_span, MakeRequestUuidV4, X_REQUEST_ID};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// HTTP server for the control API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server serving `gateway`.
    pub fn new(config: ServerConfig, gateway: Arc<ControlGateway>) -> Self {
        let router = Self::build_router(&config, ControlState::new(gateway));
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: ControlState) -> Router {
        setup_control_router(state)
            .route_layer(middleware::from_fn(metrics::track_requests))
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
    }

    /// The router with all middleware, for driving without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
