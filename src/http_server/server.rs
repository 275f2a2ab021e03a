//! # HTTP Server
//!
//! Binds the listener and serves the form and health routes until Ctrl-C.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::config::HttpServerConfig;
use super::form_routes::{form_routes, FormState};
use super::health_routes::health_routes;

/// HTTP server for filtered form responses
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(config: HttpServerConfig, state: Arc<FormState>) -> Self {
        Self {
            config,
            router: build_router(state),
        }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind the configured address and serve until Ctrl-C
    pub async fn start(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until Ctrl-C
    pub async fn serve(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        info!(%addr, "formfilter HTTP server listening");
        info!("Health check: http://{}/health", addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }
}

/// Router with every route and the request trace layer
pub fn build_router(state: Arc<FormState>) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(form_routes(state))
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C; shutting down");
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::QueryExecutor;
    use crate::store::InMemoryStore;

    fn state() -> Arc<FormState> {
        let executor = QueryExecutor::new(Arc::new(InMemoryStore::new()));
        Arc::new(FormState::new(executor, "form-1"))
    }

    #[test]
    fn test_server_with_custom_port() {
        let server = HttpServer::new(HttpServerConfig::with_port(9090), state());
        assert_eq!(server.socket_addr(), "0.0.0.0:9090");
    }

    #[test]
    fn test_router_builds() {
        let server = HttpServer::new(HttpServerConfig::default(), state());
        let _router = server.router();
    }
}
