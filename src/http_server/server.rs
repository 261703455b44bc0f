//! # HTTP Server
//!
//! Axum host for the user dispatcher.
//!
//! Requests pass through, outermost first:
//! 1. Request ID injection (`X-Request-Id`)
//! 2. Request/response tracing
//! 3. CORS
//! 4. Routing to `/health` or the user routes

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use super::config::{HttpConfigError, HttpServerConfig};
use super::health_routes::health_routes;
use super::user_routes::{user_routes, UserState};
use crate::dispatcher::DispatchPolicy;
use crate::store::SharedStore;

/// HTTP server for the user resource
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(
        config: HttpServerConfig,
        store: SharedStore,
        policy: DispatchPolicy,
    ) -> Result<Self, HttpConfigError> {
        let router = build_router(&config, UserState::new(store, policy))?;
        Ok(Self { config, router })
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Serve until Ctrl+C or SIGTERM
    pub async fn start(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        let local_addr = listener.local_addr()?;
        info!(addr = %local_addr, "User service listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("User service stopped");
        Ok(())
    }
}

/// Assemble routes and middleware. Fails on a CORS origin that cannot be
/// used, rather than serving without it.
pub fn build_router(
    config: &HttpServerConfig,
    state: UserState,
) -> Result<Router, HttpConfigError> {
    let origins = config.allowed_origins()?;
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        .merge(health_routes())
        .merge(user_routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(inject_request_id)))
}

/// Tag every response with a fresh `X-Request-Id`
async fn inject_request_id(mut req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(request_id.clone());

    let mut response = next.run(req).await;

    if let Ok(value) = request_id.parse() {
        response.headers_mut().insert("x-request-id", value);
    }

    response
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C"),
        () = terminate => info!("Received SIGTERM"),
    }

    warn!("Draining in-flight requests");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryUserStore;
    use std::sync::Arc;

    fn server(config: HttpServerConfig) -> Result<HttpServer, HttpConfigError> {
        HttpServer::new(
            config,
            Arc::new(MemoryUserStore::new()),
            DispatchPolicy::default(),
        )
    }

    #[test]
    fn test_server_creation() {
        let server = server(HttpServerConfig::default()).unwrap();
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_router_builds_with_cors_origins() {
        let config = HttpServerConfig {
            cors_origins: vec!["http://localhost:5173".to_string()],
            ..HttpServerConfig::on_port(9000)
        };
        assert!(server(config).is_ok());
    }

    #[test]
    fn test_bad_cors_origin_fails_construction() {
        let config = HttpServerConfig {
            cors_origins: vec!["*".to_string()],
            ..Default::default()
        };
        assert_eq!(server(config).err(), Some(HttpConfigError::WildcardOrigin));
    }
}
