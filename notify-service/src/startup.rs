//! Application startup and lifecycle management.

use crate::config::NotifyConfig;
use crate::handlers::{health_check, notify_signup, preflight, readiness_check};
use crate::services::{EmailProvider, MockEmailProvider, ResendProvider};
use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Shared application state. The provider is constructed once at startup and
/// read-only afterwards; handlers share it across concurrent requests.
#[derive(Clone)]
pub struct AppState {
    pub config: NotifyConfig,
    pub email_provider: Arc<dyn EmailProvider>,
}

pub fn build_router(state: AppState) -> Router {
    // Every response carries the wildcard origin grant; the preflight route
    // adds the allowed-headers list itself.
    Router::new()
        .route("/notify", post(notify_signup).options(preflight))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration, selecting the
    /// Resend provider when enabled and the mock provider otherwise.
    pub async fn build(config: NotifyConfig) -> Result<Self, AppError> {
        let email_provider: Arc<dyn EmailProvider> = if config.resend.enabled {
            let provider = ResendProvider::new(config.resend.clone())
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e.to_string())))?;
            tracing::info!("Resend email provider initialized");
            Arc::new(provider)
        } else {
            tracing::info!("Resend provider disabled, using mock email provider");
            Arc::new(MockEmailProvider::new(true))
        };

        Self::build_with_provider(config, email_provider).await
    }

    /// Build the application with an injected email provider.
    pub async fn build_with_provider(
        config: NotifyConfig,
        email_provider: Arc<dyn EmailProvider>,
    ) -> Result<Self, AppError> {
        let state = AppState {
            config: config.clone(),
            email_provider,
        };

        // Port 0 = random port for testing.
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("notify-service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
