//! Authorization Gateway — entry point.
//!
//! Loads configuration, initializes logging, composes the authorization
//! pipeline and its collaborators, builds the Axum router and serves it
//! until a shutdown signal arrives.

mod composition_root;
mod config;
mod error;
mod handlers;
mod openapi;
mod state;

use crate::composition_root::CompositionRoot;
use crate::config::Config;
use crate::openapi::create_api_doc;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    config.validate()?;

    initialize_logging(&config)?;

    info!("starting authorization gateway");
    info!(address = %config.server_address(), "configuration loaded");

    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;

    let root = CompositionRoot::production(&config);
    let app = build_router(root.app_state.clone(), &config, metrics_handle);

    let listener = tokio::net::TcpListener::bind(config.server_address()).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("authorization gateway shut down gracefully");
    Ok(())
}

fn initialize_logging(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "authz_gateway={},authz_pipeline={},policy_engine={},credential_verifier={},siem_forwarder={},kernel={}",
            config.logging.level, config.logging.level, config.logging.level, config.logging.level, config.logging.level, config.logging.level
        ))
    });

    match config.logging.format.as_str() {
        "json" => {
            tracing_subscriber::registry().with(env_filter).with(fmt::layer().json()).init();
        }
        "compact" => {
            tracing_subscriber::registry().with(env_filter).with(fmt::layer().compact()).init();
        }
        _ => {
            tracing_subscriber::registry().with(env_filter).with(fmt::layer().pretty()).init();
        }
    }

    Ok(())
}

fn build_router(app_state: AppState, config: &Config, metrics_handle: metrics_exporter_prometheus::PrometheusHandle) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/authorize", post(handlers::authorize::authorize))
        .route("/authorize/batch", post(handlers::authorize::authorize_batch))
        .route("/audit", get(handlers::audit::query_audit))
        .route(
            "/metrics",
            get(move || {
                let handle = metrics_handle.clone();
                async move { handle.render() }
            }),
        )
        .with_state(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", create_api_doc()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
        .layer(CorsLayer::permissive())
}

/// Graceful shutdown on Ctrl+C or SIGTERM (spec.md §5 "Cancellation").
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate()).expect("failed to install sigterm handler").recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("received ctrl-c"),
        _ = terminate => warn!("received sigterm"),
    }

    info!("starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_validates_by_default() {
        assert!(Config::default().validate().is_ok());
    }
}
