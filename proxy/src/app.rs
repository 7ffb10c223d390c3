use std::sync::Arc;

use axum::{
    routing::{any, get},
    Router,
};
use car_core::CarApiClient;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::handlers;
use crate::repository::RestCarRepository;
use crate::service::CarService;
use crate::transport::UreqTransport;

/// Route table. `/cars/` is listed on its own because the wildcard does not
/// match an empty tail, and an empty id must still reach the handler.
pub fn app(service: CarService) -> Router {
    Router::new()
        .route("/cars", any(handlers::create))
        .route("/cars/", any(handlers::handle_by_method))
        .route("/cars/{*rest}", any(handlers::handle_by_method))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Wire the upstream repository described by `config` into a service.
pub fn service_from_config(config: &Config) -> CarService {
    let repository = RestCarRepository::new(
        CarApiClient::new(&config.upstream_host),
        UreqTransport::new(config.upstream_timeout),
    );
    CarService::new(Arc::new(repository))
}

pub async fn run(listener: TcpListener, service: CarService) -> Result<(), std::io::Error> {
    axum::serve(listener, app(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
