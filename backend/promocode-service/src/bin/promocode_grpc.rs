//! Promocode gRPC server
//!
//! Owns the PostgreSQL pool and serves `promocode.v1.Promocodes` plus the
//! standard gRPC health service.

use anyhow::{Context, Result};
use promocode_service::config::GrpcSettings;
use promocode_service::grpc::promocodes_server::PromocodesServer;
use promocode_service::{PgPromocodeRepository, PromocodeGrpcService, PromocodeService};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tonic::transport::Server;
use tonic_health::server::health_reporter;
use tracing::{error, info};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "promocode_service=info,promocode_grpc=info,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
        .init();

    info!("Starting promocode gRPC server");

    let settings = GrpcSettings::load().context("Failed to load configuration")?;

    let db_pool = db_pool::create_pool(&settings.database)
        .await
        .context("Failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations completed");

    let service = PromocodeService::new(Arc::new(PgPromocodeRepository::new(db_pool)));

    let (mut health, health_service) = health_reporter();
    health
        .set_serving::<PromocodesServer<PromocodeGrpcService>>()
        .await;

    let addr: SocketAddr = format!("0.0.0.0:{}", settings.port)
        .parse()
        .context("Invalid server address")?;
    info!(%addr, "gRPC server listening");

    Server::builder()
        .add_service(health_service)
        .add_service(PromocodeGrpcService::new(service).into_server())
        .serve_with_shutdown(addr, shutdown_signal())
        .await
        .context("gRPC server error")?;

    info!("Promocode gRPC server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutting down gracefully...");
}
