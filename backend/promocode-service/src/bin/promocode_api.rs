//! Promocode REST API
//!
//! Authenticates callers and forwards every operation to the promocode gRPC
//! server over one channel created at startup.

use actix_web::{App, HttpServer};
use anyhow::{Context, Result};
use crypto_core::{TokenService, DEFAULT_TOKEN_TTL};
use promocode_service::config::ApiSettings;
use promocode_service::http::{self, PromocodeApi};
use promocode_service::GrpcPromocodeClient;
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::prelude::*;

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "promocode_service=info,promocode_api=info,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
        .init();

    info!("Starting promocode API");

    let settings = ApiSettings::load().context("Failed to load configuration")?;

    let rpc = GrpcPromocodeClient::connect_lazy(&settings.grpc_server_addr, settings.rpc_timeout)
        .context("Invalid GRPC_SERVER_ADDR")?;
    info!(
        addr = %settings.grpc_server_addr,
        timeout_secs = settings.rpc_timeout.as_secs(),
        "gRPC channel configured"
    );

    // Only validation is done here, so the TTL is never used for issuing
    let tokens = Arc::new(TokenService::new(
        settings.jwt_secret.expose_secret().as_bytes(),
        DEFAULT_TOKEN_TTL,
    ));
    let api = PromocodeApi::new(Arc::new(rpc));

    let bind_addr = ("0.0.0.0", settings.port);
    info!(port = settings.port, "Promocode API listening");

    HttpServer::new(move || {
        let api = api.clone();
        let tokens = tokens.clone();
        App::new()
            .wrap(TracingLogger::default())
            .configure(|cfg| http::configure(cfg, api, tokens))
    })
    .bind(bind_addr)
    .context("Failed to bind HTTP listener")?
    .run()
    .await
    .context("HTTP server error")?;

    info!("Promocode API shutdown complete");
    Ok(())
}
