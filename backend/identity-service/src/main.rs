//! Identity Service Main Entry Point
//!
//! Starts the HTTP server with:
//! - PostgreSQL connection pool (migrations applied on startup)
//! - HS256 token service shared with the promocode API

use actix_web::{App, HttpServer};
use anyhow::{Context, Result};
use crypto_core::TokenService;
use identity_service::{config::Settings, http, PgUserRepository, UserService};
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
                .unwrap_or_else(|_| "identity_service=info,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
        .init();

    info!("Starting Identity Service");

    let settings = Settings::load().context("Failed to load configuration")?;

    let db_pool = db_pool::create_pool(&settings.database)
        .await
        .context("Failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations completed");

    let tokens = Arc::new(TokenService::new(
        settings.jwt_secret.expose_secret().as_bytes(),
        settings.token_ttl,
    ));
    let service = UserService::new(Arc::new(PgUserRepository::new(db_pool)), tokens);

    let bind_addr = ("0.0.0.0", settings.port);
    info!(port = settings.port, "Identity service listening");

    HttpServer::new(move || {
        let service = service.clone();
        App::new()
            .wrap(TracingLogger::default())
            .configure(|cfg| http::configure(cfg, service))
    })
    .bind(bind_addr)
    .context("Failed to bind HTTP listener")?
    .run()
    .await
    .context("HTTP server error")?;

    info!("Identity service shutdown complete");
    Ok(())
}
