//! API Gateway Main Entry Point
//!
//! Routes public traffic to the identity service and the promocode API.

use actix_middleware::RequestLogging;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use api_gateway::config::GatewaySettings;
use api_gateway::proxy::{self, Proxy};
use api_gateway::RouteTable;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::prelude::*;

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api_gateway=info,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
        .init();

    info!("Starting API Gateway");

    let settings = GatewaySettings::load().context("Failed to load configuration")?;
    info!(
        user_service = %settings.user_service_url,
        promo_service = %settings.promo_service_url,
        timeout_secs = settings.upstream_timeout.as_secs(),
        "Upstreams configured"
    );

    let routes = RouteTable::platform_default(
        settings.user_service_url.clone(),
        settings.promo_service_url.clone(),
    );
    let proxy = web::Data::new(
        Proxy::new(routes, settings.upstream_timeout).context("Failed to build HTTP client")?,
    );

    let bind_addr = ("0.0.0.0", settings.port);
    info!(port = settings.port, "API Gateway listening");

    HttpServer::new(move || {
        App::new()
            .wrap(RequestLogging)
            .wrap(TracingLogger::default())
            .app_data(proxy.clone())
            .configure(proxy::configure)
            .default_service(web::to(proxy::forward))
    })
    .bind(bind_addr)
    .context("Failed to bind HTTP listener")?
    .run()
    .await
    .context("HTTP server error")?;

    info!("API Gateway shutdown complete");
    Ok(())
}
