//! Reverse proxy handler
//!
//! The request is relayed with its method, path, query, end-to-end headers
//! and body untouched. The upstream response comes back the same way. If the
//! client goes away the handler future is dropped, which drops the upstream
//! call with it.

use actix_web::http::header::{HeaderName as ActixHeaderName, HeaderValue as ActixHeaderValue};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use error_types::ServiceError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::json;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, warn};

use crate::routing::{Backend, RouteTable};

/// Largest request body the gateway buffers before forwarding
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Connection-scoped headers that never cross the proxy
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Shared forwarding state: one connection-pooling client for all routes
pub struct Proxy {
    client: reqwest::Client,
    routes: RouteTable,
}

impl Proxy {
    /// `timeout` bounds connecting and the whole upstream exchange.
    /// Redirects are relayed to the caller, not followed.
    pub fn new(routes: RouteTable, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client, routes })
    }
}

/// Local routes and body limits; `web::Data<Proxy>` is registered by the
/// caller so every worker shares one client
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
        .route("/health", web::get().to(health));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Header names listed in `Connection` are hop-by-hop for this message too
fn connection_tokens<'a>(values: impl Iterator<Item = &'a [u8]>) -> HashSet<String> {
    values
        .filter_map(|v| std::str::from_utf8(v).ok())
        .flat_map(|v| v.split(','))
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn is_end_to_end(name: &str, extra: &HashSet<String>) -> bool {
    !HOP_BY_HOP.contains(&name) && !extra.contains(name)
}

/// Copy end-to-end request headers and append the caller to `X-Forwarded-For`
fn upstream_headers(req: &HttpRequest) -> HeaderMap {
    let extra = connection_tokens(req.headers().get_all("connection").map(|v| v.as_bytes()));
    let mut headers = HeaderMap::new();

    for (name, value) in req.headers() {
        let lower = name.as_str();
        if !is_end_to_end(lower, &extra)
            || matches!(lower, "host" | "content-length" | X_FORWARDED_FOR)
        {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(lower.as_bytes()),
            HeaderValue::from_bytes(value.as_bytes()),
        ) {
            headers.append(name, value);
        }
    }

    let prior: Vec<&str> = req
        .headers()
        .get_all(X_FORWARDED_FOR)
        .filter_map(|v| v.to_str().ok())
        .collect();
    let peer = req.peer_addr().map(|addr| addr.ip().to_string());
    let forwarded = prior
        .into_iter()
        .map(str::to_string)
        .chain(peer)
        .collect::<Vec<_>>()
        .join(", ");
    if let Ok(value) = HeaderValue::from_str(&forwarded) {
        if !forwarded.is_empty() {
            headers.insert(X_FORWARDED_FOR, value);
        }
    }

    headers
}

fn upstream_error(backend: &Backend, err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::Timeout {
            operation: format!("{} request", backend.name),
        };
    }
    ServiceError::ExternalService {
        service: backend.name.to_string(),
        source: Box::new(err),
    }
}

/// Catch-all handler: route by prefix, forward, relay
pub async fn forward(
    req: HttpRequest,
    body: web::Bytes,
    proxy: web::Data<Proxy>,
) -> Result<HttpResponse, ServiceError> {
    let path = req.path();
    info!(method = %req.method(), path, "Gateway received request");

    let Some(backend) = proxy.routes.route(path, req.method()) else {
        warn!(method = %req.method(), path, "No route for request");
        return Err(ServiceError::not_found("route"));
    };
    info!(backend = backend.name, path, "Proxying request");

    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or(path);
    let url = backend
        .upstream_url(path_and_query)
        .map_err(|e| ServiceError::invalid_input(format!("invalid request path: {e}")))?;
    let method = reqwest::Method::from_bytes(req.method().as_str().as_bytes())
        .map_err(|_| ServiceError::invalid_input("unsupported method"))?;

    let upstream = proxy
        .client
        .request(method, url)
        .headers(upstream_headers(&req))
        .body(body)
        .send()
        .await
        .map_err(|e| upstream_error(backend, e))?;

    let status = StatusCode::from_u16(upstream.status().as_u16()).map_err(ServiceError::internal)?;
    let mut response = HttpResponse::build(status);

    let extra = connection_tokens(
        upstream
            .headers()
            .get_all("connection")
            .iter()
            .map(|v| v.as_bytes()),
    );
    for (name, value) in upstream.headers() {
        if !is_end_to_end(name.as_str(), &extra) || name.as_str() == "content-length" {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            ActixHeaderName::from_bytes(name.as_str().as_bytes()),
            ActixHeaderValue::from_bytes(value.as_bytes()),
        ) {
            response.append_header((name, value));
        }
    }

    let bytes = upstream
        .bytes()
        .await
        .map_err(|e| upstream_error(backend, e))?;

    Ok(response.body(bytes))
}
