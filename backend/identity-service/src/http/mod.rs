//! HTTP surface of identity-service
//!
//! - `POST /register`: 201 with the public profile
//! - `POST /login`: 200 `{token}`
//! - `GET /profile`, `PUT /profile`: bearer token required
//! - `GET /health`

use actix_middleware::{JwtAuthMiddleware, UserId};
use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};
use error_types::ServiceError;
use serde_json::json;

use crate::models::{LoginRequest, LoginResponse, RegisterRequest, UpdateProfileRequest};
use crate::services::UserService;

/// Register all identity routes on an Actix app
pub fn configure(cfg: &mut web::ServiceConfig, service: UserService) {
    let auth = JwtAuthMiddleware::new(service.tokens());

    cfg.app_data(web::Data::new(service))
        .app_data(json_config())
        .route("/health", web::get().to(health))
        .route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        .service(
            web::resource("/profile")
                .wrap(auth)
                .route(web::get().to(get_profile))
                .route(web::put().to(update_profile)),
        );
}

/// Malformed JSON bodies use the shared error envelope
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        ServiceError::invalid_input(format!("invalid request body: {err}")).into()
    })
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

async fn register(
    service: web::Data<UserService>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user = service.register(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

async fn login(
    service: web::Data<UserService>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ServiceError> {
    let token = service.login(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}

async fn get_profile(
    service: web::Data<UserService>,
    user_id: UserId,
) -> Result<HttpResponse, ServiceError> {
    let user = service.profile(user_id.0).await?;
    Ok(HttpResponse::Ok().json(user))
}

async fn update_profile(
    service: web::Data<UserService>,
    user_id: UserId,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user = service.update_profile(user_id.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}
