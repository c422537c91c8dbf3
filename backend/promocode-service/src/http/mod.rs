//! REST front of the promocode RPC surface
//!
//! Every `/api/promocodes` route sits behind `JwtAuthMiddleware`. The caller's
//! identity travels to the RPC layer as `creator_id` / `requester_id`; a
//! creator id in the request body is never trusted.

use actix_middleware::{JwtAuthMiddleware, UserId};
use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web, HttpRequest, HttpResponse,
};
use crypto_core::TokenService;
use error_types::ServiceError;
use serde_json::json;
use std::sync::Arc;

use crate::grpc::messages::{CreatePromocodeRequest, UpdatePromocodeRequest};
use crate::grpc::PromocodeRpc;
use crate::models::pagination::PageQuery;
use crate::models::{DeleteResponse, Page, PromocodeRequest};

/// Handler state: whichever RPC client the binary wired up
#[derive(Clone)]
pub struct PromocodeApi {
    rpc: Arc<dyn PromocodeRpc>,
}

impl PromocodeApi {
    pub fn new(rpc: Arc<dyn PromocodeRpc>) -> Self {
        Self { rpc }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig, api: PromocodeApi, tokens: Arc<TokenService>) {
    cfg.app_data(web::Data::new(api))
        .app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
        .route("/health", web::get().to(health))
        .service(
            web::scope("/api/promocodes")
                .wrap(JwtAuthMiddleware::new(tokens))
                .service(
                    web::resource(["", "/"])
                        .route(web::post().to(create_promocode))
                        .route(web::get().to(list_promocodes)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(get_promocode))
                        .route(web::put().to(update_promocode))
                        .route(web::delete().to(delete_promocode)),
                ),
        );
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        ServiceError::invalid_input(format!("invalid request body: {err}")).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|_err: PathError, _req: &HttpRequest| {
        ServiceError::invalid_input("invalid promocode id").into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
        ServiceError::invalid_input(format!("invalid query string: {err}")).into()
    })
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

async fn create_promocode(
    api: web::Data<PromocodeApi>,
    user_id: UserId,
    body: web::Json<PromocodeRequest>,
) -> Result<HttpResponse, ServiceError> {
    let fields = body.into_inner().into_changes()?;

    let promocode = api
        .rpc
        .create(CreatePromocodeRequest {
            name: fields.name,
            description: fields.description,
            creator_id: user_id.0,
            discount: fields.discount,
            code: fields.code,
        })
        .await?;

    Ok(HttpResponse::Created().json(promocode))
}

async fn get_promocode(
    api: web::Data<PromocodeApi>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ServiceError> {
    let promocode = api.rpc.get(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(promocode))
}

async fn update_promocode(
    api: web::Data<PromocodeApi>,
    user_id: UserId,
    id: web::Path<i64>,
    body: web::Json<PromocodeRequest>,
) -> Result<HttpResponse, ServiceError> {
    let changes = body.into_inner().into_changes()?;

    let promocode = api
        .rpc
        .update(UpdatePromocodeRequest {
            id: id.into_inner(),
            requester_id: user_id.0,
            name: changes.name,
            description: changes.description,
            discount: changes.discount,
            code: changes.code,
        })
        .await?;

    Ok(HttpResponse::Ok().json(promocode))
}

async fn delete_promocode(
    api: web::Data<PromocodeApi>,
    user_id: UserId,
    id: web::Path<i64>,
) -> Result<HttpResponse, ServiceError> {
    let snapshot = api.rpc.delete(id.into_inner(), user_id.0).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse::from(snapshot)))
}

async fn list_promocodes(
    api: web::Data<PromocodeApi>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, ServiceError> {
    let page = Page::from(query.into_inner());
    let list = api.rpc.list(page).await?;
    Ok(HttpResponse::Ok().json(list))
}
