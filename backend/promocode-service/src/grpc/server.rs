use crate::grpc::messages::{
    CreatePromocodeRequest, DeletePromocodeRequest, GetPromocodeRequest, ListPromocodesRequest,
    ListPromocodesResponse, PromocodeResponse, UpdatePromocodeRequest,
};
use crate::grpc::promocodes_server::{Promocodes, PromocodesServer};
use crate::models::{NewPromocode, Page, PromocodeRequest};
use crate::service::PromocodeService;
use error_types::{ServiceError, ServiceResult};
use tonic::{Request, Response, Status};

/// gRPC adapter over `PromocodeService`
#[derive(Clone)]
pub struct PromocodeGrpcService {
    service: PromocodeService,
}

impl PromocodeGrpcService {
    pub fn new(service: PromocodeService) -> Self {
        Self { service }
    }

    pub fn into_server(self) -> PromocodesServer<Self> {
        PromocodesServer::new(self)
    }
}

fn positive(field: &str, value: i64) -> ServiceResult<i64> {
    if value <= 0 {
        return Err(ServiceError::invalid_input(format!(
            "{field} must be a positive integer"
        )));
    }
    Ok(value)
}

/// Zero means "use the default"
fn non_zero(value: i64) -> Option<i64> {
    (value != 0).then_some(value)
}

#[tonic::async_trait]
impl Promocodes for PromocodeGrpcService {
    async fn create_promocode(
        &self,
        request: Request<CreatePromocodeRequest>,
    ) -> Result<Response<PromocodeResponse>, Status> {
        let req = request.into_inner();
        let creator_id = positive("creator_id", req.creator_id)?;
        let fields = PromocodeRequest {
            name: req.name,
            description: req.description,
            discount: Some(req.discount),
            code: req.code,
        }
        .into_changes()?;

        let promocode = self
            .service
            .create(NewPromocode {
                name: fields.name,
                description: fields.description,
                creator_id,
                discount: fields.discount,
                code: fields.code,
            })
            .await?;

        Ok(Response::new(promocode.into()))
    }

    async fn get_promocode(
        &self,
        request: Request<GetPromocodeRequest>,
    ) -> Result<Response<PromocodeResponse>, Status> {
        let id = positive("id", request.into_inner().id)?;
        let promocode = self.service.get(id).await?;
        Ok(Response::new(promocode.into()))
    }

    async fn update_promocode(
        &self,
        request: Request<UpdatePromocodeRequest>,
    ) -> Result<Response<PromocodeResponse>, Status> {
        let req = request.into_inner();
        let id = positive("id", req.id)?;
        let requester_id = positive("requester_id", req.requester_id)?;
        let changes = PromocodeRequest {
            name: req.name,
            description: req.description,
            discount: Some(req.discount),
            code: req.code,
        }
        .into_changes()?;

        let promocode = self.service.update(id, changes, requester_id).await?;
        Ok(Response::new(promocode.into()))
    }

    async fn delete_promocode(
        &self,
        request: Request<DeletePromocodeRequest>,
    ) -> Result<Response<PromocodeResponse>, Status> {
        let req = request.into_inner();
        let id = positive("id", req.id)?;
        let requester_id = positive("requester_id", req.requester_id)?;

        let snapshot = self.service.delete(id, requester_id).await?;
        Ok(Response::new(snapshot.into()))
    }

    async fn list_promocodes(
        &self,
        request: Request<ListPromocodesRequest>,
    ) -> Result<Response<ListPromocodesResponse>, Status> {
        let req = request.into_inner();
        let page = Page::from_query(non_zero(req.page), non_zero(req.per_page));

        let (items, total) = self.service.list(page).await?;
        Ok(Response::new(ListPromocodesResponse {
            items: items.into_iter().map(Into::into).collect(),
            total,
            page: page.page,
            per_page: page.per_page,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryPromocodeRepository;
    use std::sync::Arc;
    use tonic::Code;

    fn adapter() -> PromocodeGrpcService {
        PromocodeGrpcService::new(PromocodeService::new(Arc::new(
            InMemoryPromocodeRepository::new(),
        )))
    }

    fn create_req(creator_id: i64, code: &str) -> Request<CreatePromocodeRequest> {
        Request::new(CreatePromocodeRequest {
            name: "Promo".into(),
            description: String::new(),
            creator_id,
            discount: 10.0,
            code: code.into(),
        })
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let svc = adapter();
        let created = svc
            .create_promocode(create_req(1, "CODE123"))
            .await
            .unwrap()
            .into_inner()
            .promocode
            .unwrap();
        assert_eq!(created.creator_id, 1);

        let fetched = svc
            .get_promocode(Request::new(GetPromocodeRequest { id: created.id }))
            .await
            .unwrap()
            .into_inner()
            .promocode
            .unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_bad_shape_is_invalid_argument() {
        let svc = adapter();

        let status = svc.create_promocode(create_req(0, "CODE123")).await.unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);

        let status = svc.create_promocode(create_req(1, "X")).await.unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);

        let status = svc
            .get_promocode(Request::new(GetPromocodeRequest { id: -3 }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_domain_errors_map_to_status_codes() {
        let svc = adapter();
        let created = svc
            .create_promocode(create_req(1, "CODE123"))
            .await
            .unwrap()
            .into_inner()
            .promocode
            .unwrap();

        let dup = svc.create_promocode(create_req(2, "CODE123")).await.unwrap_err();
        assert_eq!(dup.code(), Code::AlreadyExists);

        let forbidden = svc
            .delete_promocode(Request::new(DeletePromocodeRequest {
                id: created.id,
                requester_id: 2,
            }))
            .await
            .unwrap_err();
        assert_eq!(forbidden.code(), Code::PermissionDenied);

        let missing = svc
            .get_promocode(Request::new(GetPromocodeRequest { id: 999 }))
            .await
            .unwrap_err();
        assert_eq!(missing.code(), Code::NotFound);
    }

    #[tokio::test]
    async fn test_list_defaults_when_unset() {
        let svc = adapter();
        for i in 0..12 {
            svc.create_promocode(create_req(1, &format!("CODE{i:02}")))
                .await
                .unwrap();
        }

        let resp = svc
            .list_promocodes(Request::new(ListPromocodesRequest::default()))
            .await
            .unwrap()
            .into_inner();
        assert_eq!((resp.page, resp.per_page, resp.total), (1, 10, 12));
        assert_eq!(resp.items.len(), 10);
    }
}
