use crate::grpc::messages::{
    CreatePromocodeRequest, DeletePromocodeRequest, GetPromocodeRequest, ListPromocodesRequest,
    ListPromocodesResponse, PromocodeResponse, UpdatePromocodeRequest,
};
use crate::grpc::promocodes_client::PromocodesClient;
use crate::grpc::promocodes_server::Promocodes;
use crate::grpc::PromocodeGrpcService;
use crate::models::{ListResponse, Page, Promocode};
use error_types::{ServiceError, ServiceResult};
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};
use tonic::{Request, Response, Status};

/// Client side of the promocode RPC surface
///
/// Every failure, transport or remote, comes back as a `ServiceError`
/// re-translated from the RPC status.
#[async_trait::async_trait]
pub trait PromocodeRpc: Send + Sync {
    async fn create(&self, req: CreatePromocodeRequest) -> ServiceResult<Promocode>;

    async fn get(&self, id: i64) -> ServiceResult<Promocode>;

    async fn update(&self, req: UpdatePromocodeRequest) -> ServiceResult<Promocode>;

    /// Returns the pre-deletion snapshot
    async fn delete(&self, id: i64, requester_id: i64) -> ServiceResult<Promocode>;

    async fn list(&self, page: Page) -> ServiceResult<ListResponse>;
}

fn one(result: Result<Response<PromocodeResponse>, Status>) -> ServiceResult<Promocode> {
    result.map_err(ServiceError::from)?.into_inner().try_into()
}

fn many(result: Result<Response<ListPromocodesResponse>, Status>) -> ServiceResult<ListResponse> {
    let resp = result.map_err(ServiceError::from)?.into_inner();
    Ok(ListResponse {
        items: resp
            .items
            .into_iter()
            .map(Promocode::try_from)
            .collect::<ServiceResult<_>>()?,
        total: resp.total,
        page: resp.page,
        per_page: resp.per_page,
    })
}

fn list_request(page: Page) -> ListPromocodesRequest {
    ListPromocodesRequest {
        page: page.page,
        per_page: page.per_page,
    }
}

/// Network client over one shared HTTP/2 channel
#[derive(Clone)]
pub struct GrpcPromocodeClient {
    client: PromocodesClient<Channel>,
}

impl GrpcPromocodeClient {
    /// Build the channel once; it connects on first use and reconnects on
    /// its own. `timeout` bounds every call made through it.
    pub fn connect_lazy(addr: &str, timeout: Duration) -> Result<Self, tonic::transport::Error> {
        let uri = if addr.starts_with("http://") || addr.starts_with("https://") {
            addr.to_string()
        } else {
            format!("http://{addr}")
        };

        let channel = Endpoint::from_shared(uri)?
            .connect_timeout(timeout)
            .timeout(timeout)
            .connect_lazy();

        Ok(Self::from_channel(channel))
    }

    pub fn from_channel(channel: Channel) -> Self {
        Self {
            client: PromocodesClient::new(channel),
        }
    }
}

#[async_trait::async_trait]
impl PromocodeRpc for GrpcPromocodeClient {
    async fn create(&self, req: CreatePromocodeRequest) -> ServiceResult<Promocode> {
        one(self.client.clone().create_promocode(req).await)
    }

    async fn get(&self, id: i64) -> ServiceResult<Promocode> {
        one(self
            .client
            .clone()
            .get_promocode(GetPromocodeRequest { id })
            .await)
    }

    async fn update(&self, req: UpdatePromocodeRequest) -> ServiceResult<Promocode> {
        one(self.client.clone().update_promocode(req).await)
    }

    async fn delete(&self, id: i64, requester_id: i64) -> ServiceResult<Promocode> {
        one(self
            .client
            .clone()
            .delete_promocode(DeletePromocodeRequest { id, requester_id })
            .await)
    }

    async fn list(&self, page: Page) -> ServiceResult<ListResponse> {
        many(self.client.clone().list_promocodes(list_request(page)).await)
    }
}

/// In-process client that calls the adapter without a network hop
#[derive(Clone)]
pub struct LocalPromocodeRpc {
    adapter: PromocodeGrpcService,
}

impl LocalPromocodeRpc {
    pub fn new(adapter: PromocodeGrpcService) -> Self {
        Self { adapter }
    }
}

#[async_trait::async_trait]
impl PromocodeRpc for LocalPromocodeRpc {
    async fn create(&self, req: CreatePromocodeRequest) -> ServiceResult<Promocode> {
        one(self.adapter.create_promocode(Request::new(req)).await)
    }

    async fn get(&self, id: i64) -> ServiceResult<Promocode> {
        one(self
            .adapter
            .get_promocode(Request::new(GetPromocodeRequest { id }))
            .await)
    }

    async fn update(&self, req: UpdatePromocodeRequest) -> ServiceResult<Promocode> {
        one(self.adapter.update_promocode(Request::new(req)).await)
    }

    async fn delete(&self, id: i64, requester_id: i64) -> ServiceResult<Promocode> {
        one(self
            .adapter
            .delete_promocode(Request::new(DeletePromocodeRequest { id, requester_id }))
            .await)
    }

    async fn list(&self, page: Page) -> ServiceResult<ListResponse> {
        many(self
            .adapter
            .list_promocodes(Request::new(list_request(page)))
            .await)
    }
}
