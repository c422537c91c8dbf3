/// Promocode Service Library
///
/// Discount codes owned by their creators, served over an internal gRPC
/// surface and a token-protected REST front.
///
/// ## Modules
///
/// - `config`: Settings for the gRPC and API binaries
/// - `grpc`: Wire messages, server adapter and RPC clients
/// - `http`: Actix routes translating REST calls into RPCs
/// - `models`: Data models, request DTOs and pagination
/// - `repository`: Promocode storage (PostgreSQL and in-memory)
/// - `service`: Business logic and ownership checks
pub mod config;
pub mod grpc;
pub mod http;
pub mod models;
pub mod repository;
pub mod service;

pub use grpc::{GrpcPromocodeClient, LocalPromocodeRpc, PromocodeGrpcService, PromocodeRpc};
pub use models::{Page, Promocode};
pub use repository::{InMemoryPromocodeRepository, PgPromocodeRepository, PromocodeRepository};
pub use service::PromocodeService;
