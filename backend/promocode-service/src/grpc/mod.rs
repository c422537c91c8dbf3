//! Internal RPC surface: `promocode.v1.Promocodes`
//!
//! The server side wraps `PromocodeService`; the client side hides the
//! transport behind `PromocodeRpc` so HTTP handlers can run against either
//! a remote channel or the adapter in the same process.

pub mod client;
pub mod messages;
pub mod server;

#[allow(clippy::all)]
mod generated {
    include!(concat!(env!("OUT_DIR"), "/promocode.v1.Promocodes.rs"));
}

pub use client::{GrpcPromocodeClient, LocalPromocodeRpc, PromocodeRpc};
pub use generated::{promocodes_client, promocodes_server};
pub use server::PromocodeGrpcService;
