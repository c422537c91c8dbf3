//! API Gateway Library
//!
//! Single public entry point. Picks a backend by longest path prefix and
//! relays the request to it unchanged apart from hop-by-hop headers.
//!
//! ## Modules
//!
//! - `config`: Listen port, upstream URLs and timeout
//! - `proxy`: Request forwarding over a shared HTTP client
//! - `routing`: Prefix route table

pub mod config;
pub mod proxy;
pub mod routing;

pub use proxy::Proxy;
pub use routing::{Backend, RouteTable};
