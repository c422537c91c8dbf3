pub mod pagination;
pub mod promocode;

pub use pagination::Page;
pub use promocode::{
    DeleteResponse, ListResponse, NewPromocode, Promocode, PromocodeChanges, PromocodeRequest,
};
