//! Promocode storage
//!
//! Both implementations enforce a unique `code`; a violation surfaces as
//! `ServiceError::Conflict`.

use crate::models::{NewPromocode, Page, Promocode, PromocodeChanges};
use error_types::ServiceResult;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryPromocodeRepository;
pub use postgres::PgPromocodeRepository;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PromocodeRepository: Send + Sync {
    async fn create(&self, new: NewPromocode) -> ServiceResult<Promocode>;

    async fn find_by_id(&self, id: i64) -> ServiceResult<Option<Promocode>>;

    /// Replace the mutable fields; `None` when the row does not exist
    async fn update(&self, id: i64, changes: PromocodeChanges)
        -> ServiceResult<Option<Promocode>>;

    /// `false` when there was nothing to delete
    async fn delete(&self, id: i64) -> ServiceResult<bool>;

    /// One page ordered by id together with the total row count, both read
    /// from the same snapshot
    async fn list(&self, page: Page) -> ServiceResult<(Vec<Promocode>, i64)>;
}
