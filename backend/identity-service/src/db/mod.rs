//! User storage
//!
//! Both implementations enforce unique `login` and unique `email`; a
//! violation surfaces as `ServiceError::Conflict`.

use crate::models::{NewUser, ProfileChanges, User};
use error_types::ServiceResult;

pub mod memory;
pub mod users;

pub use memory::InMemoryUserRepository;
pub use users::PgUserRepository;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return the stored row
    async fn create(&self, new_user: NewUser) -> ServiceResult<User>;

    async fn find_by_login(&self, login: &str) -> ServiceResult<Option<User>>;

    async fn find_by_id(&self, id: i64) -> ServiceResult<Option<User>>;

    /// Apply profile changes; `None` when the user does not exist
    async fn update_profile(&self, id: i64, changes: ProfileChanges)
        -> ServiceResult<Option<User>>;
}
