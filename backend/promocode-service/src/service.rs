use crate::models::{NewPromocode, Page, Promocode, PromocodeChanges};
use crate::repository::PromocodeRepository;
use error_types::{ServiceError, ServiceResult};
use std::sync::Arc;
use tracing::{info, warn};

/// Promocode operations with creator-only mutation
#[derive(Clone)]
pub struct PromocodeService {
    repo: Arc<dyn PromocodeRepository>,
}

impl PromocodeService {
    pub fn new(repo: Arc<dyn PromocodeRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, new: NewPromocode) -> ServiceResult<Promocode> {
        let promocode = self.repo.create(new).await?;
        info!(
            promocode_id = promocode.id,
            creator_id = promocode.creator_id,
            "Promocode created"
        );
        Ok(promocode)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Promocode> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("promocode"))
    }

    /// Load the promocode and fail closed unless `requester_id` created it
    async fn owned_by(&self, id: i64, requester_id: i64) -> ServiceResult<Promocode> {
        let promocode = self.get(id).await?;
        if promocode.creator_id != requester_id {
            warn!(
                promocode_id = id,
                requester_id,
                creator_id = promocode.creator_id,
                "Rejected change by non-creator"
            );
            return Err(ServiceError::permission_denied(
                "only the creator can modify this promocode",
            ));
        }
        Ok(promocode)
    }

    pub async fn update(
        &self,
        id: i64,
        changes: PromocodeChanges,
        requester_id: i64,
    ) -> ServiceResult<Promocode> {
        self.owned_by(id, requester_id).await?;

        let promocode = self
            .repo
            .update(id, changes)
            .await?
            .ok_or_else(|| ServiceError::not_found("promocode"))?;

        info!(promocode_id = id, "Promocode updated");
        Ok(promocode)
    }

    /// Returns the promocode as it was right before deletion
    pub async fn delete(&self, id: i64, requester_id: i64) -> ServiceResult<Promocode> {
        let snapshot = self.owned_by(id, requester_id).await?;

        // A concurrent delete may have won between the check and here
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("promocode"));
        }

        info!(promocode_id = id, "Promocode deleted");
        Ok(snapshot)
    }

    pub async fn list(&self, page: Page) -> ServiceResult<(Vec<Promocode>, i64)> {
        self.repo.list(page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryPromocodeRepository, MockPromocodeRepository};
    use chrono::Utc;

    const ALICE: i64 = 1;
    const BOB: i64 = 2;

    fn service() -> PromocodeService {
        PromocodeService::new(Arc::new(InMemoryPromocodeRepository::new()))
    }

    fn new_promocode(creator_id: i64, code: &str) -> NewPromocode {
        NewPromocode {
            name: "Promo".into(),
            description: "ten off".into(),
            creator_id,
            discount: 10.0,
            code: code.into(),
        }
    }

    fn changes(code: &str) -> PromocodeChanges {
        PromocodeChanges {
            name: "Promo v2".into(),
            description: "twenty off".into(),
            discount: 20.0,
            code: code.into(),
        }
    }

    fn stored(id: i64, creator_id: i64) -> Promocode {
        let now = Utc::now();
        Promocode {
            id,
            name: "Promo".into(),
            description: String::new(),
            creator_id,
            discount: 10.0,
            code: "CODE123".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_creator_can_update() {
        let svc = service();
        let created = svc.create(new_promocode(ALICE, "CODE123")).await.unwrap();

        let updated = svc
            .update(created.id, changes("CODE456"), ALICE)
            .await
            .unwrap();
        assert_eq!(updated.discount, 20.0);
        assert_eq!(updated.creator_id, ALICE);
    }

    #[tokio::test]
    async fn test_non_creator_cannot_update_or_delete() {
        let svc = service();
        let created = svc.create(new_promocode(ALICE, "CODE123")).await.unwrap();

        let err = svc
            .update(created.id, changes("CODE456"), BOB)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied { .. }));

        let err = svc.delete(created.id, BOB).await.unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied { .. }));

        let still_there = svc.get(created.id).await.unwrap();
        assert_eq!(still_there, created);
    }

    #[tokio::test]
    async fn test_delete_returns_snapshot() {
        let svc = service();
        let created = svc.create(new_promocode(ALICE, "CODE123")).await.unwrap();

        let snapshot = svc.delete(created.id, ALICE).await.unwrap();
        assert_eq!(snapshot, created);

        let err = svc.get(created.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_promocode_is_not_found() {
        let svc = service();
        for err in [
            svc.get(42).await.unwrap_err(),
            svc.update(42, changes("CODE456"), ALICE).await.unwrap_err(),
            svc.delete(42, ALICE).await.unwrap_err(),
        ] {
            assert!(matches!(err, ServiceError::NotFound { .. }));
        }
    }

    #[tokio::test]
    async fn test_lost_delete_race_is_not_found() {
        let mut repo = MockPromocodeRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, ALICE))));
        repo.expect_delete().times(1).returning(|_| Ok(false));

        let svc = PromocodeService::new(Arc::new(repo));
        let err = svc.delete(5, ALICE).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_ownership_is_checked_before_writing() {
        let mut repo = MockPromocodeRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, ALICE))));
        repo.expect_update().never();
        repo.expect_delete().never();

        let svc = PromocodeService::new(Arc::new(repo));
        assert!(svc.update(5, changes("CODE456"), BOB).await.is_err());
        assert!(svc.delete(5, BOB).await.is_err());
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal() {
        let mut repo = MockPromocodeRepository::new();
        repo.expect_list()
            .returning(|_| Err(ServiceError::internal(anyhow::anyhow!("pool timed out"))));

        let svc = PromocodeService::new(Arc::new(repo));
        let err = svc.list(Page::default()).await.unwrap_err();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }
}
