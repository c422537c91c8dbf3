use crate::models::{NewPromocode, Page, Promocode, PromocodeChanges};
use crate::repository::PromocodeRepository;
use chrono::Utc;
use error_types::{ServiceError, ServiceResult};
use std::collections::BTreeMap;
use tokio::sync::Mutex;

/// Process-local promocode store for tests and database-less local runs
#[derive(Default)]
pub struct InMemoryPromocodeRepository {
    inner: Mutex<Store>,
}

#[derive(Default)]
struct Store {
    next_id: i64,
    promocodes: BTreeMap<i64, Promocode>,
}

impl Store {
    fn ensure_unique_code(&self, id: Option<i64>, code: &str) -> ServiceResult<()> {
        let taken = self
            .promocodes
            .values()
            .any(|p| Some(p.id) != id && p.code == code);
        if taken {
            return Err(ServiceError::conflict("code already exists"));
        }
        Ok(())
    }
}

impl InMemoryPromocodeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PromocodeRepository for InMemoryPromocodeRepository {
    async fn create(&self, new: NewPromocode) -> ServiceResult<Promocode> {
        let mut store = self.inner.lock().await;
        store.ensure_unique_code(None, &new.code)?;

        store.next_id += 1;
        let now = Utc::now();
        let promocode = Promocode {
            id: store.next_id,
            name: new.name,
            description: new.description,
            creator_id: new.creator_id,
            discount: new.discount,
            code: new.code,
            created_at: now,
            updated_at: now,
        };
        store.promocodes.insert(promocode.id, promocode.clone());

        Ok(promocode)
    }

    async fn find_by_id(&self, id: i64) -> ServiceResult<Option<Promocode>> {
        Ok(self.inner.lock().await.promocodes.get(&id).cloned())
    }

    async fn update(
        &self,
        id: i64,
        changes: PromocodeChanges,
    ) -> ServiceResult<Option<Promocode>> {
        let mut store = self.inner.lock().await;
        if !store.promocodes.contains_key(&id) {
            return Ok(None);
        }
        store.ensure_unique_code(Some(id), &changes.code)?;

        let Some(promocode) = store.promocodes.get_mut(&id) else {
            return Ok(None);
        };
        promocode.name = changes.name;
        promocode.description = changes.description;
        promocode.discount = changes.discount;
        promocode.code = changes.code;
        promocode.updated_at = Utc::now();

        Ok(Some(promocode.clone()))
    }

    async fn delete(&self, id: i64) -> ServiceResult<bool> {
        Ok(self.inner.lock().await.promocodes.remove(&id).is_some())
    }

    async fn list(&self, page: Page) -> ServiceResult<(Vec<Promocode>, i64)> {
        let store = self.inner.lock().await;
        let total = store.promocodes.len() as i64;
        let items = store
            .promocodes
            .values()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();

        Ok((items, total))
    }
}
