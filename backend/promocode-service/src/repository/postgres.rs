use crate::models::{NewPromocode, Page, Promocode, PromocodeChanges};
use crate::repository::PromocodeRepository;
use error_types::{ServiceError, ServiceResult};
use sqlx::PgPool;

const PROMOCODE_COLUMNS: &str =
    "id, name, description, creator_id, discount, code, created_at, updated_at";

#[derive(Clone)]
pub struct PgPromocodeRepository {
    pool: PgPool,
}

impl PgPromocodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_unique_violation(err: sqlx::Error) -> ServiceError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.constraint() == Some("promocodes_code_key") {
            return ServiceError::conflict("code already exists");
        }
    }
    ServiceError::from(err)
}

#[async_trait::async_trait]
impl PromocodeRepository for PgPromocodeRepository {
    async fn create(&self, new: NewPromocode) -> ServiceResult<Promocode> {
        let promocode = sqlx::query_as::<_, Promocode>(&format!(
            r#"
            INSERT INTO promocodes (name, description, creator_id, discount, code)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PROMOCODE_COLUMNS}
            "#
        ))
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.creator_id)
        .bind(new.discount)
        .bind(&new.code)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(promocode)
    }

    async fn find_by_id(&self, id: i64) -> ServiceResult<Option<Promocode>> {
        let promocode = sqlx::query_as::<_, Promocode>(&format!(
            "SELECT {PROMOCODE_COLUMNS} FROM promocodes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(promocode)
    }

    async fn update(
        &self,
        id: i64,
        changes: PromocodeChanges,
    ) -> ServiceResult<Option<Promocode>> {
        let promocode = sqlx::query_as::<_, Promocode>(&format!(
            r#"
            UPDATE promocodes
            SET name = $2,
                description = $3,
                discount = $4,
                code = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PROMOCODE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.discount)
        .bind(&changes.code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(promocode)
    }

    async fn delete(&self, id: i64) -> ServiceResult<bool> {
        let result = sqlx::query("DELETE FROM promocodes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, page: Page) -> ServiceResult<(Vec<Promocode>, i64)> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let items = sqlx::query_as::<_, Promocode>(&format!(
            "SELECT {PROMOCODE_COLUMNS} FROM promocodes ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *tx)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM promocodes")
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok((items, total))
    }
}
