//! User database operations for identity-service

use crate::db::UserRepository;
use crate::models::{NewUser, ProfileChanges, User};
use error_types::{ServiceError, ServiceResult};
use sqlx::PgPool;

const USER_COLUMNS: &str = "id, login, password_hash, email, first_name, last_name, \
                            birth_date, phone, created_at, updated_at";

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Name the violated column instead of the generic conflict message
fn map_unique_violation(err: sqlx::Error) -> ServiceError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.constraint() {
            Some("users_login_key") => return ServiceError::conflict("login already exists"),
            Some("users_email_key") => return ServiceError::conflict("email already exists"),
            _ => {}
        }
    }
    ServiceError::from(err)
}

#[async_trait::async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> ServiceResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (login, password_hash, email)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new_user.login)
        .bind(&new_user.password_hash)
        .bind(&new_user.email)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }

    async fn find_by_login(&self, login: &str) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE login = $1"
        ))
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> ServiceResult<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    async fn update_profile(
        &self,
        id: i64,
        changes: ProfileChanges,
    ) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name  = COALESCE($3, last_name),
                birth_date = COALESCE($4, birth_date),
                email      = COALESCE($5, email),
                phone      = COALESCE($6, phone),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.birth_date)
        .bind(changes.email)
        .bind(changes.phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }
}
