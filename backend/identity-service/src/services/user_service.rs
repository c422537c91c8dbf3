use crate::db::UserRepository;
use crate::models::{LoginRequest, NewUser, RegisterRequest, UpdateProfileRequest, User};
use crate::security::{hash_password, verify_password};
use crypto_core::TokenService;
use error_types::{AuthError, ServiceError, ServiceResult};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

/// Registration, login and profile operations
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
}

/// Run a CPU-heavy password operation off the async workers
async fn blocking<T, F>(f: F) -> ServiceResult<T>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(ServiceError::internal)?
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }

    pub fn tokens(&self) -> Arc<TokenService> {
        self.tokens.clone()
    }

    pub async fn register(&self, req: RegisterRequest) -> ServiceResult<User> {
        req.validate()?;

        if self.repo.find_by_login(&req.login).await?.is_some() {
            return Err(ServiceError::conflict("login already exists"));
        }

        let password = req.password;
        let password_hash = blocking(move || hash_password(&password)).await?;

        // The unique constraints still decide if a concurrent registration wins
        let user = self
            .repo
            .create(NewUser {
                login: req.login,
                password_hash,
                email: req.email,
            })
            .await?;

        info!(user_id = user.id, login = %user.login, "User registered");
        Ok(user)
    }

    /// Unknown login and wrong password are indistinguishable to the caller
    pub async fn login(&self, req: LoginRequest) -> ServiceResult<String> {
        req.validate()?;

        let user = self
            .repo
            .find_by_login(&req.login)
            .await?
            .ok_or(ServiceError::from(AuthError::InvalidCredentials))?;

        let password = req.password;
        let hash = user.password_hash.clone();
        let valid = blocking(move || verify_password(&password, &hash)).await?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.tokens.issue(user.id).map_err(ServiceError::internal)?;
        info!(user_id = user.id, "User logged in");
        Ok(token)
    }

    pub async fn profile(&self, user_id: i64) -> ServiceResult<User> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user"))
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        req: UpdateProfileRequest,
    ) -> ServiceResult<User> {
        req.validate()?;

        self.repo
            .update_profile(user_id, req.into())
            .await?
            .ok_or_else(|| ServiceError::not_found("user"))
    }

    pub fn validate_token(&self, token: &str) -> ServiceResult<i64> {
        self.tokens
            .validate(token)
            .map_err(|_| AuthError::InvalidToken.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{InMemoryUserRepository, MockUserRepository};
    use crate::models::ProfileChanges;
    use std::time::Duration;

    fn tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new(b"test-secret", Duration::from_secs(3600)))
    }

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryUserRepository::new()), tokens())
    }

    fn register_req(login: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            login: login.into(),
            password: "password123".into(),
            email: email.into(),
        }
    }

    fn login_req(login: &str, password: &str) -> LoginRequest {
        LoginRequest {
            login: login.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let svc = service();
        let user = svc
            .register(register_req("alice", "alice@example.com"))
            .await
            .unwrap();
        assert_ne!(user.password_hash, "password123");

        let token = svc.login(login_req("alice", "password123")).await.unwrap();
        assert_eq!(svc.validate_token(&token).unwrap(), user.id);
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_input() {
        let svc = service();
        let err = svc
            .register(RegisterRequest {
                login: "abc".into(),
                password: "12345".into(),
                email: "not-an-email".into(),
            })
            .await
            .unwrap_err();

        match err {
            ServiceError::Validation { field_errors, .. } => assert_eq!(field_errors.len(), 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_duplicate_login_conflicts() {
        let svc = service();
        svc.register(register_req("alice", "alice@example.com"))
            .await
            .unwrap();

        let err = svc
            .register(register_req("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_bad_credentials_are_indistinguishable() {
        let svc = service();
        svc.register(register_req("alice", "alice@example.com"))
            .await
            .unwrap();

        let wrong_password = svc.login(login_req("alice", "nope-nope")).await.unwrap_err();
        let unknown_login = svc.login(login_req("mallory", "password123")).await.unwrap_err();

        for err in [wrong_password, unknown_login] {
            assert_eq!(err.code(), "INVALID_CREDENTIALS");
            assert_eq!(err.public_message(), "Invalid login or password");
        }
    }

    #[tokio::test]
    async fn test_update_profile_changes_only_given_fields() {
        let svc = service();
        let user = svc
            .register(register_req("alice", "alice@example.com"))
            .await
            .unwrap();

        let updated = svc
            .update_profile(
                user.id,
                UpdateProfileRequest {
                    first_name: Some("Alice".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.first_name.as_deref(), Some("Alice"));
        assert_eq!(updated.email, "alice@example.com");
        assert_eq!(updated.login, "alice");
    }

    #[tokio::test]
    async fn test_update_profile_rejects_bad_email() {
        let svc = service();
        let user = svc
            .register(register_req("alice", "alice@example.com"))
            .await
            .unwrap();

        let err = svc
            .update_profile(
                user.id,
                UpdateProfileRequest {
                    email: Some("nope".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_profile_of_unknown_user() {
        let err = service().profile(404).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Err(ServiceError::internal(anyhow::anyhow!("connection reset"))));
        repo.expect_update_profile()
            .withf(|id, changes: &ProfileChanges| *id == 1 && changes.phone.is_some())
            .returning(|_, _| Err(ServiceError::internal(anyhow::anyhow!("connection reset"))));

        let svc = UserService::new(Arc::new(repo), tokens());

        let err = svc.profile(1).await.unwrap_err();
        assert_eq!(err.code(), "INTERNAL_ERROR");

        let err = svc
            .update_profile(
                1,
                UpdateProfileRequest {
                    phone: Some("+1".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.public_message(), "Internal server error");
    }
}
