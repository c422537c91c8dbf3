use crate::db::UserRepository;
use crate::models::{NewUser, ProfileChanges, User};
use chrono::Utc;
use error_types::{ServiceError, ServiceResult};
use std::collections::BTreeMap;
use tokio::sync::Mutex;

/// Process-local user store for tests and database-less local runs
#[derive(Default)]
pub struct InMemoryUserRepository {
    inner: Mutex<Store>,
}

#[derive(Default)]
struct Store {
    next_id: i64,
    users: BTreeMap<i64, User>,
}

impl Store {
    fn ensure_unique(&self, id: Option<i64>, login: Option<&str>, email: &str) -> ServiceResult<()> {
        for user in self.users.values().filter(|u| Some(u.id) != id) {
            if Some(user.login.as_str()) == login {
                return Err(ServiceError::conflict("login already exists"));
            }
            if user.email == email {
                return Err(ServiceError::conflict("email already exists"));
            }
        }
        Ok(())
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> ServiceResult<User> {
        let mut store = self.inner.lock().await;
        store.ensure_unique(None, Some(&new_user.login), &new_user.email)?;

        store.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: store.next_id,
            login: new_user.login,
            password_hash: new_user.password_hash,
            email: new_user.email,
            first_name: None,
            last_name: None,
            birth_date: None,
            phone: None,
            created_at: now,
            updated_at: now,
        };
        store.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_login(&self, login: &str) -> ServiceResult<Option<User>> {
        let store = self.inner.lock().await;
        Ok(store.users.values().find(|u| u.login == login).cloned())
    }

    async fn find_by_id(&self, id: i64) -> ServiceResult<Option<User>> {
        Ok(self.inner.lock().await.users.get(&id).cloned())
    }

    async fn update_profile(
        &self,
        id: i64,
        changes: ProfileChanges,
    ) -> ServiceResult<Option<User>> {
        let mut store = self.inner.lock().await;

        let Some(mut user) = store.users.get(&id).cloned() else {
            return Ok(None);
        };

        if let Some(email) = &changes.email {
            store.ensure_unique(Some(id), None, email)?;
            user.email = email.clone();
        }
        if let Some(first_name) = changes.first_name {
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = Some(last_name);
        }
        if let Some(birth_date) = changes.birth_date {
            user.birth_date = Some(birth_date);
        }
        if let Some(phone) = changes.phone {
            user.phone = Some(phone);
        }
        user.updated_at = Utc::now();

        store.users.insert(id, user.clone());
        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(login: &str, email: &str) -> NewUser {
        NewUser {
            login: login.into(),
            password_hash: "hash".into(),
            email: email.into(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create(new_user("alice", "a@example.com")).await.unwrap();
        let b = repo.create(new_user("bobby", "b@example.com")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
    }

    #[tokio::test]
    async fn test_duplicate_login_and_email_conflict() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("alice", "a@example.com")).await.unwrap();

        let dup_login = repo.create(new_user("alice", "other@example.com")).await;
        assert!(matches!(dup_login, Err(ServiceError::Conflict { .. })));

        let dup_email = repo.create(new_user("alice2", "a@example.com")).await;
        assert!(matches!(dup_email, Err(ServiceError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_profile_email_must_stay_unique() {
        let repo = InMemoryUserRepository::new();
        let alice = repo.create(new_user("alice", "a@example.com")).await.unwrap();
        repo.create(new_user("bobby", "b@example.com")).await.unwrap();

        let taken = ProfileChanges {
            email: Some("b@example.com".into()),
            ..Default::default()
        };
        let result = repo.update_profile(alice.id, taken).await;
        assert!(matches!(result, Err(ServiceError::Conflict { .. })));

        // Re-saving one's own email is not a conflict
        let same = ProfileChanges {
            email: Some("a@example.com".into()),
            phone: Some("+100".into()),
            ..Default::default()
        };
        let updated = repo.update_profile(alice.id, same).await.unwrap().unwrap();
        assert_eq!(updated.phone.as_deref(), Some("+100"));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repo = InMemoryUserRepository::new();
        let result = repo.update_profile(99, ProfileChanges::default()).await;
        assert!(matches!(result, Ok(None)));
    }
}
