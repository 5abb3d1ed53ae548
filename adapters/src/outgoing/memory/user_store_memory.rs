use dashmap::mapref::entry::Entry;
use tracing::{debug, instrument};

use classmint_application::error::{AppError, AppResult};
use classmint_application::ports::outgoing::user_store::UserStorePort;
use domain::auth::{User, UserId};

use super::InMemoryStore;

#[async_trait::async_trait]
impl UserStorePort for InMemoryStore {
    async fn find_user(&self, user_id: &UserId) -> AppResult<Option<User>> {
        Ok(self.users.get(user_id).map(|user| user.clone()))
    }

    #[instrument(skip(self, password))]
    async fn find_user_by_credential(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<Option<User>> {
        let candidate = self
            .usernames
            .get(username)
            .map(|entry| *entry.value())
            .and_then(|user_id| self.users.get(&user_id).map(|user| user.clone()));

        let Some(user) = candidate else {
            debug!("No user with that username");
            return Ok(None);
        };

        if self.password_hasher.verify(password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    #[instrument(skip(self, password_hash))]
    async fn create_user(
        &self,
        user_id: UserId,
        username: &str,
        password_hash: &str,
        balance: u64,
    ) -> AppResult<User> {
        let Entry::Vacant(name_slot) = self.usernames.entry(username.to_string()) else {
            return Err(AppError::ValidationError {
                message: format!("username {username} is already taken"),
            });
        };

        let Entry::Vacant(id_slot) = self.users.entry(user_id) else {
            return Err(AppError::ValidationError {
                message: format!("user {user_id} already exists"),
            });
        };

        let user = User {
            id: user_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            balance,
        };
        id_slot.insert(user.clone());
        name_slot.insert(user_id);
        debug!(user_id = %user_id, "User created");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::outgoing::memory::test_support::store;

    #[tokio::test]
    async fn credentials_resolve_to_the_user() {
        let store = store();
        store
            .create_user(UserId::new(1), "ana", "plain:secret", 100)
            .await
            .unwrap();

        let found = store.find_user_by_credential("ana", "secret").await.unwrap();
        assert_eq!(found.map(|user| user.id), Some(UserId::new(1)));

        assert!(store.find_user_by_credential("ana", "nope").await.unwrap().is_none());
        assert!(store.find_user_by_credential("bob", "secret").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_id_or_username_is_rejected() {
        let store = store();
        store.create_user(UserId::new(1), "ana", "h", 0).await.unwrap();

        let same_id = store.create_user(UserId::new(1), "bob", "h", 0).await;
        assert!(matches!(same_id, Err(AppError::ValidationError { .. })));

        let same_name = store.create_user(UserId::new(2), "ana", "h", 0).await;
        assert!(matches!(same_name, Err(AppError::ValidationError { .. })));
    }

    #[tokio::test]
    async fn id_collision_does_not_reserve_the_username() {
        let store = store();
        store.create_user(UserId::new(1), "ana", "h", 0).await.unwrap();

        let clash = store.create_user(UserId::new(1), "bob", "h", 0).await;
        assert!(clash.is_err());

        let bob = store.create_user(UserId::new(2), "bob", "h", 0).await;
        assert!(bob.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_signups_for_one_username_admit_exactly_one() {
        let store = Arc::new(store());

        let handles: Vec<_> = (1..=16_u64)
            .map(|id| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .create_user(UserId::new(id), "ana", "plain:secret", 0)
                        .await
                        .is_ok()
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.users.len(), 1);
        assert!(store.find_user_by_credential("ana", "secret").await.unwrap().is_some());
    }
}
