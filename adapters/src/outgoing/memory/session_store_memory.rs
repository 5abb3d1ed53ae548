use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use classmint_application::error::{AppError, AppResult};
use classmint_application::ports::outgoing::session_store::SessionStorePort;
use domain::auth::{Session, UserId};

use super::InMemoryStore;

/// The wallet keeps one active session; opening a new one replaces it.
#[async_trait::async_trait]
impl SessionStorePort for InMemoryStore {
    async fn current_session(&self) -> AppResult<Option<Session>> {
        Ok(self.lock_session()?.clone())
    }

    async fn open_session(&self, user_id: UserId, ttl: Duration) -> AppResult<Session> {
        let now = OffsetDateTime::now_utc();
        let expires_at = now
            .checked_add(ttl)
            .ok_or_else(|| AppError::ValidationError {
                message: format!("session lifetime {ttl} is out of range"),
            })?;
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            user_id,
            created_at: now,
            expires_at,
        };

        *self.lock_session()? = Some(session.clone());
        debug!(user_id = %user_id, "Session opened");
        Ok(session)
    }

    async fn close_session(&self) -> AppResult<()> {
        *self.lock_session()? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outgoing::memory::test_support::store;

    #[tokio::test]
    async fn open_replace_and_close() {
        let store = store();
        assert!(store.current_session().await.unwrap().is_none());

        let first = store
            .open_session(UserId::new(1), Duration::hours(1))
            .await
            .unwrap();
        let second = store
            .open_session(UserId::new(2), Duration::hours(1))
            .await
            .unwrap();
        assert_ne!(first.token, second.token);
        assert_eq!(store.current_session().await.unwrap(), Some(second));

        store.close_session().await.unwrap();
        assert!(store.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unrepresentable_lifetime_is_refused_and_keeps_no_session() {
        let store = store();

        let result = store.open_session(UserId::new(1), Duration::MAX).await;

        assert!(matches!(result, Err(AppError::ValidationError { .. })));
        assert!(store.current_session().await.unwrap().is_none());
    }
}
