use time::{Duration, OffsetDateTime};
use tracing::{debug, info, instrument};

use crate::error::{AppError, AppResult};
use crate::ports::incoming::auth::AuthUseCase;
use crate::ports::outgoing::session_store::DynSessionStorePort;
use crate::ports::outgoing::user_store::DynUserStorePort;
use domain::auth::LoginOutcome;

pub struct AuthService {
    user_store: DynUserStorePort,
    session_store: DynSessionStorePort,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(
        user_store: DynUserStorePort,
        session_store: DynSessionStorePort,
        session_ttl: Duration,
    ) -> Self {
        Self {
            user_store,
            session_store,
            session_ttl,
        }
    }
}

#[async_trait::async_trait]
impl AuthUseCase for AuthService {
    #[instrument(skip(self, password))]
    async fn login(&self, username: String, password: String) -> AppResult<LoginOutcome> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::InvalidCredentials);
        }

        let Some(user) = self
            .user_store
            .find_user_by_credential(username.trim(), &password)
            .await?
        else {
            info!("Login rejected");
            return Err(AppError::InvalidCredentials);
        };

        let session = self
            .session_store
            .open_session(user.id, self.session_ttl)
            .await?;

        info!(user_id = %user.id, "User logged in");

        Ok(LoginOutcome {
            ok: true,
            user: user.to_public(),
            session,
        })
    }

    async fn verify(&self) -> AppResult<bool> {
        let valid = self
            .session_store
            .current_session()
            .await?
            .is_some_and(|session| session.is_valid_at(OffsetDateTime::now_utc()));

        debug!(valid, "Session verified");
        Ok(valid)
    }

    async fn logout(&self) -> AppResult<()> {
        self.session_store.close_session().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use std::sync::Arc;

    use crate::ports::outgoing::session_store::MockSessionStorePort;
    use crate::ports::outgoing::user_store::MockUserStorePort;
    use domain::auth::{Session, User, UserId};

    fn user() -> User {
        User {
            id: UserId::new(1),
            username: "ana".to_string(),
            password_hash: "hash".to_string(),
            balance: 100,
        }
    }

    fn session(expires_in: Duration) -> Session {
        let now = OffsetDateTime::now_utc();
        Session {
            token: "tok".to_string(),
            user_id: UserId::new(1),
            created_at: now,
            expires_at: now + expires_in,
        }
    }

    fn service(users: MockUserStorePort, sessions: MockSessionStorePort) -> AuthService {
        AuthService::new(Arc::new(users), Arc::new(sessions), Duration::hours(1))
    }

    #[tokio::test]
    async fn login_opens_a_session_for_valid_credentials() {
        let mut users = MockUserStorePort::new();
        users
            .expect_find_user_by_credential()
            .with(eq("ana"), eq("secret"))
            .times(1)
            .returning(|_, _| Ok(Some(user())));

        let mut sessions = MockSessionStorePort::new();
        sessions
            .expect_open_session()
            .with(eq(UserId::new(1)), eq(Duration::hours(1)))
            .times(1)
            .returning(|_, ttl| Ok(session(ttl)));

        let outcome = service(users, sessions)
            .login("ana".to_string(), "secret".to_string())
            .await
            .unwrap();

        assert!(outcome.ok);
        assert_eq!(outcome.user.balance, 100);
        assert_eq!(outcome.session.user_id, UserId::new(1));
    }

    #[tokio::test]
    async fn login_with_unknown_credentials_fails_without_session() {
        let mut users = MockUserStorePort::new();
        users
            .expect_find_user_by_credential()
            .returning(|_, _| Ok(None));

        let mut sessions = MockSessionStorePort::new();
        sessions.expect_open_session().never();

        let result = service(users, sessions)
            .login("ana".to_string(), "wrong".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn blank_credentials_never_reach_the_store() {
        let mut users = MockUserStorePort::new();
        users.expect_find_user_by_credential().never();

        let result = service(users, MockSessionStorePort::new())
            .login("  ".to_string(), "pw".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn verify_reports_session_validity() {
        let mut sessions = MockSessionStorePort::new();
        sessions
            .expect_current_session()
            .times(1)
            .returning(|| Ok(Some(session(Duration::minutes(5)))));
        assert!(service(MockUserStorePort::new(), sessions).verify().await.unwrap());

        let mut sessions = MockSessionStorePort::new();
        sessions
            .expect_current_session()
            .times(1)
            .returning(|| Ok(Some(session(Duration::minutes(-5)))));
        assert!(!service(MockUserStorePort::new(), sessions).verify().await.unwrap());

        let mut sessions = MockSessionStorePort::new();
        sessions.expect_current_session().returning(|| Ok(None));
        assert!(!service(MockUserStorePort::new(), sessions).verify().await.unwrap());
    }
}
