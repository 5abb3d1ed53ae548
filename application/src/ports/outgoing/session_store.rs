use std::sync::Arc;
use time::Duration;

use crate::error::AppResult;
use domain::auth::{Session, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SessionStorePort: Send + Sync {
    async fn current_session(&self) -> AppResult<Option<Session>>;
    async fn open_session(&self, user_id: UserId, ttl: Duration) -> AppResult<Session>;
    async fn close_session(&self) -> AppResult<()>;
}

pub type DynSessionStorePort = Arc<dyn SessionStorePort>;
