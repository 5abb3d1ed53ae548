use std::sync::Arc;

use crate::error::AppResult;
use domain::auth::{User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserStorePort: Send + Sync {
    async fn find_user(&self, user_id: &UserId) -> AppResult<Option<User>>;
    async fn find_user_by_credential(&self, username: &str, password: &str)
    -> AppResult<Option<User>>;
    async fn create_user(
        &self,
        user_id: UserId,
        username: &str,
        password_hash: &str,
        balance: u64,
    ) -> AppResult<User>;
}

pub type DynUserStorePort = Arc<dyn UserStorePort>;
