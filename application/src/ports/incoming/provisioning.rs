use crate::error::AppResult;
use domain::auth::{UserId, UserPublic};

#[async_trait::async_trait]
pub trait ProvisioningUseCase: Send + Sync {
    async fn provision_user(
        &self,
        user_id: UserId,
        username: String,
        password: String,
        balance: u64,
    ) -> AppResult<UserPublic>;
}
