use crate::error::AppResult;
use domain::auth::UserId;

#[async_trait::async_trait]
pub trait WalletUseCase: Send + Sync {
    async fn balance(&self, user_id: UserId) -> AppResult<u64>;
}
