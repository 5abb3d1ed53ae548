use crate::error::AppResult;
use domain::auth::UserId;
use domain::redemption::Redemption;
use domain::token::RawToken;

#[async_trait::async_trait]
pub trait RedemptionUseCase: Send + Sync {
    async fn claim(&self, user_id: UserId, raw_token: RawToken) -> AppResult<Redemption>;
}
