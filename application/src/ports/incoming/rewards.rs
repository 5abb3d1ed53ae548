use time::{Duration, OffsetDateTime};

use crate::error::AppResult;
use domain::reward::{IssuedReward, RewardRecord};

#[async_trait::async_trait]
pub trait RewardAdminUseCase: Send + Sync {
    async fn issue(
        &self,
        amount: u64,
        expires_in: Option<Duration>,
        description: String,
    ) -> AppResult<IssuedReward>;
    async fn register(
        &self,
        code: String,
        amount: u64,
        expiry: Option<OffsetDateTime>,
        description: String,
    ) -> AppResult<RewardRecord>;
    async fn revoke(&self, code: String) -> AppResult<RewardRecord>;
    async fn list(&self, limit: usize) -> AppResult<Vec<RewardRecord>>;
}
