use std::sync::Arc;

use crate::error::AppResult;
use domain::auth::UserId;
use domain::redemption::AppliedCredit;
use domain::reward::RewardRecord;
use domain::token::TokenCode;

/// Reward ledger persistence.
///
/// `mark_consumed_and_credit` is the only mutation on the claim path and must
/// be atomic per code: eligibility is re-checked under the entry's lock, the
/// entry is consumed, the claimer credited and the redemption recorded, or
/// nothing happens. A caller that loses the race gets `TokenAlreadyClaimed`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RewardStorePort: Send + Sync {
    async fn find_reward(&self, code: &TokenCode) -> AppResult<Option<RewardRecord>>;
    async fn mark_consumed_and_credit(
        &self,
        code: &TokenCode,
        user_id: UserId,
        amount: u64,
    ) -> AppResult<AppliedCredit>;
    async fn insert_reward(&self, reward: RewardRecord) -> AppResult<()>;
    async fn revoke_reward(&self, code: &TokenCode) -> AppResult<RewardRecord>;
    async fn list_rewards(&self, limit: usize) -> AppResult<Vec<RewardRecord>>;
}

pub type DynRewardStorePort = Arc<dyn RewardStorePort>;
