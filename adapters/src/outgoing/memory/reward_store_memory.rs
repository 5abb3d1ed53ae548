use dashmap::mapref::entry::Entry;
use time::OffsetDateTime;
use tracing::{debug, instrument, warn};

use classmint_application::error::{AppError, AppResult};
use classmint_application::ports::outgoing::ledger_store::LedgerStorePort;
use classmint_application::ports::outgoing::reward_store::RewardStorePort;
use domain::auth::UserId;
use domain::ledger::{ClaimData, LedgerBlock};
use domain::redemption::{AppliedCredit, RedemptionReceipt};
use domain::reward::{RewardRecord, RewardStatus};
use domain::token::TokenCode;

use super::InMemoryStore;

#[async_trait::async_trait]
impl RewardStorePort for InMemoryStore {
    async fn find_reward(&self, code: &TokenCode) -> AppResult<Option<RewardRecord>> {
        Ok(self.rewards.get(code).map(|reward| reward.clone()))
    }

    #[instrument(skip(self))]
    async fn mark_consumed_and_credit(
        &self,
        code: &TokenCode,
        user_id: UserId,
        amount: u64,
    ) -> AppResult<AppliedCredit> {
        let now = OffsetDateTime::now_utc();

        let mut reward = self.rewards.get_mut(code).ok_or(AppError::TokenNotFound)?;
        reward.check_eligible(now)?;
        if reward.issued_amount != amount {
            warn!(code = %code, "Credit amount differs from the ledger entry");
            return Err(AppError::Conflict);
        }

        let mut user = self.users.get_mut(&user_id).ok_or(AppError::UserNotFound)?;
        let new_balance = user
            .balance
            .checked_add(amount)
            .ok_or(AppError::BalanceOverflow)?;

        let mut chain = self.lock_chain()?;
        let tx_id = chain.last().map_or(1, |block| block.tx_id + 1);
        let block = LedgerBlock::append(
            chain.last(),
            tx_id,
            ClaimData {
                claimer: user_id,
                amount,
                code: code.to_string(),
                description: reward.description.clone(),
            },
            now.unix_timestamp(),
            |input| self.chain_hasher.digest(input),
        )?;

        // nothing below can fail, so the three writes land together
        reward.consume()?;
        user.balance = new_balance;
        let receipt = RedemptionReceipt {
            tx_id,
            block_hash: block.record_hash.clone(),
            description: reward.description.clone(),
        };
        chain.push(block);

        debug!(tx_id, new_balance, "Redemption committed");

        Ok(AppliedCredit {
            user_id,
            code: code.clone(),
            new_balance,
            amount_credited: amount,
            receipt,
        })
    }

    async fn insert_reward(&self, reward: RewardRecord) -> AppResult<()> {
        match self.rewards.entry(reward.code.clone()) {
            Entry::Occupied(_) => Err(AppError::ValidationError {
                message: "reward code already exists".to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(reward);
                Ok(())
            }
        }
    }

    async fn revoke_reward(&self, code: &TokenCode) -> AppResult<RewardRecord> {
        let mut reward = self.rewards.get_mut(code).ok_or(AppError::TokenNotFound)?;
        match reward.status {
            RewardStatus::Consumed => Err(AppError::TokenAlreadyClaimed),
            RewardStatus::Active | RewardStatus::Revoked => {
                reward.status = RewardStatus::Revoked;
                Ok(reward.clone())
            }
        }
    }

    async fn list_rewards(&self, limit: usize) -> AppResult<Vec<RewardRecord>> {
        let mut rewards: Vec<RewardRecord> = self
            .rewards
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        rewards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rewards.truncate(limit);
        Ok(rewards)
    }
}

#[async_trait::async_trait]
impl LedgerStorePort for InMemoryStore {
    async fn blocks(&self) -> AppResult<Vec<LedgerBlock>> {
        Ok(self.lock_chain()?.clone())
    }
}
