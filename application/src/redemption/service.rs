use std::time::Duration;
use time::OffsetDateTime;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::error::{AppError, AppResult};
use crate::ports::incoming::redemption::RedemptionUseCase;
use crate::ports::outgoing::reward_store::DynRewardStorePort;
use crate::ports::outgoing::token_signer::DynTokenSignerPort;
use crate::ports::outgoing::user_store::DynUserStorePort;
use domain::auth::UserId;
use domain::error::MalformedTokenError;
use domain::redemption::Redemption;
use domain::token::{RawToken, Token};

pub struct RedemptionServiceDeps {
    pub user_store: DynUserStorePort,
    pub reward_store: DynRewardStorePort,
    pub token_signer: DynTokenSignerPort,
    pub claim_timeout: Duration,
}

pub struct RedemptionService {
    user_store: DynUserStorePort,
    reward_store: DynRewardStorePort,
    token_signer: DynTokenSignerPort,
    claim_timeout: Duration,
}

impl RedemptionService {
    pub fn new(deps: RedemptionServiceDeps) -> Self {
        Self {
            user_store: deps.user_store,
            reward_store: deps.reward_store,
            token_signer: deps.token_signer,
            claim_timeout: deps.claim_timeout,
        }
    }

    fn check_signature(&self, token: &Token) -> Result<(), MalformedTokenError> {
        match &token.envelope {
            Some(envelope) if !self.token_signer.verify(envelope.payload(), envelope.signature()) => {
                Err(MalformedTokenError::BadSignature)
            }
            _ => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl RedemptionUseCase for RedemptionService {
    #[instrument(skip(self, raw_token))]
    async fn claim(&self, user_id: UserId, raw_token: RawToken) -> AppResult<Redemption> {
        let token = raw_token
            .normalize()
            .and_then(|token| self.check_signature(&token).map(|()| token))
            .map_err(|e| {
                debug!(reason = %e, "Rejected malformed token");
                AppError::MalformedToken(e)
            })?;

        if self.user_store.find_user(&user_id).await?.is_none() {
            return Err(AppError::UserNotFound);
        }

        let reward = self
            .reward_store
            .find_reward(&token.code)
            .await?
            .ok_or(AppError::TokenNotFound)?;

        if token
            .declared_amount
            .is_some_and(|declared| declared != reward.issued_amount)
        {
            debug!(code = %token.code, "Declared amount does not match the ledger");
            return Err(AppError::TokenNotFound);
        }

        let now = OffsetDateTime::now_utc();
        if token.declared_expiry.is_some_and(|declared| declared <= now) {
            debug!(code = %token.code, "Token carries an expiry that has passed");
            return Err(AppError::TokenExpired);
        }

        reward.check_eligible(now)?;

        let applied = timeout(
            self.claim_timeout,
            self.reward_store
                .mark_consumed_and_credit(&token.code, user_id, reward.issued_amount),
        )
        .await
        .map_err(|_| {
            warn!(code = %token.code, "Claim timed out before the store committed");
            AppError::Conflict
        })??;

        info!(
            user_id = %user_id,
            amount = applied.amount_credited,
            new_balance = applied.new_balance,
            tx_id = applied.receipt.tx_id,
            "Reward redeemed"
        );

        Ok(applied.into_redemption())
    }
}
