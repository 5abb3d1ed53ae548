use time::{Duration, OffsetDateTime};
use tracing::{info, instrument};
use url::Url;

use crate::error::{AppError, AppResult};
use crate::ports::incoming::rewards::RewardAdminUseCase;
use crate::ports::outgoing::reward_store::DynRewardStorePort;
use crate::ports::outgoing::token_signer::DynTokenSignerPort;
use domain::envelope::{EnvelopeClaims, SignedEnvelope};
use domain::reward::{IssuedReward, RewardRecord};
use domain::token::TokenCode;

const MAX_DESCRIPTION_CHARS: usize = 100;
const NONCE_BYTES: usize = 32;

pub struct RewardAdminServiceDeps {
    pub reward_store: DynRewardStorePort,
    pub token_signer: DynTokenSignerPort,
    pub claim_url_base: String,
    pub default_expiry: Duration,
}

/// Mints and manages reward ledger entries for the classroom dashboard.
pub struct RewardAdminService {
    reward_store: DynRewardStorePort,
    token_signer: DynTokenSignerPort,
    claim_url_base: String,
    default_expiry: Duration,
}

impl RewardAdminService {
    pub fn new(deps: RewardAdminServiceDeps) -> Self {
        Self {
            reward_store: deps.reward_store,
            token_signer: deps.token_signer,
            claim_url_base: deps.claim_url_base,
            default_expiry: deps.default_expiry,
        }
    }

    fn claim_url(&self, token: &str) -> AppResult<String> {
        Url::parse_with_params(&self.claim_url_base, &[("token", token)])
            .map(String::from)
            .map_err(|e| AppError::ConfigError {
                message: format!("invalid claim url base: {e}"),
            })
    }
}

fn validate_description(description: &str) -> AppResult<String> {
    let trimmed = description.trim();
    if trimmed.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(AppError::ValidationError {
            message: format!("description must be at most {MAX_DESCRIPTION_CHARS} characters"),
        });
    }
    Ok(trimmed.to_string())
}

fn new_nonce() -> String {
    hex::encode(rand::random::<[u8; NONCE_BYTES]>())
}

#[async_trait::async_trait]
impl RewardAdminUseCase for RewardAdminService {
    #[instrument(skip(self, description))]
    async fn issue(
        &self,
        amount: u64,
        expires_in: Option<Duration>,
        description: String,
    ) -> AppResult<IssuedReward> {
        if amount == 0 {
            return Err(AppError::ValidationError {
                message: "amount must be greater than zero".to_string(),
            });
        }

        let ttl = expires_in.unwrap_or(self.default_expiry);
        if !ttl.is_positive() {
            return Err(AppError::ValidationError {
                message: "expiry must be in the future".to_string(),
            });
        }

        let description = validate_description(&description)?;
        let expires_at = OffsetDateTime::now_utc()
            .checked_add(ttl)
            .ok_or_else(|| AppError::ValidationError {
                message: format!("expiry {ttl} is out of range"),
            })?;

        let claims = EnvelopeClaims {
            amount,
            one: 1,
            exp: expires_at.unix_timestamp(),
            nonce: new_nonce(),
            desc: description.clone(),
        };
        let payload = claims.to_payload()?;
        let signature = self.token_signer.sign(&payload);
        let raw = SignedEnvelope::assemble(&payload, &signature);

        let code = TokenCode::parse(&raw)?;
        let claim_url = self.claim_url(code.as_str())?;

        let record = RewardRecord::new(code.clone(), amount, Some(expires_at), description.clone())?;
        self.reward_store.insert_reward(record).await?;

        info!(amount, expires_at = %expires_at, "Reward issued");

        Ok(IssuedReward {
            code,
            amount,
            expires_at,
            description,
            claim_url,
        })
    }

    #[instrument(skip(self, description))]
    async fn register(
        &self,
        code: String,
        amount: u64,
        expiry: Option<OffsetDateTime>,
        description: String,
    ) -> AppResult<RewardRecord> {
        let code = TokenCode::parse(&code)?;
        let description = validate_description(&description)?;
        let record = RewardRecord::new(code, amount, expiry, description)?;

        self.reward_store.insert_reward(record.clone()).await?;
        info!(code = %record.code, amount, "Reward registered");

        Ok(record)
    }

    #[instrument(skip(self))]
    async fn revoke(&self, code: String) -> AppResult<RewardRecord> {
        let code = TokenCode::parse(&code)?;
        let record = self.reward_store.revoke_reward(&code).await?;
        info!(code = %record.code, "Reward revoked");
        Ok(record)
    }

    async fn list(&self, limit: usize) -> AppResult<Vec<RewardRecord>> {
        self.reward_store.list_rewards(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::always;
    use std::sync::Arc;

    use crate::ports::outgoing::reward_store::MockRewardStorePort;
    use crate::ports::outgoing::token_signer::MockTokenSignerPort;
    use domain::error::MalformedTokenError;
    use domain::reward::RewardStatus;
    use domain::token::{RawToken, TokenFormat};

    fn service(rewards: MockRewardStorePort, signer: MockTokenSignerPort) -> RewardAdminService {
        RewardAdminService::new(RewardAdminServiceDeps {
            reward_store: Arc::new(rewards),
            token_signer: Arc::new(signer),
            claim_url_base: "https://classmint.local/claim".to_string(),
            default_expiry: Duration::minutes(60),
        })
    }

    fn signer() -> MockTokenSignerPort {
        let mut signer = MockTokenSignerPort::new();
        signer.expect_sign().returning(|_| vec![7; 32]);
        signer
    }

    #[tokio::test]
    async fn issue_stores_an_envelope_that_normalizes_back() {
        let mut rewards = MockRewardStorePort::new();
        rewards
            .expect_insert_reward()
            .withf(|record| record.issued_amount == 25 && record.status == RewardStatus::Active)
            .times(1)
            .returning(|_| Ok(()));

        let issued = service(rewards, signer())
            .issue(25, None, "Quiz winner".to_string())
            .await
            .unwrap();

        assert!(issued.code.as_str().starts_with("CM1."));
        assert!(issued.claim_url.starts_with("https://classmint.local/claim?token=CM1."));

        let token = RawToken::from(issued.claim_url.clone()).normalize().unwrap();
        assert_eq!(token.code, issued.code);
        assert_eq!(token.format, TokenFormat::SignedEnvelope);
        assert_eq!(token.declared_amount, Some(25));
        assert_eq!(
            token.declared_expiry.map(OffsetDateTime::unix_timestamp),
            Some(issued.expires_at.unix_timestamp())
        );
    }

    #[tokio::test]
    async fn issue_rejects_zero_amount_and_unusable_expiry() {
        let mut rewards = MockRewardStorePort::new();
        rewards.expect_insert_reward().never();
        let service = service(rewards, MockTokenSignerPort::new());

        let zero = service.issue(0, None, String::new()).await;
        assert!(matches!(zero, Err(AppError::ValidationError { .. })));

        let past = service
            .issue(5, Some(Duration::minutes(-1)), String::new())
            .await;
        assert!(matches!(past, Err(AppError::ValidationError { .. })));

        let unrepresentable = service.issue(5, Some(Duration::MAX), String::new()).await;
        assert!(matches!(
            unrepresentable,
            Err(AppError::ValidationError { .. })
        ));
    }

    #[tokio::test]
    async fn each_issue_yields_a_distinct_code() {
        let mut rewards = MockRewardStorePort::new();
        rewards.expect_insert_reward().times(2).returning(|_| Ok(()));
        let service = service(rewards, signer());

        let first = service.issue(10, None, String::new()).await.unwrap();
        let second = service.issue(10, None, String::new()).await.unwrap();
        assert_ne!(first.code, second.code);
    }

    #[tokio::test]
    async fn register_validates_the_code() {
        let mut rewards = MockRewardStorePort::new();
        rewards.expect_insert_reward().never();

        let result = service(rewards, MockTokenSignerPort::new())
            .register("HAS SPACE".to_string(), 10, None, String::new())
            .await;

        assert!(matches!(
            result,
            Err(AppError::MalformedToken(MalformedTokenError::InvalidCharacters))
        ));
    }

    #[tokio::test]
    async fn register_stores_an_active_record() {
        let mut rewards = MockRewardStorePort::new();
        rewards
            .expect_insert_reward()
            .with(always())
            .times(1)
            .returning(|_| Ok(()));

        let record = service(rewards, MockTokenSignerPort::new())
            .register("WELCOME10".to_string(), 10, None, " Welcome ".to_string())
            .await
            .unwrap();

        assert_eq!(record.code.as_str(), "WELCOME10");
        assert_eq!(record.description, "Welcome");
        assert_eq!(record.status, RewardStatus::Active);
    }

    #[tokio::test]
    async fn revoke_delegates_to_the_store() {
        let mut rewards = MockRewardStorePort::new();
        rewards.expect_revoke_reward().times(1).returning(|code| {
            let mut record = RewardRecord::new(code.clone(), 10, None, String::new()).unwrap();
            record.status = RewardStatus::Revoked;
            Ok(record)
        });

        let record = service(rewards, MockTokenSignerPort::new())
            .revoke("WELCOME10".to_string())
            .await
            .unwrap();
        assert_eq!(record.status, RewardStatus::Revoked);
    }
}
