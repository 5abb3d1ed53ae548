use std::sync::Arc;
use std::time::Duration as StdDuration;
use time::{Duration, OffsetDateTime};
use tracing::{info, instrument};

use classmint_adapters::outgoing::{
    hashing::sha256_chain::Sha256ChainHasher, memory::InMemoryStore,
    passwords::argon2::Argon2PasswordHasher, signing::hmac_sha256::HmacTokenSigner,
};
use classmint_adapters::shared::app_state::AppState as AdaptersAppState;
use classmint_application::error::AppError;
use classmint_application::infrastructure_config::{Config, SeedReward};
use classmint_application::ports::incoming::{
    auth::AuthUseCase, ledger::LedgerUseCase, provisioning::ProvisioningUseCase,
    redemption::RedemptionUseCase, rewards::RewardAdminUseCase, wallet::WalletUseCase,
};
use classmint_application::ports::outgoing::{
    chain_hasher::DynChainHasherPort, password_hasher::DynPasswordHasherPort,
    token_signer::DynTokenSignerPort,
};
use classmint_application::{
    auth::service::AuthService,
    ledger::service::LedgerService,
    provisioning::service::ProvisioningService,
    redemption::service::{RedemptionService, RedemptionServiceDeps},
    rewards::service::{RewardAdminService, RewardAdminServiceDeps},
    wallet::service::WalletService,
};
use domain::auth::UserId;

#[derive(Debug, Clone, Copy, Default)]
pub struct SeedSummary {
    pub users: usize,
    pub rewards: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_service: Arc<dyn AuthUseCase>,
    pub wallet_service: Arc<dyn WalletUseCase>,
    pub redemption_service: Arc<dyn RedemptionUseCase>,
    pub reward_admin_service: Arc<dyn RewardAdminUseCase>,
    pub ledger_service: Arc<dyn LedgerUseCase>,
    pub provisioning_service: Arc<dyn ProvisioningUseCase>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let config = Arc::new(config);

        let password_hasher: DynPasswordHasherPort = Arc::new(
            Argon2PasswordHasher::from_config_or_default(&config.auth.argon2),
        );
        let chain_hasher: DynChainHasherPort = Arc::new(Sha256ChainHasher);
        let token_signer: DynTokenSignerPort =
            Arc::new(HmacTokenSigner::new(&config.rewards.signing_secret)?);

        let store = Arc::new(InMemoryStore::new(
            Arc::clone(&password_hasher),
            Arc::clone(&chain_hasher),
        ));

        let session_ttl = config.auth.session_ttl()?;
        let default_expiry = config.rewards.default_expiry()?;

        Ok(Self {
            auth_service: Arc::new(AuthService::new(
                Arc::clone(&store) as _,
                Arc::clone(&store) as _,
                session_ttl,
            )),
            wallet_service: Arc::new(WalletService::new(Arc::clone(&store) as _)),
            redemption_service: Arc::new(RedemptionService::new(RedemptionServiceDeps {
                user_store: Arc::clone(&store) as _,
                reward_store: Arc::clone(&store) as _,
                token_signer: Arc::clone(&token_signer),
                claim_timeout: StdDuration::from_millis(config.rewards.claim_timeout_ms),
            })),
            reward_admin_service: Arc::new(RewardAdminService::new(RewardAdminServiceDeps {
                reward_store: Arc::clone(&store) as _,
                token_signer,
                claim_url_base: config.rewards.claim_url_base.clone(),
                default_expiry,
            })),
            ledger_service: Arc::new(LedgerService::new(Arc::clone(&store) as _, chain_hasher)),
            provisioning_service: Arc::new(ProvisioningService::new(store, password_hasher)),
            config,
        })
    }

    /// Provisions the configured users and rewards. Rewards without a code
    /// are minted as signed envelopes and their claim links logged.
    #[instrument(skip(self))]
    pub async fn seed(&self) -> Result<SeedSummary, AppError> {
        let mut summary = SeedSummary::default();

        for user in &self.config.seed.users {
            self.provisioning_service
                .provision_user(
                    UserId::new(user.id),
                    user.username.clone(),
                    user.password.clone(),
                    user.balance,
                )
                .await?;
            summary.users += 1;
        }

        for reward in &self.config.seed.rewards {
            self.seed_reward(reward).await?;
            summary.rewards += 1;
        }

        Ok(summary)
    }

    async fn seed_reward(&self, reward: &SeedReward) -> Result<(), AppError> {
        let expires_in = reward.expires_in()?;

        match &reward.code {
            Some(code) => {
                self.reward_admin_service
                    .register(
                        code.clone(),
                        reward.amount,
                        expires_in.map(expiry_from_now).transpose()?,
                        reward.description.clone(),
                    )
                    .await?;
            }
            None => {
                let issued = self
                    .reward_admin_service
                    .issue(reward.amount, expires_in, reward.description.clone())
                    .await?;
                info!(
                    amount = issued.amount,
                    expires_at = %issued.expires_at,
                    claim_url = %issued.claim_url,
                    "Minted signed reward"
                );
            }
        }

        Ok(())
    }

    pub fn to_adapters_state(&self) -> AdaptersAppState {
        AdaptersAppState::new(
            Arc::clone(&self.config),
            Arc::clone(&self.auth_service),
            Arc::clone(&self.wallet_service),
            Arc::clone(&self.redemption_service),
        )
    }
}

fn expiry_from_now(ttl: Duration) -> Result<OffsetDateTime, AppError> {
    OffsetDateTime::now_utc()
        .checked_add(ttl)
        .ok_or_else(|| AppError::ConfigError {
            message: format!("reward expiry {ttl} is out of range"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use classmint_application::infrastructure_config::SeedUser;
    use domain::token::RawToken;

    fn seeded_config() -> Config {
        let mut config = Config::default();
        config.auth.argon2.memory_cost = 1024;
        config.auth.argon2.time_cost = 1;
        config.seed.users = vec![SeedUser {
            id: 1,
            username: "ana".to_string(),
            password: "secret".to_string(),
            balance: 100,
        }];
        config.seed.rewards = vec![
            SeedReward {
                code: Some("WELCOME10".to_string()),
                amount: 10,
                expires_in_minutes: None,
                description: "Welcome".to_string(),
            },
            SeedReward {
                code: None,
                amount: 5,
                expires_in_minutes: Some(30),
                description: String::new(),
            },
        ];
        config
    }

    #[tokio::test]
    async fn seeding_provisions_users_and_rewards() {
        let state = AppState::new(seeded_config()).unwrap();
        let summary = state.seed().await.unwrap();

        assert_eq!(summary.users, 1);
        assert_eq!(summary.rewards, 2);
        assert_eq!(state.reward_admin_service.list(10).await.unwrap().len(), 2);

        let login = state
            .auth_service
            .login("ana".to_string(), "secret".to_string())
            .await
            .unwrap();
        assert_eq!(login.user.balance, 100);

        let redemption = state
            .redemption_service
            .claim(UserId::new(1), RawToken::from("WELCOME10"))
            .await
            .unwrap();
        assert_eq!(redemption.result.new_balance, 110);
        assert_eq!(state.wallet_service.balance(UserId::new(1)).await.unwrap(), 110);
        assert!(state.ledger_service.verify_chain().await.unwrap().is_intact());
    }

    #[tokio::test]
    async fn seeding_twice_is_rejected() {
        let state = AppState::new(seeded_config()).unwrap();
        state.seed().await.unwrap();
        assert!(state.seed().await.is_err());
    }

    #[test]
    fn oversized_durations_are_refused_before_wiring() {
        let mut config = seeded_config();
        config.auth.session_ttl_seconds = u64::MAX;
        assert!(matches!(
            AppState::new(config),
            Err(AppError::ConfigError { .. })
        ));

        let mut config = seeded_config();
        config.rewards.default_expiry_minutes = u64::MAX;
        assert!(matches!(
            AppState::new(config),
            Err(AppError::ConfigError { .. })
        ));
    }

    #[tokio::test]
    async fn oversized_seed_expiry_fails_seeding_without_panicking() {
        let mut config = seeded_config();
        if let Some(reward) = config.seed.rewards.get_mut(1) {
            reward.expires_in_minutes = Some(u64::MAX);
        }

        let state = AppState::new(config).unwrap();
        assert!(matches!(
            state.seed().await,
            Err(AppError::ConfigError { .. })
        ));
    }
}
