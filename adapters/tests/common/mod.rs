#![allow(dead_code)]

use axum::Router;
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;

use classmint_adapters::incoming::http_axum::routes::build_application_router;
use classmint_adapters::outgoing::hashing::sha256_chain::Sha256ChainHasher;
use classmint_adapters::outgoing::memory::InMemoryStore;
use classmint_adapters::outgoing::passwords::argon2::Argon2PasswordHasher;
use classmint_adapters::outgoing::signing::hmac_sha256::HmacTokenSigner;
use classmint_adapters::shared::app_state::AppState;
use classmint_application::auth::service::AuthService;
use classmint_application::infrastructure_config::{Argon2Config, Config};
use classmint_application::ledger::service::LedgerService;
use classmint_application::ports::incoming::provisioning::ProvisioningUseCase;
use classmint_application::ports::incoming::rewards::RewardAdminUseCase;
use classmint_application::provisioning::service::ProvisioningService;
use classmint_application::redemption::service::{RedemptionService, RedemptionServiceDeps};
use classmint_application::rewards::service::{RewardAdminService, RewardAdminServiceDeps};
use classmint_application::wallet::service::WalletService;
use domain::auth::UserId;

pub const SIGNING_SECRET: &str = "integration-secret";

pub struct TestApp {
    pub config: Arc<Config>,
    pub store: Arc<InMemoryStore>,
    pub auth: Arc<AuthService>,
    pub wallet: Arc<WalletService>,
    pub redemption: Arc<RedemptionService>,
    pub rewards: Arc<RewardAdminService>,
    pub ledger: Arc<LedgerService>,
}

impl TestApp {
    pub fn router(&self) -> Router {
        let state = AppState::new(
            Arc::clone(&self.config),
            Arc::clone(&self.auth) as _,
            Arc::clone(&self.wallet) as _,
            Arc::clone(&self.redemption) as _,
        );
        build_application_router().with_state(state)
    }
}

/// Users `1` (ana, balance 100) and `2` (ben, balance 0), plus the plain
/// reward `WELCOME10` worth 10.
pub async fn spawn_app() -> TestApp {
    let config = Arc::new(Config::default());
    let password_hasher = Arc::new(
        Argon2PasswordHasher::from_config(&Argon2Config {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
            output_length: None,
        })
        .unwrap(),
    );
    let store = Arc::new(InMemoryStore::new(
        Arc::clone(&password_hasher) as _,
        Arc::new(Sha256ChainHasher),
    ));
    let signer = Arc::new(HmacTokenSigner::new(&SecretString::from(SIGNING_SECRET)).unwrap());

    let provisioning = ProvisioningService::new(Arc::clone(&store) as _, password_hasher);
    provisioning
        .provision_user(UserId::new(1), "ana".to_string(), "secret".to_string(), 100)
        .await
        .unwrap();
    provisioning
        .provision_user(UserId::new(2), "ben".to_string(), "secret".to_string(), 0)
        .await
        .unwrap();

    let rewards = Arc::new(RewardAdminService::new(RewardAdminServiceDeps {
        reward_store: Arc::clone(&store) as _,
        token_signer: Arc::clone(&signer) as _,
        claim_url_base: config.rewards.claim_url_base.clone(),
        default_expiry: time::Duration::minutes(60),
    }));
    rewards
        .register(
            "WELCOME10".to_string(),
            10,
            None,
            "Welcome bonus".to_string(),
        )
        .await
        .unwrap();

    TestApp {
        auth: Arc::new(AuthService::new(
            Arc::clone(&store) as _,
            Arc::clone(&store) as _,
            time::Duration::hours(1),
        )),
        wallet: Arc::new(WalletService::new(Arc::clone(&store) as _)),
        redemption: Arc::new(RedemptionService::new(RedemptionServiceDeps {
            user_store: Arc::clone(&store) as _,
            reward_store: Arc::clone(&store) as _,
            token_signer: signer,
            claim_timeout: Duration::from_secs(2),
        })),
        ledger: Arc::new(LedgerService::new(
            Arc::clone(&store) as _,
            Arc::new(Sha256ChainHasher),
        )),
        rewards,
        store,
        config,
    }
}
