use std::sync::Arc;

use classmint_application::infrastructure_config::Config;
use classmint_application::ports::incoming::{
    auth::AuthUseCase, redemption::RedemptionUseCase, wallet::WalletUseCase,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_use_case: Arc<dyn AuthUseCase>,
    pub wallet_use_case: Arc<dyn WalletUseCase>,
    pub redemption_use_case: Arc<dyn RedemptionUseCase>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        auth_use_case: Arc<dyn AuthUseCase>,
        wallet_use_case: Arc<dyn WalletUseCase>,
        redemption_use_case: Arc<dyn RedemptionUseCase>,
    ) -> Self {
        Self {
            config,
            auth_use_case,
            wallet_use_case,
            redemption_use_case,
        }
    }
}
