use tracing::instrument;

use crate::error::{AppError, AppResult};
use crate::ports::incoming::wallet::WalletUseCase;
use crate::ports::outgoing::user_store::DynUserStorePort;
use domain::auth::UserId;

pub struct WalletService {
    user_store: DynUserStorePort,
}

impl WalletService {
    pub fn new(user_store: DynUserStorePort) -> Self {
        Self { user_store }
    }
}

#[async_trait::async_trait]
impl WalletUseCase for WalletService {
    #[instrument(skip(self))]
    async fn balance(&self, user_id: UserId) -> AppResult<u64> {
        self.user_store
            .find_user(&user_id)
            .await?
            .map(|user| user.balance)
            .ok_or(AppError::UserNotFound)
    }
}
