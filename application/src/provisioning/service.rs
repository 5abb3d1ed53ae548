use tracing::{info, instrument};

use crate::error::{AppError, AppResult};
use crate::ports::incoming::provisioning::ProvisioningUseCase;
use crate::ports::outgoing::password_hasher::DynPasswordHasherPort;
use crate::ports::outgoing::user_store::DynUserStorePort;
use domain::auth::{UserId, UserPublic};

/// Creates wallet users with a hashed credential and an opening balance.
pub struct ProvisioningService {
    user_store: DynUserStorePort,
    password_hasher: DynPasswordHasherPort,
}

impl ProvisioningService {
    pub fn new(user_store: DynUserStorePort, password_hasher: DynPasswordHasherPort) -> Self {
        Self {
            user_store,
            password_hasher,
        }
    }
}

#[async_trait::async_trait]
impl ProvisioningUseCase for ProvisioningService {
    #[instrument(skip(self, password))]
    async fn provision_user(
        &self,
        user_id: UserId,
        username: String,
        password: String,
        balance: u64,
    ) -> AppResult<UserPublic> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AppError::ValidationError {
                message: "username and password are required".to_string(),
            });
        }

        let password_hash = self.password_hasher.hash(&password)?;
        let user = self
            .user_store
            .create_user(user_id, username, &password_hash, balance)
            .await?;

        info!(user_id = %user.id, balance = user.balance, "User provisioned");
        Ok(user.to_public())
    }
}
