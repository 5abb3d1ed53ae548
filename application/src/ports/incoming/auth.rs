use crate::error::AppResult;
use domain::auth::LoginOutcome;

#[async_trait::async_trait]
pub trait AuthUseCase: Send + Sync {
    async fn login(&self, username: String, password: String) -> AppResult<LoginOutcome>;
    async fn verify(&self) -> AppResult<bool>;
    async fn logout(&self) -> AppResult<()>;
}
