use crate::error::AppResult;
use domain::ledger::{ChainVerification, LedgerStatus};

#[async_trait::async_trait]
pub trait LedgerUseCase: Send + Sync {
    async fn verify_chain(&self) -> AppResult<ChainVerification>;
    async fn status(&self, recent: usize) -> AppResult<LedgerStatus>;
}
