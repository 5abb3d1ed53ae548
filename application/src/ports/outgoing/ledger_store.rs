use std::sync::Arc;

use crate::error::AppResult;
use domain::ledger::LedgerBlock;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LedgerStorePort: Send + Sync {
    async fn blocks(&self) -> AppResult<Vec<LedgerBlock>>;
}

pub type DynLedgerStorePort = Arc<dyn LedgerStorePort>;
