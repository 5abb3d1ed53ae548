use tracing::{instrument, warn};

use crate::error::AppResult;
use crate::ports::incoming::ledger::LedgerUseCase;
use crate::ports::outgoing::chain_hasher::DynChainHasherPort;
use crate::ports::outgoing::ledger_store::DynLedgerStorePort;
use domain::ledger::{ChainVerification, LedgerStatus, verify_chain};

pub struct LedgerService {
    ledger_store: DynLedgerStorePort,
    chain_hasher: DynChainHasherPort,
}

impl LedgerService {
    pub fn new(ledger_store: DynLedgerStorePort, chain_hasher: DynChainHasherPort) -> Self {
        Self {
            ledger_store,
            chain_hasher,
        }
    }
}

#[async_trait::async_trait]
impl LedgerUseCase for LedgerService {
    #[instrument(skip(self))]
    async fn verify_chain(&self) -> AppResult<ChainVerification> {
        let blocks = self.ledger_store.blocks().await?;
        let verification = verify_chain(&blocks, |input| self.chain_hasher.digest(input));

        if let ChainVerification::Broken { broken_at, .. } = &verification {
            warn!(broken_at, "Ledger chain integrity check failed");
        }

        Ok(verification)
    }

    async fn status(&self, recent: usize) -> AppResult<LedgerStatus> {
        let blocks = self.ledger_store.blocks().await?;

        let mut total_amount: u64 = 0;
        for block in &blocks {
            total_amount = total_amount.saturating_add(block.claim_data()?.amount);
        }

        Ok(LedgerStatus {
            total_blocks: blocks.len(),
            total_amount,
            recent: blocks.iter().rev().take(recent).cloned().collect(),
        })
    }
}
